//! Bytecode emission for synthesized types
//!
//! This module turns stack manipulations into instructions, resolves how
//! methods are invoked, coerces values between types and writes annotations.

pub mod annotation;
pub mod annotation_writer;
pub mod appender;
pub mod assign;
pub mod code;
pub mod constant;
pub mod constpool;
pub mod defs;
pub mod error;
pub mod invocation;
pub mod member;
pub mod opcodes;
pub mod ops;
pub mod sink;
pub mod stack;

pub use annotation::{AnnotationAppender, AnnotationTarget, AnnotationVisibility, AnnotationVisitor};
pub use appender::{AppenderSize, ByteCodeAppender, ExceptionMethod, SimpleAppender};
pub use assign::Assigner;
pub use code::CodeBuffer;
pub use constpool::ConstantPool;
pub use defs::ClassFileVersion;
pub use invocation::{DispatchKind, MethodInvocation};
pub use sink::{Instruction, InstructionRecorder, MethodSink};
pub use stack::{Compound, Context, Illegal, Size, StackManipulation, Trivial};
