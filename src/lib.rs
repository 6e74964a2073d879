//! classforge
//!
//! Runtime synthesis of JVM classes: composable bytecode emission with operand
//! stack accounting, call-dispatch resolution, type coercions, annotation
//! writing and an immutable model of the type under construction.
//!
//! ## Architecture
//!
//! - **description**: read-only descriptions of types, methods, fields and annotations
//! - **codegen**: stack manipulations, sinks, dispatch, coercion chain, annotations
//! - **instrumented**: versioned snapshots of a type being built, naming, initializers
//! - **config**: settings of a build session
//!
//! ## Emission Flow
//!
//! ```text
//! InstrumentedType → MethodDescription → MethodInvocation / Assigner → StackManipulation
//!                                                                         ↓
//!                                                    MethodSink (InstructionRecorder, CodeBuffer)
//! ```

pub mod codegen;
pub mod config;
pub mod description;
pub mod error;
pub mod instrumented;

pub use config::Config;
pub use error::{Error, Result};
