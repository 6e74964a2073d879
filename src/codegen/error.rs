//! Specific error types for code generation operations

use thiserror::Error;

/// Errors that can occur during constant pool operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstPoolError {
    #[error("Constant pool is out of space")]
    OutOfSpace,
    #[error("Invalid constant pool index: {0}")]
    InvalidIndex(u16),
    #[error("Utf8 constant of {length} bytes exceeds 65535")]
    Utf8TooLong { length: usize },
    #[error("Operand out of range for {opcode}: {value}")]
    OperandOutOfRange { opcode: &'static str, value: i64 },
}

/// Errors that can occur while emitting method bodies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("Illegal stack manipulation: {what}")]
    IllegalManipulation { what: String },
    #[error("Cannot assign {from} to {to}")]
    IncompatibleTypes { from: String, to: String },
    #[error("Operand stack exceeds {limit} slots: {required}")]
    StackOverflow { required: i32, limit: u16 },
    #[error("Local variable array exceeds {limit} slots: {required}")]
    TooManyLocals { required: i32, limit: u16 },
}

/// Errors that can occur while writing annotations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Could not read member '{member}' of {annotation}: {reason}")]
    MetadataUnreadable {
        annotation: String,
        member: String,
        reason: String,
    },
}

/// Generic result type for constant pool operations
pub type ConstPoolResult<T> = Result<T, ConstPoolError>;

/// Generic result type for emission operations
pub type EmitResult<T> = Result<T, EmitError>;
