use thiserror::Error;

use crate::codegen::error::{AnnotationError, ConstPoolError, EmitError};

/// Result type for classforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised while synthesizing a class
#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} {signature} is already defined on {owner}")]
    DuplicateMember {
        kind: MemberKind,
        signature: String,
        owner: String,
    },

    #[error("Illegal type name '{name}': {reason}")]
    IllegalName { name: String, reason: String },

    #[error("The type initializer cannot be invoked explicitly: {method}")]
    TypeInitializerInvocation { method: String },

    #[error("Emission error: {0}")]
    Emit(#[from] EmitError),

    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("Constant pool error: {0}")]
    ConstPool(#[from] ConstPoolError),

    #[error("Initializer for {type_name} failed: {message}")]
    Initializer { type_name: String, message: String },
}

/// Kind of member involved in a duplicate-member failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberKind::Field => f.write_str("Field"),
            MemberKind::Method => f.write_str("Method"),
        }
    }
}

impl Error {
    /// Create an illegal-name error
    pub fn illegal_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IllegalName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate-member error
    pub fn duplicate(kind: MemberKind, signature: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::DuplicateMember {
            kind,
            signature: signature.into(),
            owner: owner.into(),
        }
    }

    pub fn is_duplicate_member(&self) -> bool {
        matches!(self, Self::DuplicateMember { .. })
    }
}
