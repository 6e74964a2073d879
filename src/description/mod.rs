//! Descriptions of types, methods, fields and annotations.
//!
//! These are the read-only references the emission engine consumes. They may be
//! built by hand (latent descriptions of not-yet-existing types) or derived from
//! an instrumented type under construction.

pub mod annotation;
pub mod field;
pub mod method;
pub mod types;

pub use annotation::{AnnotationDescription, AnnotationMember, AnnotationValue, RetentionPolicy};
pub use field::FieldDescription;
pub use method::MethodDescription;
pub use types::{LatentType, PrimitiveType, StackSize, TypeDescription, TypeList};
