//! Coercion of a value on the operand stack from one type to another.
//!
//! Assigners form a chain: each handles the conversions it knows and hands the
//! rest to the next link. None of them fails; a conversion that cannot be
//! performed comes back as an invalid manipulation, which callers turn into
//! [`EmitError::IncompatibleTypes`] with [`checked_assign`].

pub mod primitive;
pub mod reference;
pub mod void;

pub use primitive::{PrimitiveTypeAwareAssigner, PrimitiveWidening};
pub use reference::ReferenceTypeAwareAssigner;
pub use void::VoidAwareAssigner;

use std::fmt;

use super::error::{EmitError, EmitResult};
use super::stack::StackManipulation;
use crate::description::TypeDescription;

pub trait Assigner: fmt::Debug {
    /// Conversion of a `source` value on the stack into a `target` value.
    ///
    /// `dynamically_typed` permits reference narrowing through a runtime cast.
    fn assign(&self, source: &TypeDescription, target: &TypeDescription, dynamically_typed: bool) -> Box<dyn StackManipulation>;
}

impl<A: Assigner + ?Sized> Assigner for Box<A> {
    fn assign(&self, source: &TypeDescription, target: &TypeDescription, dynamically_typed: bool) -> Box<dyn StackManipulation> {
        (**self).assign(source, target, dynamically_typed)
    }
}

/// The full chain: void handling, then primitives, then references
pub fn default_assigner(void_default_value: bool) -> VoidAwareAssigner {
    VoidAwareAssigner::new(
        Box::new(PrimitiveTypeAwareAssigner::new(Box::new(ReferenceTypeAwareAssigner))),
        void_default_value,
    )
}

/// Assign and reject conversions that cannot be performed
pub fn checked_assign(
    assigner: &dyn Assigner,
    source: &TypeDescription,
    target: &TypeDescription,
    dynamically_typed: bool,
) -> EmitResult<Box<dyn StackManipulation>> {
    let assignment = assigner.assign(source, target, dynamically_typed);
    if assignment.is_valid() {
        Ok(assignment)
    } else {
        Err(EmitError::IncompatibleTypes {
            from: source.source_name(),
            to: target.source_name(),
        })
    }
}
