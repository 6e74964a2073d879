//! Method bodies assembled from stack manipulations.

use std::fmt;

use super::constant::TextConstant;
use super::error::{EmitError, EmitResult};
use super::invocation::MethodInvocation;
use super::ops::{Duplication, Throw, TypeCreation};
use super::sink::MethodSink;
use super::stack::{Compound, Context, StackManipulation};
use crate::codegen::defs::access_flags::ACC_PUBLIC;
use crate::description::types::{StackSize, THROWABLE};
use crate::description::{MethodDescription, TypeDescription, TypeList};

/// Operand stack and local variable capacity required by a method body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppenderSize {
    operand_stack: u16,
    local_variables: u16,
}

impl AppenderSize {
    pub fn new(operand_stack: u16, local_variables: u16) -> Self {
        Self { operand_stack, local_variables }
    }

    pub fn operand_stack(&self) -> u16 {
        self.operand_stack
    }

    pub fn local_variables(&self) -> u16 {
        self.local_variables
    }

    pub fn merge(self, other: AppenderSize) -> AppenderSize {
        AppenderSize {
            operand_stack: self.operand_stack.max(other.operand_stack),
            local_variables: self.local_variables.max(other.local_variables),
        }
    }
}

impl fmt::Display for AppenderSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "max_stack={}, max_locals={}", self.operand_stack, self.local_variables)
    }
}

/// Emits the code of a method body
pub trait ByteCodeAppender: fmt::Debug {
    fn append(&self, sink: &mut dyn MethodSink, context: &Context, method: &MethodDescription) -> EmitResult<AppenderSize>;
}

/// Applies a manipulation to a method's body and derives the body's
/// `max_stack` and `max_locals`
#[derive(Debug)]
pub struct SimpleAppender {
    body: Compound,
}

impl SimpleAppender {
    pub fn new(manipulations: Vec<Box<dyn StackManipulation>>) -> Self {
        Self { body: Compound::new(manipulations) }
    }

    /// Apply `manipulation` after checking it is valid
    pub fn apply_checked(
        manipulation: &dyn StackManipulation,
        sink: &mut dyn MethodSink,
        context: &Context,
        method: &MethodDescription,
    ) -> EmitResult<AppenderSize> {
        if !manipulation.is_valid() {
            return Err(EmitError::IllegalManipulation { what: format!("body of {}", method) });
        }
        // locals hold the receiver and every argument
        let local_variables = u16::try_from(method.stack_size()).map_err(|_| EmitError::TooManyLocals {
            required: method.stack_size(),
            limit: u16::MAX,
        })?;
        let size = manipulation.apply(sink, context);
        let operand_stack = u16::try_from(size.maximal_size()).map_err(|_| EmitError::StackOverflow {
            required: size.maximal_size(),
            limit: u16::MAX,
        })?;
        let appended = AppenderSize::new(operand_stack, local_variables);
        log::debug!("appended {}: {}", method, appended);
        Ok(appended)
    }
}

impl ByteCodeAppender for SimpleAppender {
    fn append(&self, sink: &mut dyn MethodSink, context: &Context, method: &MethodDescription) -> EmitResult<AppenderSize> {
        Self::apply_checked(&self.body, sink, context, method)
    }
}

/// A body that throws a new instance of an exception type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionMethod {
    exception_type: TypeDescription,
    message: Option<String>,
}

impl ExceptionMethod {
    /// Throws an exception created by its default constructor
    pub fn throwing(exception_type: TypeDescription) -> Self {
        Self { exception_type, message: None }
    }

    /// Throws an exception created by its `String` constructor
    pub fn throwing_with_message(exception_type: TypeDescription, message: impl Into<String>) -> Self {
        Self { exception_type, message: Some(message.into()) }
    }

    fn construction(&self) -> Compound {
        let mut body = Compound::default();
        body.push(TypeCreation(self.exception_type.clone()).boxed());
        body.push(Duplication(StackSize::Single).boxed());
        let parameters = match &self.message {
            Some(message) => {
                body.push(TextConstant::new(message.clone()).boxed());
                TypeList::new(vec![TypeDescription::string()])
            }
            None => TypeList::empty(),
        };
        let constructor = MethodDescription::constructor(self.exception_type.clone(), parameters, ACC_PUBLIC);
        body.push(MethodInvocation::invoke(&constructor).ok().boxed());
        body.push(Throw.boxed());
        body
    }
}

impl ByteCodeAppender for ExceptionMethod {
    fn append(&self, sink: &mut dyn MethodSink, context: &Context, method: &MethodDescription) -> EmitResult<AppenderSize> {
        if !THROWABLE.is_assignable_from(&self.exception_type) {
            return Err(EmitError::IncompatibleTypes {
                from: self.exception_type.source_name(),
                to: THROWABLE.source_name(),
            });
        }
        SimpleAppender::apply_checked(&self.construction(), sink, context, method)
    }
}
