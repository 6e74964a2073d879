//! Method invocation and call-dispatch resolution.
//!
//! [`MethodInvocation::invoke`] derives the dispatch kind from the properties
//! of the invoked method alone. The resulting invocation can afterwards be
//! re-targeted onto another receiver type; re-targeting produces a new
//! invocation or `None` when the combination is not legal.

use std::fmt;

use super::opcodes;
use super::sink::MethodSink;
use super::stack::{Context, Size, StackManipulation};
use crate::description::{MethodDescription, TypeDescription};
use crate::error::{Error, Result};

/// Invocation instruction family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchKind {
    Static,
    Special,
    Virtual,
    Interface,
}

impl DispatchKind {
    pub fn opcode(&self) -> u8 {
        match self {
            DispatchKind::Static => opcodes::INVOKESTATIC,
            DispatchKind::Special => opcodes::INVOKESPECIAL,
            DispatchKind::Virtual => opcodes::INVOKEVIRTUAL,
            DispatchKind::Interface => opcodes::INVOKEINTERFACE,
        }
    }

    /// Kind implied by the method's own declaration
    pub fn resolve(method: &MethodDescription) -> Result<DispatchKind> {
        if method.is_type_initializer() {
            return Err(Error::TypeInitializerInvocation { method: method.to_string() });
        }
        // static wins over private; default methods stay special although declared on an interface
        let kind = if method.is_static() {
            DispatchKind::Static
        } else if method.is_private() || method.is_constructor() || method.is_default_method() {
            DispatchKind::Special
        } else if method.declaring_type().is_interface() {
            DispatchKind::Interface
        } else {
            DispatchKind::Virtual
        };
        Ok(kind)
    }
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(opcodes::mnemonic(self.opcode()))
    }
}

/// A call site: dispatch kind, invoked method and receiver type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodInvocation {
    kind: DispatchKind,
    method: MethodDescription,
    receiver: TypeDescription,
}

impl MethodInvocation {
    /// Invocation of `method` on its declaring type
    pub fn invoke(method: &MethodDescription) -> Result<MethodInvocation> {
        let kind = DispatchKind::resolve(method)?;
        log::debug!("resolved {} to {}", method, kind);
        Ok(Self {
            kind,
            method: method.clone(),
            receiver: method.declaring_type().clone(),
        })
    }

    pub fn kind(&self) -> DispatchKind {
        self.kind
    }

    pub fn method(&self) -> &MethodDescription {
        &self.method
    }

    pub fn receiver(&self) -> &TypeDescription {
        &self.receiver
    }

    /// Virtual dispatch on `target`; `None` for static, private and
    /// constructor methods
    pub fn as_virtual_on(&self, target: &TypeDescription) -> Option<MethodInvocation> {
        if self.method.is_private() || self.method.is_constructor() || self.method.is_static() {
            log::debug!("{} cannot be invoked virtually on {}", self.method, target);
            return None;
        }
        let kind = if target.is_interface() {
            DispatchKind::Interface
        } else {
            DispatchKind::Virtual
        };
        Some(self.retarget(kind, target))
    }

    /// Non-virtual dispatch on `target`; `None` unless the method is
    /// specializable for it
    pub fn as_special_on(&self, target: &TypeDescription) -> Option<MethodInvocation> {
        if !self.method.is_specializable_for(target) {
            log::debug!("{} cannot be invoked non-virtually on {}", self.method, target);
            return None;
        }
        Some(self.retarget(DispatchKind::Special, target))
    }

    fn retarget(&self, kind: DispatchKind, target: &TypeDescription) -> MethodInvocation {
        Self {
            kind,
            method: self.method.clone(),
            receiver: target.clone(),
        }
    }

    /// Net: return width minus consumed arguments; peak never exceeds the
    /// return value
    pub fn size(&self) -> Size {
        let impact = self.method.return_type().stack_size().size() - self.method.stack_size();
        Size::new(impact, impact.max(0))
    }
}

impl StackManipulation for MethodInvocation {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        sink.visit_method_insn(
            self.kind.opcode(),
            &self.receiver.internal_name(),
            self.method.internal_name(),
            &self.method.descriptor(),
            self.receiver.is_interface(),
        );
        self.size()
    }
}
