//! Constant pushes.
//!
//! Every constant picks the shortest instruction able to produce its value;
//! whichever form is chosen, the stack effect only depends on the width of the
//! pushed value.

use super::opcodes;
use super::sink::{LdcConstant, MethodSink};
use super::stack::{Context, Size, StackManipulation};
use crate::description::types::{PrimitiveType, StackSize, TypeDescription};
use crate::description::MethodDescription;

/// Push of an `int` (or narrower) constant.
///
/// The instruction is picked from the value when applied: `ICONST_M1` ..
/// `ICONST_5`, then `BIPUSH`, `SIPUSH` and finally `LDC` of a pooled integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerConstant(i32);

impl IntegerConstant {
    pub fn for_value(value: i32) -> Self {
        Self(value)
    }

    pub fn for_bool(value: bool) -> Self {
        Self::for_value(value as i32)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl StackManipulation for IntegerConstant {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        let value = self.0;
        if (-1..=5).contains(&value) {
            sink.visit_insn((opcodes::ICONST_0 as i32 + value) as u8);
        } else if i8::try_from(value).is_ok() {
            sink.visit_int_insn(opcodes::BIPUSH, value);
        } else if i16::try_from(value).is_ok() {
            sink.visit_int_insn(opcodes::SIPUSH, value);
        } else {
            sink.visit_ldc(LdcConstant::Int(value));
        }
        StackSize::Single.to_increasing_size()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongConstant(pub i64);

impl StackManipulation for LongConstant {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        match self.0 {
            0 => sink.visit_insn(opcodes::LCONST_0),
            1 => sink.visit_insn(opcodes::LCONST_1),
            value => sink.visit_ldc(LdcConstant::Long(value)),
        }
        StackSize::Double.to_increasing_size()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatConstant(pub f32);

impl StackManipulation for FloatConstant {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        // compare bits so that -0.0 is pooled rather than pushed as 0.0
        let bits = self.0.to_bits();
        if bits == 0f32.to_bits() {
            sink.visit_insn(opcodes::FCONST_0);
        } else if bits == 1f32.to_bits() {
            sink.visit_insn(opcodes::FCONST_1);
        } else if bits == 2f32.to_bits() {
            sink.visit_insn(opcodes::FCONST_2);
        } else {
            sink.visit_ldc(LdcConstant::Float(self.0));
        }
        StackSize::Single.to_increasing_size()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleConstant(pub f64);

impl StackManipulation for DoubleConstant {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        let bits = self.0.to_bits();
        if bits == 0f64.to_bits() {
            sink.visit_insn(opcodes::DCONST_0);
        } else if bits == 1f64.to_bits() {
            sink.visit_insn(opcodes::DCONST_1);
        } else {
            sink.visit_ldc(LdcConstant::Double(self.0));
        }
        StackSize::Double.to_increasing_size()
    }
}

/// Push of a `java.lang.String` literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextConstant(pub String);

impl TextConstant {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl StackManipulation for TextConstant {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        sink.visit_ldc(LdcConstant::String(self.0.clone()));
        StackSize::Single.to_increasing_size()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullConstant;

impl StackManipulation for NullConstant {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        sink.visit_insn(opcodes::ACONST_NULL);
        StackSize::Single.to_increasing_size()
    }
}

/// Push of the `java.lang.Class` instance representing a type.
///
/// Primitive types are read from the `TYPE` field of their wrapper. Reference
/// types use a class literal, or `Class.forName` for class files older than
/// Java 5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassConstant(pub TypeDescription);

impl StackManipulation for ClassConstant {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, context: &Context) -> Size {
        let size = StackSize::Single.to_increasing_size();
        if let Some(primitive) = self.0.as_primitive() {
            let owner = match primitive {
                PrimitiveType::Void => "java/lang/Void".to_string(),
                other => other.wrapper().map(TypeDescription::internal_name).unwrap_or_default(),
            };
            sink.visit_field_insn(opcodes::GETSTATIC, &owner, "TYPE", "Ljava/lang/Class;");
            return size;
        }
        if context.class_file_version().supports_class_constants() {
            sink.visit_ldc(LdcConstant::Type(self.0.internal_name()));
            size
        } else {
            sink.visit_ldc(LdcConstant::String(self.0.name()));
            sink.visit_method_insn(
                opcodes::INVOKESTATIC,
                "java/lang/Class",
                "forName",
                "(Ljava/lang/String;)Ljava/lang/Class;",
                false,
            );
            size
        }
    }
}

/// Push of a `java.lang.invoke.MethodType` for a method's signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTypeConstant {
    descriptor: String,
}

impl MethodTypeConstant {
    pub fn of(method: &MethodDescription) -> Self {
        Self { descriptor: method.descriptor() }
    }

    pub fn from_descriptor(descriptor: impl Into<String>) -> Self {
        Self { descriptor: descriptor.into() }
    }
}

impl StackManipulation for MethodTypeConstant {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, context: &Context) -> Size {
        if !context.class_file_version().supports_method_types() {
            log::warn!(
                "method type constant {} emitted for class file version {}",
                self.descriptor,
                context.class_file_version()
            );
        }
        sink.visit_ldc(LdcConstant::MethodType(self.descriptor.clone()));
        StackSize::Single.to_increasing_size()
    }
}

/// Push of the default value of a type: zero, `null`, or nothing for `void`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValue(pub TypeDescription);

impl StackManipulation for DefaultValue {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        match self.0.as_primitive() {
            Some(PrimitiveType::Void) => return Size::ZERO,
            Some(PrimitiveType::Long) => sink.visit_insn(opcodes::LCONST_0),
            Some(PrimitiveType::Float) => sink.visit_insn(opcodes::FCONST_0),
            Some(PrimitiveType::Double) => sink.visit_insn(opcodes::DCONST_0),
            Some(_) => sink.visit_insn(opcodes::ICONST_0),
            None => sink.visit_insn(opcodes::ACONST_NULL),
        }
        self.0.stack_size().to_increasing_size()
    }
}
