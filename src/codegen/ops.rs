//! Stack shuffling, object creation, casts, throws and arrays.

use super::constant::IntegerConstant;
use super::opcodes;
use super::opcodes::array_types::*;
use super::sink::MethodSink;
use super::stack::{Context, Size, StackManipulation};
use crate::codegen::defs::access_flags::*;
use crate::description::types::{PrimitiveType, StackSize, TypeDescription};

/// Duplication of the topmost value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duplication(pub StackSize);

impl Duplication {
    pub fn of(type_description: &TypeDescription) -> Self {
        Self(type_description.stack_size())
    }
}

impl StackManipulation for Duplication {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        match self.0 {
            StackSize::Zero => {}
            StackSize::Single => sink.visit_insn(opcodes::DUP),
            StackSize::Double => sink.visit_insn(opcodes::DUP2),
        }
        self.0.to_increasing_size()
    }
}

/// Removal of the topmost value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal(pub StackSize);

impl Removal {
    pub fn of(type_description: &TypeDescription) -> Self {
        Self(type_description.stack_size())
    }
}

impl StackManipulation for Removal {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        match self.0 {
            StackSize::Zero => {}
            StackSize::Single => sink.visit_insn(opcodes::POP),
            StackSize::Double => sink.visit_insn(opcodes::POP2),
        }
        self.0.to_decreasing_size()
    }
}

/// Allocation of an uninitialized instance (`NEW`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCreation(pub TypeDescription);

impl StackManipulation for TypeCreation {
    fn is_valid(&self) -> bool {
        !self.0.is_primitive() && !self.0.is_array() && self.0.modifiers() & (ACC_ABSTRACT | ACC_INTERFACE) == 0
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        sink.visit_type_insn(opcodes::NEW, &self.0.internal_name());
        StackSize::Single.to_increasing_size()
    }
}

/// Runtime-checked reference cast (`CHECKCAST`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCasting(pub TypeDescription);

impl StackManipulation for TypeCasting {
    fn is_valid(&self) -> bool {
        !self.0.is_primitive()
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        sink.visit_type_insn(opcodes::CHECKCAST, &self.0.internal_name());
        Size::ZERO
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throw;

impl StackManipulation for Throw {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        sink.visit_insn(opcodes::ATHROW);
        StackSize::Single.to_decreasing_size()
    }
}

/// Load or store of an array element, selected by component type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayAccess {
    component: PrimitiveOrReference,
    store: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrimitiveOrReference {
    Primitive(PrimitiveType),
    Reference,
}

impl ArrayAccess {
    pub fn load(component: &TypeDescription) -> Self {
        Self { component: Self::classify(component), store: false }
    }

    pub fn store(component: &TypeDescription) -> Self {
        Self { component: Self::classify(component), store: true }
    }

    fn classify(component: &TypeDescription) -> PrimitiveOrReference {
        match component.as_primitive() {
            Some(primitive) => PrimitiveOrReference::Primitive(primitive),
            None => PrimitiveOrReference::Reference,
        }
    }

    fn load_opcode(&self) -> Option<u8> {
        let opcode = match self.component {
            PrimitiveOrReference::Reference => opcodes::AALOAD,
            PrimitiveOrReference::Primitive(primitive) => match primitive {
                PrimitiveType::Boolean | PrimitiveType::Byte => opcodes::BALOAD,
                PrimitiveType::Char => opcodes::CALOAD,
                PrimitiveType::Short => opcodes::SALOAD,
                PrimitiveType::Int => opcodes::IALOAD,
                PrimitiveType::Long => opcodes::LALOAD,
                PrimitiveType::Float => opcodes::FALOAD,
                PrimitiveType::Double => opcodes::DALOAD,
                PrimitiveType::Void => return None,
            },
        };
        Some(opcode)
    }

    fn width(&self) -> i32 {
        match self.component {
            PrimitiveOrReference::Reference => 1,
            PrimitiveOrReference::Primitive(primitive) => primitive.stack_size().size(),
        }
    }
}

impl StackManipulation for ArrayAccess {
    fn is_valid(&self) -> bool {
        self.load_opcode().is_some()
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        let Some(load) = self.load_opcode() else {
            panic!("An array of void cannot be accessed");
        };
        let width = self.width();
        if self.store {
            // xASTORE sits at a fixed distance from xALOAD
            sink.visit_insn(load + (opcodes::IASTORE - opcodes::IALOAD));
            Size::new(-(2 + width), 0)
        } else {
            sink.visit_insn(load);
            let impact = width - 2;
            Size::new(impact, impact.max(0))
        }
    }
}

/// Creation of an array pre-filled with the values pushed by the given
/// manipulations
#[derive(Debug)]
pub struct ArrayFactory {
    component: TypeDescription,
    values: Vec<Box<dyn StackManipulation>>,
}

impl ArrayFactory {
    pub fn of(component: TypeDescription, values: Vec<Box<dyn StackManipulation>>) -> Self {
        Self { component, values }
    }

    fn array_type(&self) -> Option<u8> {
        let primitive = self.component.as_primitive()?;
        Some(match primitive {
            PrimitiveType::Boolean => T_BOOLEAN,
            PrimitiveType::Char => T_CHAR,
            PrimitiveType::Float => T_FLOAT,
            PrimitiveType::Double => T_DOUBLE,
            PrimitiveType::Byte => T_BYTE,
            PrimitiveType::Short => T_SHORT,
            PrimitiveType::Int => T_INT,
            PrimitiveType::Long => T_LONG,
            PrimitiveType::Void => 0,
        })
    }
}

impl StackManipulation for ArrayFactory {
    fn is_valid(&self) -> bool {
        !self.component.is_void() && self.values.iter().all(|v| v.is_valid())
    }

    fn apply(&self, sink: &mut dyn MethodSink, context: &Context) -> Size {
        let length = IntegerConstant::for_value(self.values.len() as i32);
        let mut size = length.apply(sink, context);
        match self.array_type() {
            Some(array_type) => sink.visit_int_insn(opcodes::NEWARRAY, array_type as i32),
            None => sink.visit_type_insn(opcodes::ANEWARRAY, &self.component.internal_name()),
        }
        let store = ArrayAccess::store(&self.component);
        for (index, value) in self.values.iter().enumerate() {
            size = size
                .aggregate(Duplication(StackSize::Single).apply(sink, context))
                .aggregate(IntegerConstant::for_value(index as i32).apply(sink, context))
                .aggregate(value.apply(sink, context))
                .aggregate(store.apply(sink, context));
        }
        size
    }
}
