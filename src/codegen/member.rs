//! Field access, local variable access and method returns.

use super::opcodes;
use super::sink::MethodSink;
use super::stack::{Compound, Context, Illegal, Size, StackManipulation};
use crate::description::types::{PrimitiveType, StackSize, TypeDescription};
use crate::description::{FieldDescription, MethodDescription};

/// Read or write of a field, static or instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccess {
    field: FieldDescription,
    put: bool,
}

impl FieldAccess {
    pub fn get(field: &FieldDescription) -> Self {
        Self { field: field.clone(), put: false }
    }

    pub fn put(field: &FieldDescription) -> Self {
        Self { field: field.clone(), put: true }
    }

    fn opcode(&self) -> u8 {
        match (self.field.is_static(), self.put) {
            (true, false) => opcodes::GETSTATIC,
            (true, true) => opcodes::PUTSTATIC,
            (false, false) => opcodes::GETFIELD,
            (false, true) => opcodes::PUTFIELD,
        }
    }
}

impl StackManipulation for FieldAccess {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        sink.visit_field_insn(
            self.opcode(),
            &self.field.declaring_type().internal_name(),
            self.field.internal_name(),
            &self.field.descriptor(),
        );
        let width = self.field.field_type().stack_size().size();
        let receiver = if self.field.is_static() { 0 } else { 1 };
        if self.put {
            Size::new(-(width + receiver), 0)
        } else {
            let impact = width - receiver;
            Size::new(impact, impact.max(0))
        }
    }
}

/// Opcode family of a local variable access, selected by type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Integer,
    Long,
    Float,
    Double,
    Reference,
}

impl VariableKind {
    /// `None` for `void`, which has no local variable representation
    pub fn of(type_description: &TypeDescription) -> Option<Self> {
        match type_description.as_primitive() {
            Some(PrimitiveType::Void) => None,
            Some(PrimitiveType::Long) => Some(VariableKind::Long),
            Some(PrimitiveType::Float) => Some(VariableKind::Float),
            Some(PrimitiveType::Double) => Some(VariableKind::Double),
            Some(_) => Some(VariableKind::Integer),
            None => Some(VariableKind::Reference),
        }
    }

    fn offset(&self) -> u8 {
        match self {
            VariableKind::Integer => 0,
            VariableKind::Long => 1,
            VariableKind::Float => 2,
            VariableKind::Double => 3,
            VariableKind::Reference => 4,
        }
    }

    fn stack_size(&self) -> StackSize {
        match self {
            VariableKind::Long | VariableKind::Double => StackSize::Double,
            _ => StackSize::Single,
        }
    }
}

/// Load or store of a local variable slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodVariableAccess {
    kind: VariableKind,
    slot: u16,
    store: bool,
}

impl MethodVariableAccess {
    pub fn load(kind: VariableKind, slot: u16) -> Self {
        Self { kind, slot, store: false }
    }

    pub fn store(kind: VariableKind, slot: u16) -> Self {
        Self { kind, slot, store: true }
    }

    /// Load of a local of the given type; illegal for `void`
    pub fn load_of(type_description: &TypeDescription, slot: u16) -> Box<dyn StackManipulation> {
        match VariableKind::of(type_description) {
            Some(kind) => Self::load(kind, slot).boxed(),
            None => Illegal.boxed(),
        }
    }

    /// Store into a local of the given type; illegal for `void`
    pub fn store_of(type_description: &TypeDescription, slot: u16) -> Box<dyn StackManipulation> {
        match VariableKind::of(type_description) {
            Some(kind) => Self::store(kind, slot).boxed(),
            None => Illegal.boxed(),
        }
    }

    /// Load of `this` followed by every parameter of `method`, or of every
    /// parameter alone for a static method
    pub fn load_arguments(method: &MethodDescription) -> Compound {
        let mut loads = Compound::default();
        let mut slot: u16 = 0;
        if !method.is_static() {
            loads.push(Self::load(VariableKind::Reference, 0).boxed());
            slot = 1;
        }
        for parameter in method.parameter_types() {
            loads.push(Self::load_of(parameter, slot));
            slot += parameter.stack_size().size() as u16;
        }
        loads
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn slot(&self) -> u16 {
        self.slot
    }
}

impl StackManipulation for MethodVariableAccess {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        if self.store {
            sink.visit_var_insn(opcodes::ISTORE + self.kind.offset(), self.slot);
            self.kind.stack_size().to_decreasing_size()
        } else {
            sink.visit_var_insn(opcodes::ILOAD + self.kind.offset(), self.slot);
            self.kind.stack_size().to_increasing_size()
        }
    }
}

/// Return from a method with a value of the given type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodReturn {
    Integer,
    Long,
    Float,
    Double,
    Reference,
    Void,
}

impl MethodReturn {
    pub fn returning(type_description: &TypeDescription) -> Self {
        match VariableKind::of(type_description) {
            None => MethodReturn::Void,
            Some(VariableKind::Integer) => MethodReturn::Integer,
            Some(VariableKind::Long) => MethodReturn::Long,
            Some(VariableKind::Float) => MethodReturn::Float,
            Some(VariableKind::Double) => MethodReturn::Double,
            Some(VariableKind::Reference) => MethodReturn::Reference,
        }
    }

    fn opcode(&self) -> u8 {
        match self {
            MethodReturn::Integer => opcodes::IRETURN,
            MethodReturn::Long => opcodes::LRETURN,
            MethodReturn::Float => opcodes::FRETURN,
            MethodReturn::Double => opcodes::DRETURN,
            MethodReturn::Reference => opcodes::ARETURN,
            MethodReturn::Void => opcodes::RETURN,
        }
    }

    fn stack_size(&self) -> StackSize {
        match self {
            MethodReturn::Void => StackSize::Zero,
            MethodReturn::Long | MethodReturn::Double => StackSize::Double,
            _ => StackSize::Single,
        }
    }
}

impl StackManipulation for MethodReturn {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, sink: &mut dyn MethodSink, _context: &Context) -> Size {
        sink.visit_insn(self.opcode());
        self.stack_size().to_decreasing_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::defs::access_flags::*;
    use crate::codegen::sink::{Instruction, InstructionRecorder};
    use crate::description::TypeList;

    #[test]
    fn test_load_arguments_slots() {
        let method = MethodDescription::new(
            TypeDescription::class_named("pkg.Foo"),
            "bar",
            TypeDescription::void(),
            TypeList::new(vec![TypeDescription::long(), TypeDescription::string(), TypeDescription::double()]),
            ACC_PUBLIC,
        );
        let mut recorder = InstructionRecorder::new();
        let size = MethodVariableAccess::load_arguments(&method).apply(&mut recorder, &Context::default());
        assert_eq!(size, Size::new(6, 6));
        assert_eq!(
            recorder.instructions(),
            &[
                Instruction::Var(opcodes::ALOAD, 0),
                Instruction::Var(opcodes::LLOAD, 1),
                Instruction::Var(opcodes::ALOAD, 3),
                Instruction::Var(opcodes::DLOAD, 4),
            ]
        );
    }

    #[test]
    fn test_field_access_sizes() {
        let owner = TypeDescription::class_named("pkg.Foo");
        let instance = FieldDescription::new(owner.clone(), "value", TypeDescription::long(), ACC_PRIVATE);
        let shared = FieldDescription::new(owner, "COUNT", TypeDescription::int(), ACC_STATIC);
        let mut recorder = InstructionRecorder::new();
        let context = Context::default();
        assert_eq!(FieldAccess::get(&instance).apply(&mut recorder, &context), Size::new(1, 1));
        assert_eq!(FieldAccess::put(&instance).apply(&mut recorder, &context), Size::new(-3, 0));
        assert_eq!(FieldAccess::get(&shared).apply(&mut recorder, &context), Size::new(1, 1));
        assert_eq!(FieldAccess::put(&shared).apply(&mut recorder, &context), Size::new(-1, 0));
        assert_eq!(
            recorder.opcodes(),
            vec![opcodes::GETFIELD, opcodes::PUTFIELD, opcodes::GETSTATIC, opcodes::PUTSTATIC]
        );
    }

    #[test]
    fn test_void_local_is_illegal() {
        assert!(!MethodVariableAccess::load_of(&TypeDescription::void(), 1).is_valid());
        assert_eq!(MethodReturn::returning(&TypeDescription::void()), MethodReturn::Void);
        assert_eq!(MethodReturn::returning(&TypeDescription::boolean()), MethodReturn::Integer);
    }
}
