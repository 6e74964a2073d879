use super::Assigner;
use crate::codegen::defs::access_flags::*;
use crate::codegen::invocation::MethodInvocation;
use crate::codegen::opcodes;
use crate::codegen::sink::MethodSink;
use crate::codegen::stack::{Compound, Context, Illegal, Size, StackManipulation, Trivial};
use crate::description::types::{PrimitiveType, TypeDescription};
use crate::description::{MethodDescription, TypeList};

/// Widening primitive conversion as permitted by the Java language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveWidening {
    /// Same representation on the stack, e.g. `byte` to `int`
    NoOp,
    Convert { opcode: u8, impact: i32 },
    Illegal,
}

impl PrimitiveWidening {
    pub fn of(source: PrimitiveType, target: PrimitiveType) -> Self {
        use PrimitiveType::*;
        use PrimitiveWidening::{Convert, NoOp};
        if source == target && source != Void {
            return NoOp;
        }
        match (source, target) {
            (Byte, Short) | (Byte | Short | Char, Int) => NoOp,
            (Byte | Short | Char | Int, Long) => Convert { opcode: opcodes::I2L, impact: 1 },
            (Byte | Short | Char | Int, Float) => Convert { opcode: opcodes::I2F, impact: 0 },
            (Byte | Short | Char | Int, Double) => Convert { opcode: opcodes::I2D, impact: 1 },
            (Long, Float) => Convert { opcode: opcodes::L2F, impact: -1 },
            (Long, Double) => Convert { opcode: opcodes::L2D, impact: 0 },
            (Float, Double) => Convert { opcode: opcodes::F2D, impact: 1 },
            _ => PrimitiveWidening::Illegal,
        }
    }
}

impl StackManipulation for PrimitiveWidening {
    fn is_valid(&self) -> bool {
        !matches!(self, PrimitiveWidening::Illegal)
    }

    fn apply(&self, sink: &mut dyn MethodSink, context: &Context) -> Size {
        match *self {
            PrimitiveWidening::NoOp => Size::ZERO,
            PrimitiveWidening::Convert { opcode, impact } => {
                sink.visit_insn(opcode);
                Size::new(impact, impact.max(0))
            }
            PrimitiveWidening::Illegal => Illegal.apply(sink, context),
        }
    }
}

/// Handles conversions involving primitives and delegates reference-only
/// assignments.
///
/// Boxing calls `Wrapper.valueOf` and lets the chained assigner bring the
/// wrapper to the target type. Unboxing calls `xxxValue()` on a wrapper and
/// widens the result; any other reference is first cast to the target's
/// wrapper, which requires dynamic typing.
#[derive(Debug)]
pub struct PrimitiveTypeAwareAssigner {
    reference_assigner: Box<dyn Assigner>,
}

impl PrimitiveTypeAwareAssigner {
    pub fn new(reference_assigner: Box<dyn Assigner>) -> Self {
        Self { reference_assigner }
    }

    fn boxing(&self, primitive: PrimitiveType, target: &TypeDescription, dynamically_typed: bool) -> Box<dyn StackManipulation> {
        let Some(wrapper) = primitive.wrapper() else {
            return Illegal.boxed();
        };
        let value_of = MethodDescription::new(
            wrapper.clone(),
            "valueOf",
            wrapper.clone(),
            TypeList::new(vec![TypeDescription::primitive(primitive)]),
            ACC_PUBLIC | ACC_STATIC,
        );
        Compound::new(vec![
            MethodInvocation::invoke(&value_of).ok().boxed(),
            self.reference_assigner.assign(wrapper, target, dynamically_typed),
        ])
        .boxed()
    }

    fn unboxing(&self, source: &TypeDescription, target: PrimitiveType, dynamically_typed: bool) -> Box<dyn StackManipulation> {
        if let Some(unboxed) = PrimitiveType::for_wrapper(&source.name()) {
            return Compound::new(vec![
                unbox(source, unboxed),
                PrimitiveWidening::of(unboxed, target).boxed(),
            ])
            .boxed();
        }
        match target.wrapper() {
            Some(wrapper) if dynamically_typed => Compound::new(vec![
                self.reference_assigner.assign(source, wrapper, dynamically_typed),
                unbox(wrapper, target),
            ])
            .boxed(),
            _ => Illegal.boxed(),
        }
    }
}

/// `wrapper.xxxValue()` for the primitive the wrapper boxes
fn unbox(wrapper: &TypeDescription, primitive: PrimitiveType) -> Box<dyn StackManipulation> {
    let value = MethodDescription::new(
        wrapper.clone(),
        format!("{}Value", primitive.name()),
        TypeDescription::primitive(primitive),
        TypeList::empty(),
        ACC_PUBLIC,
    );
    MethodInvocation::invoke(&value).ok().boxed()
}

impl Assigner for PrimitiveTypeAwareAssigner {
    fn assign(&self, source: &TypeDescription, target: &TypeDescription, dynamically_typed: bool) -> Box<dyn StackManipulation> {
        match (source.as_primitive(), target.as_primitive()) {
            (Some(from), Some(to)) => {
                if from == to {
                    Trivial.boxed()
                } else {
                    PrimitiveWidening::of(from, to).boxed()
                }
            }
            (Some(from), None) => self.boxing(from, target, dynamically_typed),
            (None, Some(to)) => self.unboxing(source, to, dynamically_typed),
            (None, None) => self.reference_assigner.assign(source, target, dynamically_typed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::assign::ReferenceTypeAwareAssigner;
    use crate::codegen::sink::{Instruction, InstructionRecorder};
    use crate::description::types::INTEGER_WRAPPER;

    fn assigner() -> PrimitiveTypeAwareAssigner {
        PrimitiveTypeAwareAssigner::new(Box::new(ReferenceTypeAwareAssigner))
    }

    #[test]
    fn test_widening_table() {
        use PrimitiveType::*;
        assert_eq!(PrimitiveWidening::of(Byte, Int), PrimitiveWidening::NoOp);
        assert_eq!(PrimitiveWidening::of(Int, Long), PrimitiveWidening::Convert { opcode: opcodes::I2L, impact: 1 });
        assert_eq!(PrimitiveWidening::of(Long, Float), PrimitiveWidening::Convert { opcode: opcodes::L2F, impact: -1 });
        assert_eq!(PrimitiveWidening::of(Int, Short), PrimitiveWidening::Illegal);
        assert_eq!(PrimitiveWidening::of(Char, Short), PrimitiveWidening::Illegal);
        assert_eq!(PrimitiveWidening::of(Byte, Char), PrimitiveWidening::Illegal);
        assert_eq!(PrimitiveWidening::of(Boolean, Int), PrimitiveWidening::Illegal);
        assert_eq!(PrimitiveWidening::of(Double, Float), PrimitiveWidening::Illegal);
    }

    #[test]
    fn test_boxing_to_supertype() {
        let assignment = assigner().assign(&TypeDescription::int(), &TypeDescription::object(), false);
        assert!(assignment.is_valid());
        let mut recorder = InstructionRecorder::new();
        assert_eq!(assignment.apply(&mut recorder, &Context::default()), Size::ZERO);
        assert_eq!(
            recorder.instructions(),
            &[Instruction::Method {
                opcode: opcodes::INVOKESTATIC,
                owner: "java/lang/Integer".into(),
                name: "valueOf".into(),
                descriptor: "(I)Ljava/lang/Integer;".into(),
                is_interface: false,
            }]
        );
    }

    #[test]
    fn test_unboxing_then_widening() {
        let assignment = assigner().assign(&INTEGER_WRAPPER, &TypeDescription::long(), false);
        let mut recorder = InstructionRecorder::new();
        assert_eq!(assignment.apply(&mut recorder, &Context::default()), Size::new(1, 1));
        assert_eq!(recorder.opcodes(), vec![opcodes::INVOKEVIRTUAL, opcodes::I2L]);
    }

    #[test]
    fn test_unboxing_object_needs_dynamic_typing() {
        let object = TypeDescription::object();
        assert!(!assigner().assign(&object, &TypeDescription::int(), false).is_valid());
        let assignment = assigner().assign(&object, &TypeDescription::int(), true);
        let mut recorder = InstructionRecorder::new();
        assignment.apply(&mut recorder, &Context::default());
        assert_eq!(recorder.opcodes(), vec![opcodes::CHECKCAST, opcodes::INVOKEVIRTUAL]);
    }
}
