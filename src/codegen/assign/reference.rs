use super::Assigner;
use crate::codegen::ops::TypeCasting;
use crate::codegen::stack::{Illegal, StackManipulation, Trivial};
use crate::description::TypeDescription;

/// Assigns references by widening, or by a checked cast when dynamically
/// typed. Primitives are only assignable to themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceTypeAwareAssigner;

impl Assigner for ReferenceTypeAwareAssigner {
    fn assign(&self, source: &TypeDescription, target: &TypeDescription, dynamically_typed: bool) -> Box<dyn StackManipulation> {
        if source.is_primitive() || target.is_primitive() {
            if source == target {
                Trivial.boxed()
            } else {
                Illegal.boxed()
            }
        } else if target.is_assignable_from(source) {
            Trivial.boxed()
        } else if dynamically_typed {
            TypeCasting(target.clone()).boxed()
        } else {
            Illegal.boxed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::opcodes;
    use crate::codegen::sink::{Instruction, InstructionRecorder};
    use crate::codegen::stack::{Context, Size};

    #[test]
    fn test_widening_is_trivial() {
        let assignment = ReferenceTypeAwareAssigner.assign(&TypeDescription::string(), &TypeDescription::object(), false);
        let mut recorder = InstructionRecorder::new();
        assert!(assignment.is_valid());
        assert_eq!(assignment.apply(&mut recorder, &Context::default()), Size::ZERO);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_narrowing_requires_dynamic_typing() {
        let object = TypeDescription::object();
        let string = TypeDescription::string();
        assert!(!ReferenceTypeAwareAssigner.assign(&object, &string, false).is_valid());
        let cast = ReferenceTypeAwareAssigner.assign(&object, &string, true);
        let mut recorder = InstructionRecorder::new();
        assert_eq!(cast.apply(&mut recorder, &Context::default()), Size::ZERO);
        assert_eq!(recorder.instructions(), &[Instruction::Type(opcodes::CHECKCAST, "java/lang/String".into())]);
    }

    #[test]
    fn test_primitive_mismatch() {
        assert!(ReferenceTypeAwareAssigner.assign(&TypeDescription::int(), &TypeDescription::int(), false).is_valid());
        assert!(!ReferenceTypeAwareAssigner.assign(&TypeDescription::int(), &TypeDescription::object(), true).is_valid());
    }
}
