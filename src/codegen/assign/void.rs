use super::Assigner;
use crate::codegen::constant::DefaultValue;
use crate::codegen::ops::Removal;
use crate::codegen::stack::{Illegal, StackManipulation, Trivial};
use crate::description::TypeDescription;

/// Handles assignments from and to `void` and delegates everything else.
///
/// A value assigned to `void` is popped. Assigning `void` to a value type
/// pushes the type's default value when enabled and is illegal otherwise.
#[derive(Debug)]
pub struct VoidAwareAssigner {
    chained: Box<dyn Assigner>,
    return_default_value: bool,
}

impl VoidAwareAssigner {
    pub fn new(chained: Box<dyn Assigner>, return_default_value: bool) -> Self {
        Self { chained, return_default_value }
    }
}

impl Assigner for VoidAwareAssigner {
    fn assign(&self, source: &TypeDescription, target: &TypeDescription, dynamically_typed: bool) -> Box<dyn StackManipulation> {
        match (source.is_void(), target.is_void()) {
            (true, true) => Trivial.boxed(),
            (true, false) if self.return_default_value => DefaultValue(target.clone()).boxed(),
            (true, false) => Illegal.boxed(),
            (false, true) => Removal::of(source).boxed(),
            (false, false) => self.chained.assign(source, target, dynamically_typed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::assign::ReferenceTypeAwareAssigner;
    use crate::codegen::opcodes;
    use crate::codegen::sink::InstructionRecorder;
    use crate::codegen::stack::{Context, Size};

    #[test]
    fn test_void_to_value_requires_default() {
        let strict = VoidAwareAssigner::new(Box::new(ReferenceTypeAwareAssigner), false);
        assert!(!strict.assign(&TypeDescription::void(), &TypeDescription::int(), false).is_valid());

        let lenient = VoidAwareAssigner::new(Box::new(ReferenceTypeAwareAssigner), true);
        let assignment = lenient.assign(&TypeDescription::void(), &TypeDescription::double(), false);
        let mut recorder = InstructionRecorder::new();
        assert_eq!(assignment.apply(&mut recorder, &Context::default()), Size::new(2, 2));
        assert_eq!(recorder.opcodes(), vec![opcodes::DCONST_0]);
    }

    #[test]
    fn test_void_to_void_is_trivial() {
        let assigner = VoidAwareAssigner::new(Box::new(ReferenceTypeAwareAssigner), false);
        let assignment = assigner.assign(&TypeDescription::void(), &TypeDescription::void(), false);
        let mut recorder = InstructionRecorder::new();
        assert_eq!(assignment.apply(&mut recorder, &Context::default()), Size::ZERO);
        assert!(recorder.is_empty());
    }
}
