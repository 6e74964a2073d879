mod common;

use classforge::codegen::assign::{checked_assign, default_assigner, Assigner};
use classforge::codegen::error::EmitError;
use classforge::codegen::opcodes;
use classforge::codegen::sink::Instruction;
use classforge::codegen::stack::{Size, StackManipulation};
use classforge::description::TypeDescription;
use common::*;

fn integer() -> TypeDescription {
    TypeDescription::class_named("java.lang.Integer")
}

#[test]
fn double_width_value_to_void_pops_two() {
    let assigner = default_assigner(false);
    let (size, recorder) = record(&assigner.assign(&TypeDescription::double(), &TypeDescription::void(), false));
    assert_eq!(size, Size::new(-2, 0));
    assert_eq!(recorder.opcodes(), vec![opcodes::POP2]);
}

#[test]
fn single_width_value_to_void_pops_one() {
    let assigner = default_assigner(false);
    for source in [TypeDescription::int(), TypeDescription::string()] {
        let (size, recorder) = record(&assigner.assign(&source, &TypeDescription::void(), false));
        assert_eq!(size, Size::new(-1, 0));
        assert_eq!(recorder.opcodes(), vec![opcodes::POP]);
    }
}

#[test]
fn void_to_value_depends_on_default_setting() {
    assert!(!default_assigner(false).assign(&TypeDescription::void(), &TypeDescription::string(), false).is_valid());
    let (size, recorder) = record(&default_assigner(true).assign(&TypeDescription::void(), &TypeDescription::string(), false));
    assert_eq!(size, Size::new(1, 1));
    assert_eq!(recorder.opcodes(), vec![opcodes::ACONST_NULL]);
}

#[test]
fn boxing_goes_through_value_of() {
    let assigner = default_assigner(false);
    let (size, recorder) = record(&assigner.assign(&TypeDescription::int(), &TypeDescription::object(), false));
    assert_eq!(size, Size::ZERO);
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
fn boxing_to_unrelated_reference_is_illegal() {
    let assigner = default_assigner(false);
    assert!(!assigner.assign(&TypeDescription::int(), &TypeDescription::string(), false).is_valid());
}

#[test]
fn unboxing_widens_the_primitive() {
    let assigner = default_assigner(false);
    let (size, recorder) = record(&assigner.assign(&integer(), &TypeDescription::long(), false));
    assert_eq!(size, Size::new(1, 1));
    assert_eq!(recorder.opcodes(), vec![opcodes::INVOKEVIRTUAL, opcodes::I2L]);
}

#[test]
fn unboxing_arbitrary_reference_needs_dynamic_typing() {
    let assigner = default_assigner(false);
    let object = TypeDescription::object();
    assert!(!assigner.assign(&object, &TypeDescription::int(), false).is_valid());

    let (size, recorder) = record(&assigner.assign(&object, &TypeDescription::int(), true));
    assert_eq!(size, Size::ZERO);
    assert_eq!(recorder.opcodes(), vec![opcodes::CHECKCAST, opcodes::INVOKEVIRTUAL]);
}

#[test]
fn primitive_narrowing_is_rejected() {
    let assigner = default_assigner(false);
    let error = checked_assign(&assigner, &TypeDescription::long(), &TypeDescription::int(), true).unwrap_err();
    assert_eq!(
        error,
        EmitError::IncompatibleTypes {
            from: "long".into(),
            to: "int".into(),
        }
    );
}

#[test]
fn primitive_widening_converts() {
    let assigner = default_assigner(false);
    let (size, recorder) = record(&assigner.assign(&TypeDescription::int(), &TypeDescription::double(), false));
    assert_eq!(size, Size::new(1, 1));
    assert_eq!(recorder.opcodes(), vec![opcodes::I2D]);
}

#[test]
fn reference_widening_is_free_and_narrowing_casts() {
    let assigner = default_assigner(false);
    let widening = checked_assign(&assigner, &sub_class(), &base_class(), false).unwrap();
    let (size, recorder) = record(&widening);
    assert_eq!(size, Size::ZERO);
    assert!(recorder.is_empty());

    assert!(checked_assign(&assigner, &base_class(), &sub_class(), false).is_err());
    let (_, recorder) = record(&checked_assign(&assigner, &base_class(), &sub_class(), true).unwrap());
    assert_eq!(recorder.instructions(), &[Instruction::Type(opcodes::CHECKCAST, "pkg/Sub".into())]);
}
