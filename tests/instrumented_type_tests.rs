mod common;

use std::sync::{Arc, Mutex};

use classforge::codegen::defs::access_flags::*;
use classforge::codegen::defs::ClassFileVersion;
use classforge::description::{AnnotationDescription, LatentType, RetentionPolicy, TypeDescription, TypeList};
use classforge::instrumented::{FixedName, InstrumentedType, LoadedTypeInitializer, SuffixingName};
use classforge::{Config, Error, Result};
use common::*;

/// Appends its label to a shared log when run
#[derive(Debug)]
struct Logging {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl LoadedTypeInitializer for Logging {
    fn on_load(&self, loaded: &TypeDescription) -> Result<()> {
        self.log.lock().unwrap().push(format!("{}:{}", self.label, loaded.name()));
        if self.fail {
            Err(Error::Initializer {
                type_name: loaded.name(),
                message: self.label.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn is_alive(&self) -> bool {
        true
    }
}

fn logging(label: &'static str, log: &Arc<Mutex<Vec<String>>>, fail: bool) -> Arc<dyn LoadedTypeInitializer> {
    Arc::new(Logging {
        label,
        log: log.clone(),
        fail,
    })
}

fn fresh() -> InstrumentedType {
    InstrumentedType::subclass(
        ClassFileVersion::JAVA_V8,
        base_class(),
        vec![api_interface()],
        ACC_PUBLIC | ACC_SUPER,
        &FixedName::new("pkg.Generated"),
    )
    .unwrap()
}

#[test]
fn with_field_leaves_original_untouched() {
    let original = fresh();
    let extended = original.with_field("count", TypeDescription::int(), ACC_PRIVATE).unwrap();
    assert!(original.fields().is_empty());
    assert_eq!(original.version(), 0);
    assert_eq!(extended.fields().len(), 1);
    assert_eq!(extended.version(), 1);
    assert_eq!(extended.fields()[0].name(), "count");
}

#[test]
fn duplicate_field_is_rejected_without_change() {
    let snapshot = fresh().with_field("x", TypeDescription::int(), 0).unwrap();
    let before = snapshot.fields().to_vec();
    let error = snapshot.with_field("x", TypeDescription::int(), 0).unwrap_err();
    assert!(error.is_duplicate_member());
    assert_eq!(snapshot.fields(), &before[..]);
    assert_eq!(snapshot.version(), 1);

    // same name with another descriptor is a distinct field
    let widened = snapshot.with_field("x", TypeDescription::long(), 0).unwrap();
    assert_eq!(widened.fields().len(), 2);
    assert_eq!(snapshot.fields().len(), 1);
}

#[test]
fn methods_are_unique_by_signature() {
    let snapshot = fresh()
        .with_method("apply", TypeDescription::int(), vec![TypeDescription::int()], TypeList::empty(), ACC_PUBLIC)
        .unwrap()
        .with_method("apply", TypeDescription::long(), vec![TypeDescription::long()], TypeList::empty(), ACC_PUBLIC)
        .unwrap();
    assert_eq!(snapshot.methods().len(), 2);

    let error = snapshot
        .with_method("apply", TypeDescription::int(), vec![TypeDescription::int()], TypeList::empty(), ACC_PRIVATE)
        .unwrap_err();
    assert!(error.is_duplicate_member());
    assert_eq!(snapshot.methods().len(), 2);
}

#[test]
fn described_members_are_declared_by_the_snapshot() {
    let snapshot = fresh()
        .with_field("name", TypeDescription::string(), ACC_PRIVATE)
        .unwrap()
        .with_method("name", TypeDescription::string(), TypeList::empty(), TypeList::empty(), ACC_PUBLIC)
        .unwrap();
    let described = snapshot.describe();
    assert_eq!(described.name(), "pkg.Generated");
    assert!(base_class().is_assignable_from(&described));
    assert!(api_interface().is_assignable_from(&described));

    let methods = snapshot.method_descriptions();
    assert_eq!(methods[0].declaring_type(), &described);
    assert_eq!(methods[0].descriptor(), "()Ljava/lang/String;");
    let fields = snapshot.field_descriptions();
    assert_eq!(fields[0].descriptor(), "Ljava/lang/String;");
}

#[test]
fn detach_is_idempotent_and_keeps_members() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let snapshot = fresh()
        .with_field("cache", TypeDescription::object(), ACC_PRIVATE | ACC_STATIC)
        .unwrap()
        .with_initializer(logging("cache", &log, false));
    assert!(snapshot.has_pending_initializer());

    let detached = snapshot.detach();
    let twice = detached.detach();
    for copy in [&detached, &twice] {
        assert!(!copy.has_pending_initializer());
        assert_eq!(copy.fields(), snapshot.fields());
        assert_eq!(copy.methods(), snapshot.methods());
        assert_eq!(copy.name(), snapshot.name());
    }
    twice.initialize().unwrap();
    assert!(log.lock().unwrap().is_empty());
    assert!(snapshot.has_pending_initializer());
}

#[test]
fn initializers_run_in_order_and_stop_at_failure() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let snapshot = fresh()
        .with_initializer(logging("first", &log, false))
        .with_initializer(logging("second", &log, true))
        .with_initializer(logging("third", &log, false));
    let error = snapshot.initialize().unwrap_err();
    assert!(matches!(error, Error::Initializer { .. }));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["first:pkg.Generated".to_string(), "second:pkg.Generated".to_string()]
    );
}

#[test]
fn only_runtime_annotations_of_the_supertype_are_visible() {
    let runtime = TypeDescription::class_named("pkg.Traced");
    let class_only = TypeDescription::class_named("pkg.Marker");
    let super_class = LatentType::new("pkg.Annotated")
        .annotation(AnnotationDescription::new(runtime.clone(), Some(RetentionPolicy::Runtime)))
        .annotation(AnnotationDescription::new(class_only.clone(), Some(RetentionPolicy::Class)))
        .build();
    assert_eq!(super_class.annotations().len(), 2);
    let snapshot = InstrumentedType::subclass(
        ClassFileVersion::JAVA_V8,
        super_class,
        Vec::new(),
        ACC_PUBLIC,
        &FixedName::new("pkg.AnnotatedImpl"),
    )
    .unwrap();
    assert!(snapshot.is_annotation_present(&runtime));
    assert!(!snapshot.is_annotation_present(&class_only));
    assert_eq!(snapshot.annotations().len(), 1);
}

#[test]
fn illegal_names_are_rejected() {
    for name in ["pkg.class", "pkg..Double", "1pkg.Name", "pkg.Base"] {
        let result = InstrumentedType::subclass(
            ClassFileVersion::JAVA_V8,
            base_class(),
            Vec::new(),
            ACC_PUBLIC,
            &FixedName::new(name),
        );
        assert!(matches!(result, Err(Error::IllegalName { .. })), "{} accepted", name);
    }
}

#[test]
fn suffixing_names_are_unique_and_rehome_java_types() {
    let naming = SuffixingName::new("Forged");
    let first = InstrumentedType::subclass(ClassFileVersion::JAVA_V8, base_class(), Vec::new(), ACC_PUBLIC, &naming).unwrap();
    let second = InstrumentedType::subclass(ClassFileVersion::JAVA_V8, base_class(), Vec::new(), ACC_PUBLIC, &naming).unwrap();
    assert_ne!(first.name(), second.name());
    assert!(first.name().starts_with("pkg.Base$$Forged$"));

    let config = Config::new();
    let once = config.subclass(base_class(), Vec::new()).unwrap();
    let again = config.subclass(base_class(), Vec::new()).unwrap();
    assert_ne!(once.name(), again.name());

    let object = config.subclass(TypeDescription::object(), Vec::new()).unwrap();
    assert!(object.name().starts_with("classforge.renamed.java.lang.Object$$Forged$"));
}
