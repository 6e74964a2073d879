//! The model of a type under construction.
//!
//! An [`InstrumentedType`] starts out as a subclass of some supertype and
//! accumulates synthetic fields, methods and a loaded-type initializer. Every
//! addition returns a new snapshot; snapshots share their member lists until
//! one of them is extended.

pub mod initializer;
pub mod naming;

pub use initializer::{CompoundInitializer, LoadedTypeInitializer, NoOpInitializer};
pub use naming::{validate_type_name, FixedName, NamingStrategy, SuffixingName, UnnamedType};

use std::fmt;
use std::sync::Arc;

use crate::codegen::defs::access_flags::*;
use crate::codegen::defs::ClassFileVersion;
use crate::description::annotation::AnnotationDescription;
use crate::description::{FieldDescription, LatentType, MethodDescription, TypeDescription, TypeList};
use crate::error::{Error, MemberKind, Result};

/// A field added to an instrumented type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldToken {
    name: String,
    field_type: TypeDescription,
    modifiers: u16,
}

impl FieldToken {
    pub fn new(name: impl Into<String>, field_type: TypeDescription, modifiers: u16) -> Self {
        Self { name: name.into(), field_type, modifiers }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &TypeDescription {
        &self.field_type
    }

    pub fn modifiers(&self) -> u16 {
        self.modifiers
    }

    pub fn descriptor(&self) -> String {
        self.field_type.descriptor()
    }

    /// Fields clash when name and descriptor are equal
    fn clashes_with(&self, other: &FieldToken) -> bool {
        self.name == other.name && self.descriptor() == other.descriptor()
    }

    pub fn describe(&self, declaring_type: &TypeDescription) -> FieldDescription {
        FieldDescription::new(declaring_type.clone(), self.name.clone(), self.field_type.clone(), self.modifiers)
    }
}

/// A method added to an instrumented type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodToken {
    name: String,
    return_type: TypeDescription,
    parameter_types: TypeList,
    exception_types: TypeList,
    modifiers: u16,
}

impl MethodToken {
    pub fn new(
        name: impl Into<String>,
        return_type: TypeDescription,
        parameter_types: impl Into<TypeList>,
        exception_types: impl Into<TypeList>,
        modifiers: u16,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameter_types: parameter_types.into(),
            exception_types: exception_types.into(),
            modifiers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> &TypeDescription {
        &self.return_type
    }

    pub fn parameter_types(&self) -> &TypeList {
        &self.parameter_types
    }

    pub fn exception_types(&self) -> &TypeList {
        &self.exception_types
    }

    pub fn modifiers(&self) -> u16 {
        self.modifiers
    }

    pub fn descriptor(&self) -> String {
        format!("({}){}", self.parameter_types.descriptors(), self.return_type.descriptor())
    }

    pub fn unique_signature(&self) -> String {
        format!("{}{}", self.name, self.descriptor())
    }

    pub fn describe(&self, declaring_type: &TypeDescription) -> MethodDescription {
        MethodDescription::new(
            declaring_type.clone(),
            self.name.clone(),
            self.return_type.clone(),
            self.parameter_types.clone(),
            self.modifiers,
        )
        .with_exceptions(self.exception_types.clone())
    }
}

/// Immutable, versioned snapshot of a type under construction
#[derive(Debug, Clone)]
pub struct InstrumentedType {
    version: u64,
    class_file_version: ClassFileVersion,
    super_class: TypeDescription,
    interfaces: Arc<[TypeDescription]>,
    modifiers: u16,
    name: String,
    fields: Arc<Vec<FieldToken>>,
    methods: Arc<Vec<MethodToken>>,
    initializer: Arc<dyn LoadedTypeInitializer>,
}

impl InstrumentedType {
    /// A new subclass of `super_class` named by `naming`.
    ///
    /// Fails when the proposed name is not a legal type name or clashes with
    /// the supertype or an interface.
    pub fn subclass(
        class_file_version: ClassFileVersion,
        super_class: TypeDescription,
        interfaces: Vec<TypeDescription>,
        modifiers: u16,
        naming: &dyn NamingStrategy,
    ) -> Result<Self> {
        let name = naming.name(&UnnamedType {
            super_class: &super_class,
            interfaces: &interfaces,
            modifiers,
            class_file_version,
        });
        validate_type_name(&name, &super_class, &interfaces)?;
        log::debug!("instrumenting {} as subclass of {}", name, super_class);
        Ok(Self {
            version: 0,
            class_file_version,
            super_class,
            interfaces: interfaces.into(),
            modifiers,
            name,
            fields: Arc::new(Vec::new()),
            methods: Arc::new(Vec::new()),
            initializer: Arc::new(NoOpInitializer),
        })
    }

    /// A snapshot with `name` appended as a field
    pub fn with_field(&self, name: impl Into<String>, field_type: TypeDescription, modifiers: u16) -> Result<Self> {
        let token = FieldToken::new(name, field_type, modifiers);
        let signature = format!("{}:{}", token.name, token.descriptor());
        if self.fields.iter().any(|field| field.clashes_with(&token)) {
            return Err(Error::duplicate(MemberKind::Field, signature, self.name.clone()));
        }
        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        fields.extend(self.fields.iter().cloned());
        fields.push(token);
        let next = Self {
            version: self.version + 1,
            fields: Arc::new(fields),
            ..self.clone()
        };
        log::debug!("{} v{}: added field {}", next.name, next.version, signature);
        Ok(next)
    }

    /// A snapshot with a method appended
    pub fn with_method(
        &self,
        name: impl Into<String>,
        return_type: TypeDescription,
        parameter_types: impl Into<TypeList>,
        exception_types: impl Into<TypeList>,
        modifiers: u16,
    ) -> Result<Self> {
        let token = MethodToken::new(name, return_type, parameter_types, exception_types, modifiers);
        let signature = token.unique_signature();
        if self.methods.iter().any(|method| method.unique_signature() == signature) {
            return Err(Error::duplicate(MemberKind::Method, signature, self.name.clone()));
        }
        let mut methods = Vec::with_capacity(self.methods.len() + 1);
        methods.extend(self.methods.iter().cloned());
        methods.push(token);
        let next = Self {
            version: self.version + 1,
            methods: Arc::new(methods),
            ..self.clone()
        };
        log::debug!("{} v{}: added method {}", next.name, next.version, signature);
        Ok(next)
    }

    /// A snapshot whose initializer runs the current one, then `initializer`
    pub fn with_initializer(&self, initializer: Arc<dyn LoadedTypeInitializer>) -> Self {
        let composed = CompoundInitializer::of(self.initializer.clone(), initializer);
        let next = Self {
            version: self.version + 1,
            initializer: Arc::new(composed),
            ..self.clone()
        };
        log::debug!("{} v{}: added initializer", next.name, next.version);
        next
    }

    /// The same members without any pending initializer
    pub fn detach(&self) -> Self {
        Self {
            initializer: Arc::new(NoOpInitializer),
            ..self.clone()
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn class_file_version(&self) -> ClassFileVersion {
        self.class_file_version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn internal_name(&self) -> String {
        self.name.replace('.', "/")
    }

    pub fn modifiers(&self) -> u16 {
        self.modifiers
    }

    pub fn is_interface(&self) -> bool {
        self.modifiers & ACC_INTERFACE != 0
    }

    /// Declared supertype; interfaces have none
    pub fn supertype(&self) -> Option<&TypeDescription> {
        if self.is_interface() {
            None
        } else {
            Some(&self.super_class)
        }
    }

    pub fn interfaces(&self) -> &[TypeDescription] {
        &self.interfaces
    }

    pub fn fields(&self) -> &[FieldToken] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodToken] {
        &self.methods
    }

    pub fn initializer(&self) -> &Arc<dyn LoadedTypeInitializer> {
        &self.initializer
    }

    pub fn has_pending_initializer(&self) -> bool {
        self.initializer.is_alive()
    }

    /// Run the pending initializer against the loaded type
    pub fn initialize(&self) -> Result<()> {
        self.initializer.on_load(&self.describe())
    }

    /// Runtime-retained annotations of the supertype
    pub fn annotations(&self) -> Vec<&AnnotationDescription> {
        self.super_class
            .annotations()
            .iter()
            .filter(|annotation| annotation.is_runtime_retained())
            .collect()
    }

    pub fn annotation(&self, annotation_type: &TypeDescription) -> Option<&AnnotationDescription> {
        self.annotations()
            .into_iter()
            .find(|annotation| annotation.annotation_type() == annotation_type)
    }

    pub fn is_annotation_present(&self, annotation_type: &TypeDescription) -> bool {
        self.annotation(annotation_type).is_some()
    }

    /// Description of this snapshot as a type that can be referenced by
    /// emitted code
    pub fn describe(&self) -> TypeDescription {
        let mut latent = LatentType::new(self.name.clone()).modifiers(self.modifiers);
        latent = if self.is_interface() {
            latent.no_super_class()
        } else {
            latent.super_class(self.super_class.clone())
        };
        for interface in self.interfaces.iter() {
            latent = latent.interface(interface.clone());
        }
        for annotation in self.annotations() {
            latent = latent.annotation(annotation.clone());
        }
        latent.build()
    }

    pub fn field_descriptions(&self) -> Vec<FieldDescription> {
        let declaring_type = self.describe();
        self.fields.iter().map(|field| field.describe(&declaring_type)).collect()
    }

    pub fn method_descriptions(&self) -> Vec<MethodDescription> {
        let declaring_type = self.describe();
        self.methods.iter().map(|method| method.describe(&declaring_type)).collect()
    }
}

impl fmt::Display for InstrumentedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} extends {} (v{})", self.name, self.super_class, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::annotation::RetentionPolicy;

    fn base() -> InstrumentedType {
        InstrumentedType::subclass(
            ClassFileVersion::default(),
            TypeDescription::class_named("pkg.Foo"),
            Vec::new(),
            ACC_PUBLIC,
            &FixedName::new("pkg.Foo$Sub"),
        )
        .unwrap()
    }

    #[test]
    fn test_versions_increase() {
        let snapshot = base();
        assert_eq!(snapshot.version(), 0);
        let next = snapshot.with_field("x", TypeDescription::int(), 0).unwrap();
        let last = next
            .with_method("run", TypeDescription::void(), TypeList::empty(), TypeList::empty(), ACC_PUBLIC)
            .unwrap();
        assert_eq!(next.version(), 1);
        assert_eq!(last.version(), 2);
        assert_eq!(last.detach().version(), 2);
    }

    #[test]
    fn test_same_name_other_descriptor_is_allowed() {
        let snapshot = base().with_field("x", TypeDescription::int(), 0).unwrap();
        let widened = snapshot.with_field("x", TypeDescription::long(), 0).unwrap();
        assert_eq!(widened.fields().len(), 2);
    }

    #[test]
    fn test_describe_declares_members() {
        let snapshot = base()
            .with_method("run", TypeDescription::void(), TypeList::empty(), TypeList::empty(), ACC_PUBLIC)
            .unwrap();
        let methods = snapshot.method_descriptions();
        assert_eq!(methods[0].declaring_type().name(), "pkg.Foo$Sub");
        assert!(methods[0].declaring_type().is_assignable_to(&TypeDescription::class_named("pkg.Foo")));
    }

    #[test]
    fn test_runtime_annotations_of_supertype() {
        let retained = TypeDescription::class_named("pkg.Retained");
        let compiled = TypeDescription::class_named("pkg.Compiled");
        let super_class = LatentType::new("pkg.Annotated")
            .annotation(AnnotationDescription::new(retained.clone(), Some(RetentionPolicy::Runtime)))
            .annotation(AnnotationDescription::new(compiled.clone(), Some(RetentionPolicy::Class)))
            .build();
        let snapshot = InstrumentedType::subclass(
            ClassFileVersion::default(),
            super_class,
            Vec::new(),
            ACC_PUBLIC,
            &FixedName::new("pkg.Annotated$Sub"),
        )
        .unwrap();
        assert_eq!(snapshot.annotations().len(), 1);
        assert!(snapshot.is_annotation_present(&retained));
        assert!(!snapshot.is_annotation_present(&compiled));
    }
}
