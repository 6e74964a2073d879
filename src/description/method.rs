//! Read-only method descriptions

use std::fmt;

use super::types::{TypeDescription, TypeList};
use crate::codegen::defs::access_flags::*;
use crate::codegen::defs::{CONSTRUCTOR_METHOD_NAME, STATIC_INITIALIZER_METHOD_NAME};

/// Describes a method, constructor or type initializer of some declaring type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescription {
    declaring_type: TypeDescription,
    internal_name: String,
    return_type: TypeDescription,
    parameter_types: TypeList,
    exception_types: TypeList,
    modifiers: u16,
}

impl MethodDescription {
    pub fn new(
        declaring_type: TypeDescription,
        internal_name: impl Into<String>,
        return_type: TypeDescription,
        parameter_types: impl Into<TypeList>,
        modifiers: u16,
    ) -> Self {
        Self {
            declaring_type,
            internal_name: internal_name.into(),
            return_type,
            parameter_types: parameter_types.into(),
            exception_types: TypeList::empty(),
            modifiers,
        }
    }

    pub fn constructor(declaring_type: TypeDescription, parameter_types: impl Into<TypeList>, modifiers: u16) -> Self {
        Self::new(declaring_type, CONSTRUCTOR_METHOD_NAME, TypeDescription::void(), parameter_types, modifiers)
    }

    pub fn type_initializer(declaring_type: TypeDescription) -> Self {
        Self::new(
            declaring_type,
            STATIC_INITIALIZER_METHOD_NAME,
            TypeDescription::void(),
            TypeList::empty(),
            ACC_STATIC,
        )
    }

    pub fn with_exceptions(mut self, exception_types: impl Into<TypeList>) -> Self {
        self.exception_types = exception_types.into();
        self
    }

    pub fn declaring_type(&self) -> &TypeDescription {
        &self.declaring_type
    }

    pub fn internal_name(&self) -> &str {
        &self.internal_name
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

    pub fn is_static(&self) -> bool {
        self.modifiers & ACC_STATIC != 0
    }

    pub fn is_private(&self) -> bool {
        self.modifiers & ACC_PRIVATE != 0
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers & ACC_ABSTRACT != 0
    }

    pub fn is_bridge(&self) -> bool {
        self.modifiers & ACC_BRIDGE != 0
    }

    pub fn is_constructor(&self) -> bool {
        self.internal_name == CONSTRUCTOR_METHOD_NAME
    }

    pub fn is_type_initializer(&self) -> bool {
        self.internal_name == STATIC_INITIALIZER_METHOD_NAME
    }

    /// A concrete, virtual method declared on an interface
    pub fn is_default_method(&self) -> bool {
        self.declaring_type.is_interface()
            && !self.is_abstract()
            && !self.is_static()
            && !self.is_private()
            && !self.is_bridge()
            && !self.is_type_initializer()
    }

    /// Operand stack slots consumed by invoking this method, receiver included
    pub fn stack_size(&self) -> i32 {
        self.parameter_types.stack_size() + if self.is_static() { 0 } else { 1 }
    }

    /// Whether this method may be invoked non-virtually on `target`
    pub fn is_specializable_for(&self, target: &TypeDescription) -> bool {
        if self.is_static() || self.is_type_initializer() {
            false
        } else if self.is_private() || self.is_constructor() || self.is_default_method() {
            &self.declaring_type == target
        } else {
            !self.is_abstract() && self.declaring_type.is_assignable_from(target)
        }
    }

    /// Name and descriptor; identifies the method within its declaring type
    pub fn unique_signature(&self) -> String {
        format!("{}{}", self.internal_name, self.descriptor())
    }
}

impl fmt::Display for MethodDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters: Vec<String> = self.parameter_types.iter().map(|p| p.source_name()).collect();
        write!(
            f,
            "{} {}.{}({})",
            self.return_type,
            self.declaring_type,
            self.internal_name,
            parameters.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo_type() -> TypeDescription {
        TypeDescription::class_named("pkg.Foo")
    }

    #[test]
    fn test_descriptor_and_stack_size() {
        let method = MethodDescription::new(
            foo_type(),
            "bar",
            TypeDescription::long(),
            vec![TypeDescription::int(), TypeDescription::double(), TypeDescription::string()],
            ACC_PUBLIC,
        );
        assert_eq!(method.descriptor(), "(IDLjava/lang/String;)J");
        assert_eq!(method.stack_size(), 5);
        let static_method = MethodDescription::new(foo_type(), "baz", TypeDescription::void(), TypeList::empty(), ACC_STATIC);
        assert_eq!(static_method.stack_size(), 0);
    }

    #[test]
    fn test_default_method_detection() {
        let interface = TypeDescription::interface_named("pkg.Api");
        let default = MethodDescription::new(interface.clone(), "run", TypeDescription::void(), TypeList::empty(), ACC_PUBLIC);
        let abstract_method =
            MethodDescription::new(interface, "call", TypeDescription::void(), TypeList::empty(), ACC_PUBLIC | ACC_ABSTRACT);
        assert!(default.is_default_method());
        assert!(!abstract_method.is_default_method());
    }

    #[test]
    fn test_specializable() {
        let base = foo_type();
        let sub = crate::description::LatentType::new("pkg.Sub").super_class(base.clone()).build();
        let method = MethodDescription::new(base.clone(), "bar", TypeDescription::void(), TypeList::empty(), ACC_PUBLIC);
        assert!(method.is_specializable_for(&sub));
        assert!(method.is_specializable_for(&base));

        let private = MethodDescription::new(base.clone(), "hidden", TypeDescription::void(), TypeList::empty(), ACC_PRIVATE);
        assert!(private.is_specializable_for(&base));
        assert!(!private.is_specializable_for(&sub));

        let abstract_method =
            MethodDescription::new(base.clone(), "todo", TypeDescription::void(), TypeList::empty(), ACC_PUBLIC | ACC_ABSTRACT);
        assert!(!abstract_method.is_specializable_for(&sub));
    }
}
