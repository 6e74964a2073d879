//! Build configuration

use crate::codegen::assign::{default_assigner, VoidAwareAssigner};
use crate::codegen::defs::access_flags::*;
use crate::codegen::defs::ClassFileVersion;
use crate::codegen::stack::Context;
use crate::description::TypeDescription;
use crate::error::Result;
use std::sync::Arc;

use crate::instrumented::{InstrumentedType, SuffixingName};

/// Settings shared by everything synthesized in one build session
#[derive(Debug, Clone)]
pub struct Config {
    /// Class file format the generated types target
    pub class_file_version: ClassFileVersion,
    /// Modifiers of generated types
    pub modifiers: u16,
    /// Whether coercions may narrow references with a checked cast
    pub dynamic_typing: bool,
    /// Whether assigning `void` to a value pushes the value's default
    pub void_default_value: bool,
    /// Names generated subclasses; clones of a config share its counter
    naming: Arc<SuffixingName>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_file_version: ClassFileVersion::JAVA_V8,
            modifiers: ACC_PUBLIC | ACC_SUPER,
            dynamic_typing: false,
            void_default_value: false,
            naming: Arc::new(SuffixingName::new("Forged")),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_file_version(mut self, class_file_version: ClassFileVersion) -> Self {
        self.class_file_version = class_file_version;
        self
    }

    pub fn with_modifiers(mut self, modifiers: u16) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_dynamic_typing(mut self, dynamic_typing: bool) -> Self {
        self.dynamic_typing = dynamic_typing;
        self
    }

    pub fn with_void_default_value(mut self, void_default_value: bool) -> Self {
        self.void_default_value = void_default_value;
        self
    }

    /// Restarts the naming sequence under a new suffix
    pub fn with_naming_suffix(mut self, naming_suffix: impl Into<String>) -> Self {
        self.naming = Arc::new(SuffixingName::new(naming_suffix));
        self
    }

    pub fn naming_suffix(&self) -> &str {
        self.naming.suffix()
    }

    /// Emission context for method bodies of generated types
    pub fn context(&self) -> Context {
        Context::new(self.class_file_version)
    }

    /// The default coercion chain
    pub fn assigner(&self) -> VoidAwareAssigner {
        default_assigner(self.void_default_value)
    }

    /// First snapshot of a subclass of `super_class`
    pub fn subclass(&self, super_class: TypeDescription, interfaces: Vec<TypeDescription>) -> Result<InstrumentedType> {
        InstrumentedType::subclass(
            self.class_file_version,
            super_class,
            interfaces,
            self.modifiers,
            self.naming.as_ref(),
        )
    }
}
