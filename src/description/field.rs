//! Read-only field descriptions

use std::fmt;

use super::types::TypeDescription;
use crate::codegen::defs::access_flags::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescription {
    declaring_type: TypeDescription,
    internal_name: String,
    field_type: TypeDescription,
    modifiers: u16,
}

impl FieldDescription {
    pub fn new(
        declaring_type: TypeDescription,
        internal_name: impl Into<String>,
        field_type: TypeDescription,
        modifiers: u16,
    ) -> Self {
        Self {
            declaring_type,
            internal_name: internal_name.into(),
            field_type,
            modifiers,
        }
    }

    pub fn declaring_type(&self) -> &TypeDescription {
        &self.declaring_type
    }

    pub fn internal_name(&self) -> &str {
        &self.internal_name
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

    pub fn is_static(&self) -> bool {
        self.modifiers & ACC_STATIC != 0
    }
}

impl fmt::Display for FieldDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}", self.field_type, self.declaring_type, self.internal_name)
    }
}
