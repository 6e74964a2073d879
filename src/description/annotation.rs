//! Annotation instances described as explicit, typed member tables.

use super::types::TypeDescription;

/// Retention declared on an annotation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetentionPolicy {
    Source,
    Class,
    Runtime,
}

/// Value of a single annotation member
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Boolean(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Type(TypeDescription),
    Enum {
        enum_type: TypeDescription,
        constant: String,
    },
    Annotation(AnnotationDescription),
    Array(Vec<AnnotationValue>),
}

/// A named member of an annotation instance.
///
/// The value is `Err` with a reason when the metadata provider could not read it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationMember {
    pub name: String,
    pub value: Result<AnnotationValue, String>,
}

impl AnnotationMember {
    pub fn new(name: impl Into<String>, value: AnnotationValue) -> Self {
        Self { name: name.into(), value: Ok(value) }
    }

    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { name: name.into(), value: Err(reason.into()) }
    }
}

/// An annotation instance: its type, its declared retention and its members in
/// declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDescription {
    annotation_type: TypeDescription,
    retention: Option<RetentionPolicy>,
    members: Vec<AnnotationMember>,
}

impl AnnotationDescription {
    pub fn new(annotation_type: TypeDescription, retention: Option<RetentionPolicy>) -> Self {
        Self { annotation_type, retention, members: Vec::new() }
    }

    pub fn with_member(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.members.push(AnnotationMember::new(name, value));
        self
    }

    pub fn with_unreadable_member(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.members.push(AnnotationMember::unreadable(name, reason));
        self
    }

    pub fn annotation_type(&self) -> &TypeDescription {
        &self.annotation_type
    }

    /// Declared retention, `None` when the annotation type carries no retention
    pub fn retention(&self) -> Option<RetentionPolicy> {
        self.retention
    }

    pub fn members(&self) -> &[AnnotationMember] {
        &self.members
    }

    pub fn is_runtime_retained(&self) -> bool {
        self.retention == Some(RetentionPolicy::Runtime)
    }
}
