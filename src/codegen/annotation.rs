//! Annotation emission.
//!
//! An [`AnnotationAppender`] writes [`AnnotationDescription`]s into the
//! annotation sink of a type, method, method parameter or field. Whether an
//! annotation is written at all, and whether it is marked visible, follows from
//! its retention. Member values are checked before any writer is opened, so an
//! unreadable value never leaves a half-written annotation behind.

use super::error::AnnotationError;
use crate::description::annotation::{AnnotationDescription, AnnotationValue, RetentionPolicy};

/// How an annotation is represented in the class file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationVisibility {
    /// Written and visible at run time
    Runtime,
    /// Written but not visible at run time
    ClassFile,
    /// Never written
    Invisible,
}

impl AnnotationVisibility {
    pub fn of(annotation: &AnnotationDescription) -> Self {
        match annotation.retention() {
            None | Some(RetentionPolicy::Source) => AnnotationVisibility::Invisible,
            Some(RetentionPolicy::Class) => AnnotationVisibility::ClassFile,
            Some(RetentionPolicy::Runtime) => AnnotationVisibility::Runtime,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, AnnotationVisibility::Runtime)
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, AnnotationVisibility::Invisible)
    }
}

/// A constant element value
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Boolean(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// A class literal, by descriptor
    Type(String),
}

/// Writer of a single annotation or array element value.
///
/// `name` is `None` for array elements. Nested writers borrow their parent and
/// must be ended before the parent receives further values.
pub trait AnnotationVisitor {
    fn visit(&mut self, name: Option<&str>, value: ElementValue);

    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, constant: &str);

    fn visit_annotation(&mut self, name: Option<&str>, descriptor: &str) -> Box<dyn AnnotationVisitor + '_>;

    fn visit_array(&mut self, name: Option<&str>) -> Box<dyn AnnotationVisitor + '_>;

    fn visit_end(&mut self);
}

/// Sink of a type, method or field accepting annotations
pub trait AnnotatedSink {
    fn visit_annotation(&mut self, descriptor: &str, visible: bool) -> Box<dyn AnnotationVisitor + '_>;
}

/// Sink accepting annotations on the parameters of a method
pub trait ParameterAnnotatedSink {
    fn visit_parameter_annotation(
        &mut self,
        parameter: usize,
        descriptor: &str,
        visible: bool,
    ) -> Box<dyn AnnotationVisitor + '_>;
}

/// Where annotations are written to
pub enum AnnotationTarget<'a> {
    OnType(&'a mut dyn AnnotatedSink),
    OnMethod(&'a mut dyn AnnotatedSink),
    OnMethodParameter(&'a mut dyn ParameterAnnotatedSink, usize),
    OnField(&'a mut dyn AnnotatedSink),
}

impl AnnotationTarget<'_> {
    fn visit(&mut self, descriptor: &str, visible: bool) -> Box<dyn AnnotationVisitor + '_> {
        match self {
            AnnotationTarget::OnType(sink) | AnnotationTarget::OnMethod(sink) | AnnotationTarget::OnField(sink) => {
                sink.visit_annotation(descriptor, visible)
            }
            AnnotationTarget::OnMethodParameter(sink, parameter) => {
                sink.visit_parameter_annotation(*parameter, descriptor, visible)
            }
        }
    }
}

pub struct AnnotationAppender<'a> {
    target: AnnotationTarget<'a>,
}

impl<'a> AnnotationAppender<'a> {
    pub fn new(target: AnnotationTarget<'a>) -> Self {
        Self { target }
    }

    /// Append an annotation with the visibility implied by its retention
    pub fn append_retained(&mut self, annotation: &AnnotationDescription) -> Result<&mut Self, AnnotationError> {
        self.append(annotation, AnnotationVisibility::of(annotation))
    }

    pub fn append(
        &mut self,
        annotation: &AnnotationDescription,
        visibility: AnnotationVisibility,
    ) -> Result<&mut Self, AnnotationError> {
        if visibility.is_suppressed() {
            log::trace!("suppressing annotation {}", annotation.annotation_type());
            return Ok(self);
        }
        check_readable(annotation)?;
        let descriptor = annotation.annotation_type().descriptor();
        {
            let mut visitor = self.target.visit(&descriptor, visibility.is_visible());
            handle(visitor.as_mut(), annotation);
        }
        Ok(self)
    }
}

/// Fails on the first member, at any nesting depth, that could not be read
fn check_readable(annotation: &AnnotationDescription) -> Result<(), AnnotationError> {
    for member in annotation.members() {
        match &member.value {
            Ok(value) => check_value(value)?,
            Err(reason) => {
                return Err(AnnotationError::MetadataUnreadable {
                    annotation: annotation.annotation_type().name(),
                    member: member.name.clone(),
                    reason: reason.clone(),
                })
            }
        }
    }
    Ok(())
}

fn check_value(value: &AnnotationValue) -> Result<(), AnnotationError> {
    match value {
        AnnotationValue::Annotation(nested) => check_readable(nested),
        AnnotationValue::Array(values) => values.iter().try_for_each(check_value),
        _ => Ok(()),
    }
}

fn handle(visitor: &mut (dyn AnnotationVisitor + '_), annotation: &AnnotationDescription) {
    for member in annotation.members() {
        if let Ok(value) = &member.value {
            apply(visitor, Some(&member.name), value);
        }
    }
    visitor.visit_end();
}

fn apply(visitor: &mut (dyn AnnotationVisitor + '_), name: Option<&str>, value: &AnnotationValue) {
    match value {
        AnnotationValue::Annotation(nested) => {
            let descriptor = nested.annotation_type().descriptor();
            let mut child = visitor.visit_annotation(name, &descriptor);
            handle(child.as_mut(), nested);
        }
        AnnotationValue::Enum { enum_type, constant } => {
            visitor.visit_enum(name, &enum_type.descriptor(), constant);
        }
        AnnotationValue::Array(values) => {
            let mut array = visitor.visit_array(name);
            for element in values {
                apply(array.as_mut(), None, element);
            }
            array.visit_end();
        }
        AnnotationValue::Type(type_description) => {
            visitor.visit(name, ElementValue::Type(type_description.descriptor()));
        }
        AnnotationValue::Boolean(v) => visitor.visit(name, ElementValue::Boolean(*v)),
        AnnotationValue::Byte(v) => visitor.visit(name, ElementValue::Byte(*v)),
        AnnotationValue::Char(v) => visitor.visit(name, ElementValue::Char(*v)),
        AnnotationValue::Short(v) => visitor.visit(name, ElementValue::Short(*v)),
        AnnotationValue::Int(v) => visitor.visit(name, ElementValue::Int(*v)),
        AnnotationValue::Long(v) => visitor.visit(name, ElementValue::Long(*v)),
        AnnotationValue::Float(v) => visitor.visit(name, ElementValue::Float(*v)),
        AnnotationValue::Double(v) => visitor.visit(name, ElementValue::Double(*v)),
        AnnotationValue::String(v) => visitor.visit(name, ElementValue::String(v.clone())),
    }
}
