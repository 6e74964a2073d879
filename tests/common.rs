// Common test utilities

#![allow(dead_code)]

use classforge::codegen::annotation::{AnnotatedSink, AnnotationVisitor, ElementValue};
use classforge::codegen::defs::access_flags::*;
use classforge::codegen::sink::InstructionRecorder;
use classforge::codegen::stack::{Context, Size, StackManipulation};
use classforge::description::{LatentType, MethodDescription, TypeDescription, TypeList};

/// Apply a manipulation to a fresh recorder
pub fn record(manipulation: &dyn StackManipulation) -> (Size, InstructionRecorder) {
    let mut recorder = InstructionRecorder::new();
    let size = manipulation.apply(&mut recorder, &Context::default());
    (size, recorder)
}

pub fn base_class() -> TypeDescription {
    TypeDescription::class_named("pkg.Base")
}

pub fn sub_class() -> TypeDescription {
    LatentType::new("pkg.Sub").super_class(base_class()).build()
}

pub fn api_interface() -> TypeDescription {
    TypeDescription::interface_named("pkg.Api")
}

/// `void name(int)` declared on `owner`
pub fn method(owner: TypeDescription, name: &str, modifiers: u16) -> MethodDescription {
    MethodDescription::new(owner, name, TypeDescription::void(), TypeList::new(vec![TypeDescription::int()]), modifiers)
}

pub fn public_method(owner: TypeDescription) -> MethodDescription {
    method(owner, "run", ACC_PUBLIC)
}

/// Annotation events as flat strings, in the order they were received
#[derive(Debug, Default)]
pub struct RecordingAnnotationSink {
    pub events: Vec<String>,
}

impl AnnotatedSink for RecordingAnnotationSink {
    fn visit_annotation(&mut self, descriptor: &str, visible: bool) -> Box<dyn AnnotationVisitor + '_> {
        self.events.push(format!("annotation {} visible={}", descriptor, visible));
        Box::new(RecordingVisitor { events: &mut self.events })
    }
}

pub struct RecordingVisitor<'a> {
    events: &'a mut Vec<String>,
}

fn label(name: Option<&str>) -> &str {
    name.unwrap_or("_")
}

impl AnnotationVisitor for RecordingVisitor<'_> {
    fn visit(&mut self, name: Option<&str>, value: ElementValue) {
        self.events.push(format!("visit {} {:?}", label(name), value));
    }

    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, constant: &str) {
        self.events.push(format!("enum {} {} {}", label(name), descriptor, constant));
    }

    fn visit_annotation(&mut self, name: Option<&str>, descriptor: &str) -> Box<dyn AnnotationVisitor + '_> {
        self.events.push(format!("nested {} {}", label(name), descriptor));
        Box::new(RecordingVisitor { events: &mut *self.events })
    }

    fn visit_array(&mut self, name: Option<&str>) -> Box<dyn AnnotationVisitor + '_> {
        self.events.push(format!("array {}", label(name)));
        Box::new(RecordingVisitor { events: &mut *self.events })
    }

    fn visit_end(&mut self) {
        self.events.push("end".to_string());
    }
}
