//! Class-file encoding of annotations.
//!
//! [`AnnotationsAttribute`] and [`ParameterAnnotationsAttribute`] collect the
//! bodies of the `Runtime[In]Visible[Parameter]Annotations` attributes.
//! Element counts are written as placeholders and patched when the owning
//! writer is ended.

use super::annotation::{AnnotatedSink, AnnotationVisitor, ElementValue, ParameterAnnotatedSink};
use super::constpool::ConstantPool;
use super::error::{ConstPoolError, ConstPoolResult};

/// Encoded annotations of one visibility
#[derive(Debug, Default, Clone)]
struct Section {
    count: u16,
    bytes: Vec<u8>,
}

impl Section {
    /// `u2 num_annotations` followed by the annotations
    fn to_attribute(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(2 + self.bytes.len());
        body.extend_from_slice(&self.count.to_be_bytes());
        body.extend_from_slice(&self.bytes);
        body
    }
}

/// Attribute bodies produced by an annotation sink; `None` when no annotation
/// of that visibility was written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationAttributes {
    pub visible: Option<Vec<u8>>,
    pub invisible: Option<Vec<u8>>,
}

/// Writes one `annotation` or array `element_value` structure
pub struct AnnotationBytesWriter<'a> {
    pool: &'a mut ConstantPool,
    out: &'a mut Vec<u8>,
    error: &'a mut Option<ConstPoolError>,
    count_at: usize,
    count: u16,
    named: bool,
}

impl<'a> AnnotationBytesWriter<'a> {
    /// Start an `annotation` structure of the given type
    pub fn annotation(
        pool: &'a mut ConstantPool,
        out: &'a mut Vec<u8>,
        error: &'a mut Option<ConstPoolError>,
        descriptor: &str,
    ) -> Self {
        let mut writer = Self { pool, out, error, count_at: 0, count: 0, named: true };
        let type_index = writer.pool.add_utf8(descriptor);
        writer.index(type_index);
        writer.placeholder();
        writer
    }

    /// Start the values of an array `element_value` whose tag is already written
    fn array(pool: &'a mut ConstantPool, out: &'a mut Vec<u8>, error: &'a mut Option<ConstPoolError>) -> Self {
        let mut writer = Self { pool, out, error, count_at: 0, count: 0, named: false };
        writer.placeholder();
        writer
    }

    fn placeholder(&mut self) {
        self.count_at = self.out.len();
        self.out.extend_from_slice(&[0, 0]);
    }

    fn index(&mut self, index: ConstPoolResult<u16>) {
        let index = match index {
            Ok(index) => index,
            Err(error) => {
                if self.error.is_none() {
                    *self.error = Some(error);
                }
                0
            }
        };
        self.out.extend_from_slice(&index.to_be_bytes());
    }

    /// Element name for pairs; array elements are unnamed
    fn begin_element(&mut self, name: Option<&str>, tag: u8) {
        if self.named {
            let name_index = self.pool.add_utf8(name.unwrap_or("value"));
            self.index(name_index);
        }
        self.out.push(tag);
        self.count += 1;
    }
}

impl AnnotationVisitor for AnnotationBytesWriter<'_> {
    fn visit(&mut self, name: Option<&str>, value: ElementValue) {
        let (tag, index) = match value {
            ElementValue::Boolean(v) => (b'Z', self.pool.add_integer(v as i32)),
            ElementValue::Byte(v) => (b'B', self.pool.add_integer(v as i32)),
            ElementValue::Char(v) => (b'C', self.pool.add_integer(v as i32)),
            ElementValue::Short(v) => (b'S', self.pool.add_integer(v as i32)),
            ElementValue::Int(v) => (b'I', self.pool.add_integer(v)),
            ElementValue::Long(v) => (b'J', self.pool.add_long(v)),
            ElementValue::Float(v) => (b'F', self.pool.add_float(v)),
            ElementValue::Double(v) => (b'D', self.pool.add_double(v)),
            ElementValue::String(v) => (b's', self.pool.add_utf8(&v)),
            ElementValue::Type(descriptor) => (b'c', self.pool.add_utf8(&descriptor)),
        };
        self.begin_element(name, tag);
        self.index(index);
    }

    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, constant: &str) {
        self.begin_element(name, b'e');
        let type_index = self.pool.add_utf8(descriptor);
        self.index(type_index);
        let constant_index = self.pool.add_utf8(constant);
        self.index(constant_index);
    }

    fn visit_annotation(&mut self, name: Option<&str>, descriptor: &str) -> Box<dyn AnnotationVisitor + '_> {
        self.begin_element(name, b'@');
        Box::new(AnnotationBytesWriter::annotation(self.pool, self.out, self.error, descriptor))
    }

    fn visit_array(&mut self, name: Option<&str>) -> Box<dyn AnnotationVisitor + '_> {
        self.begin_element(name, b'[');
        Box::new(AnnotationBytesWriter::array(self.pool, self.out, self.error))
    }

    fn visit_end(&mut self) {
        self.out[self.count_at..self.count_at + 2].copy_from_slice(&self.count.to_be_bytes());
    }
}

/// Annotations of a class, method or field
pub struct AnnotationsAttribute<'p> {
    pool: &'p mut ConstantPool,
    visible: Section,
    invisible: Section,
    error: Option<ConstPoolError>,
}

impl<'p> AnnotationsAttribute<'p> {
    pub fn new(pool: &'p mut ConstantPool) -> Self {
        Self {
            pool,
            visible: Section::default(),
            invisible: Section::default(),
            error: None,
        }
    }

    pub fn finish(self) -> ConstPoolResult<AnnotationAttributes> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(AnnotationAttributes {
            visible: (self.visible.count > 0).then(|| self.visible.to_attribute()),
            invisible: (self.invisible.count > 0).then(|| self.invisible.to_attribute()),
        })
    }
}

impl AnnotatedSink for AnnotationsAttribute<'_> {
    fn visit_annotation(&mut self, descriptor: &str, visible: bool) -> Box<dyn AnnotationVisitor + '_> {
        let section = if visible { &mut self.visible } else { &mut self.invisible };
        section.count += 1;
        Box::new(AnnotationBytesWriter::annotation(self.pool, &mut section.bytes, &mut self.error, descriptor))
    }
}

/// Annotations of the parameters of a method
pub struct ParameterAnnotationsAttribute<'p> {
    pool: &'p mut ConstantPool,
    visible: Vec<Section>,
    invisible: Vec<Section>,
    error: Option<ConstPoolError>,
}

impl<'p> ParameterAnnotationsAttribute<'p> {
    pub fn new(pool: &'p mut ConstantPool, parameters: usize) -> Self {
        Self {
            pool,
            visible: vec![Section::default(); parameters],
            invisible: vec![Section::default(); parameters],
            error: None,
        }
    }

    fn encode(sections: &[Section]) -> Option<Vec<u8>> {
        if sections.iter().all(|s| s.count == 0) {
            return None;
        }
        let mut body = vec![sections.len() as u8];
        for section in sections {
            body.extend_from_slice(&section.to_attribute());
        }
        Some(body)
    }

    pub fn finish(self) -> ConstPoolResult<AnnotationAttributes> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(AnnotationAttributes {
            visible: Self::encode(&self.visible),
            invisible: Self::encode(&self.invisible),
        })
    }
}

impl ParameterAnnotatedSink for ParameterAnnotationsAttribute<'_> {
    fn visit_parameter_annotation(
        &mut self,
        parameter: usize,
        descriptor: &str,
        visible: bool,
    ) -> Box<dyn AnnotationVisitor + '_> {
        // both attributes declare the same parameter count
        if self.visible.len() <= parameter {
            self.visible.resize(parameter + 1, Section::default());
            self.invisible.resize(parameter + 1, Section::default());
        }
        let sections = if visible { &mut self.visible } else { &mut self.invisible };
        let section = &mut sections[parameter];
        section.count += 1;
        Box::new(AnnotationBytesWriter::annotation(self.pool, &mut section.bytes, &mut self.error, descriptor))
    }
}
