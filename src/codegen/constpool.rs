//! Constant pool for class file emission.
//!
//! Entries are deduplicated and numbered from 1; `long` and `double` entries
//! occupy two indices as required by the class file format.

use std::collections::HashMap;

use super::error::{ConstPoolError, ConstPoolResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    String(u16),
    FieldRef(u16, u16),
    MethodRef(u16, u16),
    InterfaceMethodRef(u16, u16),
    NameAndType(u16, u16),
    MethodType(u16),
}

mod tags {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELD_REF: u8 = 9;
    pub const METHOD_REF: u8 = 10;
    pub const INTERFACE_METHOD_REF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_TYPE: u8 = 16;
}

impl Constant {
    fn tag(&self) -> u8 {
        match self {
            Constant::Utf8(_) => tags::UTF8,
            Constant::Integer(_) => tags::INTEGER,
            Constant::Float(_) => tags::FLOAT,
            Constant::Long(_) => tags::LONG,
            Constant::Double(_) => tags::DOUBLE,
            Constant::Class(_) => tags::CLASS,
            Constant::String(_) => tags::STRING,
            Constant::FieldRef(..) => tags::FIELD_REF,
            Constant::MethodRef(..) => tags::METHOD_REF,
            Constant::InterfaceMethodRef(..) => tags::INTERFACE_METHOD_REF,
            Constant::NameAndType(..) => tags::NAME_AND_TYPE,
            Constant::MethodType(_) => tags::METHOD_TYPE,
        }
    }

    /// The `cp_info` structure of this entry
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.tag()];
        match self {
            Constant::Utf8(value) => {
                let encoded = modified_utf8(value);
                bytes.extend_from_slice(&(encoded.len() as u16).to_be_bytes());
                bytes.extend_from_slice(&encoded);
            }
            Constant::Integer(value) => bytes.extend_from_slice(&value.to_be_bytes()),
            Constant::Float(value) => bytes.extend_from_slice(&value.to_bits().to_be_bytes()),
            Constant::Long(value) => bytes.extend_from_slice(&value.to_be_bytes()),
            Constant::Double(value) => bytes.extend_from_slice(&value.to_bits().to_be_bytes()),
            Constant::Class(index) | Constant::String(index) | Constant::MethodType(index) => {
                bytes.extend_from_slice(&index.to_be_bytes())
            }
            Constant::FieldRef(first, second)
            | Constant::MethodRef(first, second)
            | Constant::InterfaceMethodRef(first, second)
            | Constant::NameAndType(first, second) => {
                bytes.extend_from_slice(&first.to_be_bytes());
                bytes.extend_from_slice(&second.to_be_bytes());
            }
        }
        bytes
    }

    /// Number of pool indices the entry occupies
    pub fn width(&self) -> u16 {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }
}

/// Encoded width of a char in the class file's modified UTF-8
fn modified_utf8_width(c: char) -> usize {
    match c as u32 {
        0x01..=0x7f => 1,
        0x00 | 0x80..=0x7ff => 2,
        0x800..=0xffff => 3,
        _ => 6,
    }
}

fn modified_utf8_len(value: &str) -> usize {
    value.chars().map(modified_utf8_width).sum()
}

/// `NUL` takes two bytes and supplementary characters are written as a
/// surrogate pair of three-byte sequences
pub fn modified_utf8(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(modified_utf8_len(value));
    let mut units = [0u16; 2];
    for c in value.chars() {
        if modified_utf8_width(c) == 1 {
            out.push(c as u8);
            continue;
        }
        for unit in c.encode_utf16(&mut units).iter().map(|u| *u as u32) {
            if unit < 0x800 {
                out.push(0xc0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3f) as u8);
            } else {
                out.push(0xe0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3f) as u8);
                out.push(0x80 | (unit & 0x3f) as u8);
            }
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct ConstantPool {
    constants: Vec<(u16, Constant)>,
    lookup: HashMap<Vec<u8>, u16>,
    next_index: u16,
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantPool {
    pub fn new() -> Self {
        Self {
            constants: Vec::new(),
            lookup: HashMap::new(),
            next_index: 1,
        }
    }

    fn store(&mut self, constant: Constant) -> ConstPoolResult<u16> {
        let key = constant.to_bytes();
        if let Some(index) = self.lookup.get(&key) {
            return Ok(*index);
        }
        let index = self.next_index;
        // constant_pool_count is a u2 holding the highest index plus one
        let next = index
            .checked_add(constant.width())
            .ok_or(ConstPoolError::OutOfSpace)?;
        self.next_index = next;
        self.lookup.insert(key, index);
        self.constants.push((index, constant));
        Ok(index)
    }

    /// Fails when the modified UTF-8 form does not fit the u2 length prefix
    pub fn add_utf8(&mut self, value: &str) -> ConstPoolResult<u16> {
        let length = modified_utf8_len(value);
        if length > u16::MAX as usize {
            return Err(ConstPoolError::Utf8TooLong { length });
        }
        self.store(Constant::Utf8(value.to_string()))
    }

    pub fn add_class(&mut self, name: &str) -> ConstPoolResult<u16> {
        let name_index = self.add_utf8(name)?;
        self.store(Constant::Class(name_index))
    }

    pub fn add_name_and_type(&mut self, name: &str, descriptor: &str) -> ConstPoolResult<u16> {
        let name_index = self.add_utf8(name)?;
        let descriptor_index = self.add_utf8(descriptor)?;
        self.store(Constant::NameAndType(name_index, descriptor_index))
    }

    pub fn add_field_ref(&mut self, class: &str, name: &str, descriptor: &str) -> ConstPoolResult<u16> {
        let class_index = self.add_class(class)?;
        let name_and_type_index = self.add_name_and_type(name, descriptor)?;
        self.store(Constant::FieldRef(class_index, name_and_type_index))
    }

    pub fn add_method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> ConstPoolResult<u16> {
        let class_index = self.add_class(class)?;
        let name_and_type_index = self.add_name_and_type(name, descriptor)?;
        self.store(Constant::MethodRef(class_index, name_and_type_index))
    }

    pub fn add_interface_method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> ConstPoolResult<u16> {
        let class_index = self.add_class(class)?;
        let name_and_type_index = self.add_name_and_type(name, descriptor)?;
        self.store(Constant::InterfaceMethodRef(class_index, name_and_type_index))
    }

    pub fn add_string(&mut self, value: &str) -> ConstPoolResult<u16> {
        let utf8_index = self.add_utf8(value)?;
        self.store(Constant::String(utf8_index))
    }

    pub fn add_integer(&mut self, value: i32) -> ConstPoolResult<u16> {
        self.store(Constant::Integer(value))
    }

    pub fn add_float(&mut self, value: f32) -> ConstPoolResult<u16> {
        self.store(Constant::Float(value))
    }

    pub fn add_long(&mut self, value: i64) -> ConstPoolResult<u16> {
        self.store(Constant::Long(value))
    }

    pub fn add_double(&mut self, value: f64) -> ConstPoolResult<u16> {
        self.store(Constant::Double(value))
    }

    pub fn add_method_type(&mut self, descriptor: &str) -> ConstPoolResult<u16> {
        let descriptor_index = self.add_utf8(descriptor)?;
        self.store(Constant::MethodType(descriptor_index))
    }

    pub fn get(&self, index: u16) -> ConstPoolResult<&Constant> {
        self.constants
            .iter()
            .find(|(at, _)| *at == index)
            .map(|(_, constant)| constant)
            .ok_or(ConstPoolError::InvalidIndex(index))
    }

    /// Value of `constant_pool_count`: the highest used index plus one
    pub fn count(&self) -> u16 {
        self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&self.count().to_be_bytes());
        for (_, constant) in &self.constants {
            bytes.extend_from_slice(&constant.to_bytes());
        }
        bytes
    }
}
