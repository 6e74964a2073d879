//! Bytecode encoding sink.
//!
//! [`CodeBuffer`] turns the instructions it receives into the byte layout of a
//! `Code` attribute's `code` array, resolving symbolic operands against a
//! [`ConstantPool`]. Encoding failures cannot be reported through the
//! [`MethodSink`] interface, so the first one is latched and returned by
//! [`CodeBuffer::finish`].

use super::constpool::ConstantPool;
use super::error::{ConstPoolError, ConstPoolResult};
use super::opcodes;
use super::sink::{LdcConstant, MethodSink};

pub struct CodeBuffer<'a> {
    pool: &'a mut ConstantPool,
    code: Vec<u8>,
    error: Option<ConstPoolError>,
}

impl<'a> CodeBuffer<'a> {
    pub fn new(pool: &'a mut ConstantPool) -> Self {
        Self {
            pool,
            code: Vec::new(),
            error: None,
        }
    }

    /// Current code offset
    pub fn cur_cp(&self) -> usize {
        self.code.len()
    }

    /// The encoded code array, or the first encoding failure
    pub fn finish(self) -> ConstPoolResult<Vec<u8>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.code),
        }
    }

    fn emit1(&mut self, od: u8) {
        self.code.push(od);
    }

    fn emit2(&mut self, od: u16) {
        self.code.extend_from_slice(&od.to_be_bytes());
    }

    fn emitop(&mut self, op: u8) {
        self.emit1(op);
    }

    fn emitop2(&mut self, op: u8, od: u16) {
        self.emitop(op);
        self.emit2(od);
    }

    fn fail(&mut self, error: ConstPoolError) {
        log::debug!("code buffer failure at pc {}: {}", self.code.len(), error);
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Resolve a pool index, latching a failure as index 0
    fn resolve(&mut self, index: ConstPoolResult<u16>) -> u16 {
        match index {
            Ok(index) => index,
            Err(error) => {
                self.fail(error);
                0
            }
        }
    }
}

/// Operand stack slots taken by the arguments of a method descriptor
pub fn argument_slots(descriptor: &str) -> u16 {
    let mut slots = 0;
    let mut chars = descriptor.chars().skip_while(|c| *c == '(');
    while let Some(c) = chars.next() {
        match c {
            ')' => break,
            'J' | 'D' => slots += 2,
            'L' => {
                for c in chars.by_ref() {
                    if c == ';' {
                        break;
                    }
                }
                slots += 1;
            }
            '[' => {
                let mut element = chars.next();
                while element == Some('[') {
                    element = chars.next();
                }
                if element == Some('L') {
                    for c in chars.by_ref() {
                        if c == ';' {
                            break;
                        }
                    }
                }
                slots += 1;
            }
            _ => slots += 1,
        }
    }
    slots
}

impl MethodSink for CodeBuffer<'_> {
    fn visit_insn(&mut self, opcode: u8) {
        self.emitop(opcode);
    }

    fn visit_int_insn(&mut self, opcode: u8, operand: i32) {
        match opcode {
            opcodes::BIPUSH => {
                if i8::try_from(operand).is_err() {
                    self.fail(ConstPoolError::OperandOutOfRange { opcode: "BIPUSH", value: operand as i64 });
                }
                self.emitop(opcode);
                self.emit1(operand as i8 as u8);
            }
            opcodes::SIPUSH => {
                if i16::try_from(operand).is_err() {
                    self.fail(ConstPoolError::OperandOutOfRange { opcode: "SIPUSH", value: operand as i64 });
                }
                self.emitop2(opcode, operand as i16 as u16);
            }
            _ => {
                self.emitop(opcode);
                self.emit1(operand as u8);
            }
        }
    }

    fn visit_ldc(&mut self, constant: LdcConstant) {
        let index = match &constant {
            LdcConstant::Int(value) => self.pool.add_integer(*value),
            LdcConstant::Float(value) => self.pool.add_float(*value),
            LdcConstant::Long(value) => self.pool.add_long(*value),
            LdcConstant::Double(value) => self.pool.add_double(*value),
            LdcConstant::String(value) => self.pool.add_string(value),
            LdcConstant::Type(name) => self.pool.add_class(name),
            LdcConstant::MethodType(descriptor) => self.pool.add_method_type(descriptor),
        };
        let index = self.resolve(index);
        if constant.is_wide() {
            self.emitop2(opcodes::LDC2_W, index);
        } else if index <= u8::MAX as u16 {
            self.emitop(opcodes::LDC);
            self.emit1(index as u8);
        } else {
            self.emitop2(opcodes::LDC_W, index);
        }
    }

    fn visit_var_insn(&mut self, opcode: u8, slot: u16) {
        if slot <= 3 {
            let short_form = if opcode >= opcodes::ISTORE {
                opcodes::ISTORE_0 + (opcode - opcodes::ISTORE) * 4
            } else {
                opcodes::ILOAD_0 + (opcode - opcodes::ILOAD) * 4
            };
            self.emitop(short_form + slot as u8);
        } else if slot <= u8::MAX as u16 {
            self.emitop(opcode);
            self.emit1(slot as u8);
        } else {
            self.emitop(opcodes::WIDE);
            self.emitop2(opcode, slot);
        }
    }

    fn visit_type_insn(&mut self, opcode: u8, internal_name: &str) {
        let index = self.pool.add_class(internal_name);
        let index = self.resolve(index);
        self.emitop2(opcode, index);
    }

    fn visit_field_insn(&mut self, opcode: u8, owner: &str, name: &str, descriptor: &str) {
        let index = self.pool.add_field_ref(owner, name, descriptor);
        let index = self.resolve(index);
        self.emitop2(opcode, index);
    }

    fn visit_method_insn(&mut self, opcode: u8, owner: &str, name: &str, descriptor: &str, is_interface: bool) {
        let index = if is_interface {
            self.pool.add_interface_method_ref(owner, name, descriptor)
        } else {
            self.pool.add_method_ref(owner, name, descriptor)
        };
        let index = self.resolve(index);
        self.emitop2(opcode, index);
        if opcode == opcodes::INVOKEINTERFACE {
            // count includes the receiver; followed by a zero byte
            self.emit1((argument_slots(descriptor) + 1) as u8);
            self.emit1(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_slots() {
        assert_eq!(argument_slots("()V"), 0);
        assert_eq!(argument_slots("(IJ)V"), 3);
        assert_eq!(argument_slots("(Ljava/lang/String;D[I[[Ljava/lang/Object;)J"), 5);
    }

    #[test]
    fn test_short_and_wide_locals() {
        let mut pool = ConstantPool::new();
        let mut buffer = CodeBuffer::new(&mut pool);
        buffer.visit_var_insn(opcodes::ALOAD, 0);
        buffer.visit_var_insn(opcodes::DLOAD, 3);
        buffer.visit_var_insn(opcodes::ISTORE, 2);
        buffer.visit_var_insn(opcodes::ILOAD, 9);
        buffer.visit_var_insn(opcodes::LLOAD, 300);
        let code = buffer.finish().unwrap();
        assert_eq!(
            code,
            vec![0x2a, 0x29, 0x3d, opcodes::ILOAD, 9, opcodes::WIDE, opcodes::LLOAD, 0x01, 0x2c]
        );
    }

    #[test]
    fn test_invokeinterface_count() {
        let mut pool = ConstantPool::new();
        let mut buffer = CodeBuffer::new(&mut pool);
        buffer.visit_method_insn(opcodes::INVOKEINTERFACE, "pkg/Api", "call", "(JI)V", true);
        let code = buffer.finish().unwrap();
        assert_eq!(code.len(), 5);
        assert_eq!(code[0], opcodes::INVOKEINTERFACE);
        assert_eq!(code[3], 4);
        assert_eq!(code[4], 0);
    }

    #[test]
    fn test_bipush_out_of_range_is_latched() {
        let mut pool = ConstantPool::new();
        let mut buffer = CodeBuffer::new(&mut pool);
        buffer.visit_int_insn(opcodes::BIPUSH, 1000);
        assert!(matches!(buffer.finish(), Err(ConstPoolError::OperandOutOfRange { .. })));
    }
}
