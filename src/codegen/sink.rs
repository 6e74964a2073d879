//! Emission sinks receiving the instructions of a method body.

use std::fmt;

use super::opcodes;

/// Constant pushed by an `ldc` family instruction
#[derive(Debug, Clone, PartialEq)]
pub enum LdcConstant {
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String(String),
    /// A class literal, given by internal name (or descriptor for arrays)
    Type(String),
    /// A method type, given by method descriptor
    MethodType(String),
}

impl LdcConstant {
    /// Whether the constant occupies two stack slots (and is loaded by `ldc2_w`)
    pub fn is_wide(&self) -> bool {
        matches!(self, LdcConstant::Long(_) | LdcConstant::Double(_))
    }
}

/// Receiver of emitted instructions.
///
/// Implementations are single-pass: instructions arrive exactly once, in
/// emission order.
pub trait MethodSink {
    /// Instruction without operands
    fn visit_insn(&mut self, opcode: u8);

    /// `BIPUSH`, `SIPUSH` or `NEWARRAY` with its immediate operand
    fn visit_int_insn(&mut self, opcode: u8, operand: i32);

    fn visit_ldc(&mut self, constant: LdcConstant);

    /// Local variable load or store (`ILOAD`..`ALOAD`, `ISTORE`..`ASTORE`)
    fn visit_var_insn(&mut self, opcode: u8, slot: u16);

    /// `NEW`, `ANEWARRAY`, `CHECKCAST` with an internal type name
    fn visit_type_insn(&mut self, opcode: u8, internal_name: &str);

    fn visit_field_insn(&mut self, opcode: u8, owner: &str, name: &str, descriptor: &str);

    fn visit_method_insn(&mut self, opcode: u8, owner: &str, name: &str, descriptor: &str, is_interface: bool);
}

/// An instruction as captured by [`InstructionRecorder`]
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Simple(u8),
    Int(u8, i32),
    Ldc(LdcConstant),
    Var(u8, u16),
    Type(u8, String),
    Field {
        opcode: u8,
        owner: String,
        name: String,
        descriptor: String,
    },
    Method {
        opcode: u8,
        owner: String,
        name: String,
        descriptor: String,
        is_interface: bool,
    },
}

impl Instruction {
    pub fn opcode(&self) -> u8 {
        match self {
            Instruction::Simple(opcode)
            | Instruction::Int(opcode, _)
            | Instruction::Var(opcode, _)
            | Instruction::Type(opcode, _) => *opcode,
            Instruction::Ldc(constant) => {
                if constant.is_wide() {
                    opcodes::LDC2_W
                } else {
                    opcodes::LDC
                }
            }
            Instruction::Field { opcode, .. } | Instruction::Method { opcode, .. } => *opcode,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = opcodes::mnemonic(self.opcode());
        match self {
            Instruction::Simple(_) => f.write_str(mnemonic),
            Instruction::Int(_, operand) => write!(f, "{} {}", mnemonic, operand),
            Instruction::Ldc(constant) => write!(f, "{} {:?}", mnemonic, constant),
            Instruction::Var(_, slot) => write!(f, "{} {}", mnemonic, slot),
            Instruction::Type(_, name) => write!(f, "{} {}", mnemonic, name),
            Instruction::Field { owner, name, descriptor, .. } => {
                write!(f, "{} {}.{}:{}", mnemonic, owner, name, descriptor)
            }
            Instruction::Method { owner, name, descriptor, .. } => {
                write!(f, "{} {}.{}{}", mnemonic, owner, name, descriptor)
            }
        }
    }
}

/// A sink that records every instruction it receives
#[derive(Debug, Default, Clone)]
pub struct InstructionRecorder {
    instructions: Vec<Instruction>,
}

impl InstructionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    pub fn opcodes(&self) -> Vec<u8> {
        self.instructions.iter().map(Instruction::opcode).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl MethodSink for InstructionRecorder {
    fn visit_insn(&mut self, opcode: u8) {
        self.instructions.push(Instruction::Simple(opcode));
    }

    fn visit_int_insn(&mut self, opcode: u8, operand: i32) {
        self.instructions.push(Instruction::Int(opcode, operand));
    }

    fn visit_ldc(&mut self, constant: LdcConstant) {
        self.instructions.push(Instruction::Ldc(constant));
    }

    fn visit_var_insn(&mut self, opcode: u8, slot: u16) {
        self.instructions.push(Instruction::Var(opcode, slot));
    }

    fn visit_type_insn(&mut self, opcode: u8, internal_name: &str) {
        self.instructions.push(Instruction::Type(opcode, internal_name.to_string()));
    }

    fn visit_field_insn(&mut self, opcode: u8, owner: &str, name: &str, descriptor: &str) {
        self.instructions.push(Instruction::Field {
            opcode,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        });
    }

    fn visit_method_insn(&mut self, opcode: u8, owner: &str, name: &str, descriptor: &str, is_interface: bool) {
        self.instructions.push(Instruction::Method {
            opcode,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            is_interface,
        });
    }
}
