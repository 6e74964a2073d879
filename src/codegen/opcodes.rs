//! JVM opcodes emitted by the stack manipulations in this crate.
//!
//! Values follow the Java Virtual Machine Specification, chapter 6.

// Constants
pub const NOP: u8 = 0x00;
pub const ACONST_NULL: u8 = 0x01;
pub const ICONST_M1: u8 = 0x02;
pub const ICONST_0: u8 = 0x03;
pub const ICONST_1: u8 = 0x04;
pub const ICONST_2: u8 = 0x05;
pub const ICONST_3: u8 = 0x06;
pub const ICONST_4: u8 = 0x07;
pub const ICONST_5: u8 = 0x08;
pub const LCONST_0: u8 = 0x09;
pub const LCONST_1: u8 = 0x0a;
pub const FCONST_0: u8 = 0x0b;
pub const FCONST_1: u8 = 0x0c;
pub const FCONST_2: u8 = 0x0d;
pub const DCONST_0: u8 = 0x0e;
pub const DCONST_1: u8 = 0x0f;
pub const BIPUSH: u8 = 0x10;
pub const SIPUSH: u8 = 0x11;
pub const LDC: u8 = 0x12;
pub const LDC_W: u8 = 0x13;
pub const LDC2_W: u8 = 0x14;

// Local variable loads; the `_0` forms are followed by `_1`, `_2`, `_3`
pub const ILOAD: u8 = 0x15;
pub const LLOAD: u8 = 0x16;
pub const FLOAD: u8 = 0x17;
pub const DLOAD: u8 = 0x18;
pub const ALOAD: u8 = 0x19;
pub const ILOAD_0: u8 = 0x1a;
pub const ALOAD_0: u8 = 0x2a;

// Array loads
pub const IALOAD: u8 = 0x2e;
pub const LALOAD: u8 = 0x2f;
pub const FALOAD: u8 = 0x30;
pub const DALOAD: u8 = 0x31;
pub const AALOAD: u8 = 0x32;
pub const BALOAD: u8 = 0x33;
pub const CALOAD: u8 = 0x34;
pub const SALOAD: u8 = 0x35;

// Local variable stores
pub const ISTORE: u8 = 0x36;
pub const LSTORE: u8 = 0x37;
pub const FSTORE: u8 = 0x38;
pub const DSTORE: u8 = 0x39;
pub const ASTORE: u8 = 0x3a;
pub const ISTORE_0: u8 = 0x3b;

// Array stores
pub const IASTORE: u8 = 0x4f;
pub const LASTORE: u8 = 0x50;
pub const FASTORE: u8 = 0x51;
pub const DASTORE: u8 = 0x52;
pub const AASTORE: u8 = 0x53;
pub const BASTORE: u8 = 0x54;
pub const CASTORE: u8 = 0x55;
pub const SASTORE: u8 = 0x56;

// Stack operations
pub const POP: u8 = 0x57;
pub const POP2: u8 = 0x58;
pub const DUP: u8 = 0x59;
pub const DUP2: u8 = 0x5c;

// Widening conversions
pub const I2L: u8 = 0x85;
pub const I2F: u8 = 0x86;
pub const I2D: u8 = 0x87;
pub const L2F: u8 = 0x89;
pub const L2D: u8 = 0x8a;
pub const F2D: u8 = 0x8d;

// Returns
pub const IRETURN: u8 = 0xac;
pub const LRETURN: u8 = 0xad;
pub const FRETURN: u8 = 0xae;
pub const DRETURN: u8 = 0xaf;
pub const ARETURN: u8 = 0xb0;
pub const RETURN: u8 = 0xb1;

// Member access and invocation
pub const GETSTATIC: u8 = 0xb2;
pub const PUTSTATIC: u8 = 0xb3;
pub const GETFIELD: u8 = 0xb4;
pub const PUTFIELD: u8 = 0xb5;
pub const INVOKEVIRTUAL: u8 = 0xb6;
pub const INVOKESPECIAL: u8 = 0xb7;
pub const INVOKESTATIC: u8 = 0xb8;
pub const INVOKEINTERFACE: u8 = 0xb9;

// Objects and arrays
pub const NEW: u8 = 0xbb;
pub const NEWARRAY: u8 = 0xbc;
pub const ANEWARRAY: u8 = 0xbd;
pub const ATHROW: u8 = 0xbf;
pub const CHECKCAST: u8 = 0xc0;
pub const WIDE: u8 = 0xc4;

/// Operand of `NEWARRAY` per primitive component type
pub mod array_types {
    pub const T_BOOLEAN: u8 = 4;
    pub const T_CHAR: u8 = 5;
    pub const T_FLOAT: u8 = 6;
    pub const T_DOUBLE: u8 = 7;
    pub const T_BYTE: u8 = 8;
    pub const T_SHORT: u8 = 9;
    pub const T_INT: u8 = 10;
    pub const T_LONG: u8 = 11;
}

/// Mnemonic of an opcode emitted by this crate, used for diagnostics
pub fn mnemonic(opcode: u8) -> &'static str {
    match opcode {
        NOP => "NOP",
        ACONST_NULL => "ACONST_NULL",
        ICONST_M1..=ICONST_5 => "ICONST",
        LCONST_0 | LCONST_1 => "LCONST",
        FCONST_0..=FCONST_2 => "FCONST",
        DCONST_0 | DCONST_1 => "DCONST",
        BIPUSH => "BIPUSH",
        SIPUSH => "SIPUSH",
        LDC => "LDC",
        LDC_W => "LDC_W",
        LDC2_W => "LDC2_W",
        ILOAD..=ALOAD => "LOAD",
        IALOAD..=SALOAD => "ALOAD_ELEMENT",
        ISTORE..=ASTORE => "STORE",
        IASTORE..=SASTORE => "ASTORE_ELEMENT",
        POP => "POP",
        POP2 => "POP2",
        DUP => "DUP",
        DUP2 => "DUP2",
        I2L => "I2L",
        I2F => "I2F",
        I2D => "I2D",
        L2F => "L2F",
        L2D => "L2D",
        F2D => "F2D",
        IRETURN..=RETURN => "RETURN",
        GETSTATIC => "GETSTATIC",
        PUTSTATIC => "PUTSTATIC",
        GETFIELD => "GETFIELD",
        PUTFIELD => "PUTFIELD",
        INVOKEVIRTUAL => "INVOKEVIRTUAL",
        INVOKESPECIAL => "INVOKESPECIAL",
        INVOKESTATIC => "INVOKESTATIC",
        INVOKEINTERFACE => "INVOKEINTERFACE",
        NEW => "NEW",
        NEWARRAY => "NEWARRAY",
        ANEWARRAY => "ANEWARRAY",
        ATHROW => "ATHROW",
        CHECKCAST => "CHECKCAST",
        WIDE => "WIDE",
        _ => "UNKNOWN",
    }
}
