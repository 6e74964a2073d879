//! Generic classfile-specific definitions

/// Name of a constructor
pub const CONSTRUCTOR_METHOD_NAME: &str = "<init>";

/// Name of a static initializer
pub const STATIC_INITIALIZER_METHOD_NAME: &str = "<clinit>";

/// Access flags for classes, fields, and methods
pub mod access_flags {
    pub const ACC_PUBLIC: u16 = 0x0001;
    pub const ACC_PRIVATE: u16 = 0x0002;
    pub const ACC_PROTECTED: u16 = 0x0004;
    pub const ACC_STATIC: u16 = 0x0008;
    pub const ACC_FINAL: u16 = 0x0010;
    pub const ACC_SUPER: u16 = 0x0020;
    pub const ACC_SYNCHRONIZED: u16 = 0x0020;
    pub const ACC_VOLATILE: u16 = 0x0040;
    pub const ACC_BRIDGE: u16 = 0x0040;
    pub const ACC_TRANSIENT: u16 = 0x0080;
    pub const ACC_VARARGS: u16 = 0x0080;
    pub const ACC_NATIVE: u16 = 0x0100;
    pub const ACC_INTERFACE: u16 = 0x0200;
    pub const ACC_ABSTRACT: u16 = 0x0400;
    pub const ACC_STRICT: u16 = 0x0800;
    pub const ACC_SYNTHETIC: u16 = 0x1000;
    pub const ACC_ANNOTATION: u16 = 0x2000;
    pub const ACC_ENUM: u16 = 0x4000;
}

/// JVM major version constants
pub mod major_versions {
    pub const JAVA_1_1: u16 = 45;
    pub const JAVA_1_2: u16 = 46;
    pub const JAVA_1_3: u16 = 47;
    pub const JAVA_1_4: u16 = 48;
    pub const JAVA_5: u16 = 49;
    pub const JAVA_6: u16 = 50;
    pub const JAVA_7: u16 = 51;
    pub const JAVA_8: u16 = 52;
    pub const JAVA_11: u16 = 55;
    pub const JAVA_17: u16 = 61;
    pub const JAVA_21: u16 = 65;
}

/// Version of the class file format a type is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassFileVersion {
    major: u16,
    minor: u16,
}

impl ClassFileVersion {
    pub const JAVA_V5: ClassFileVersion = ClassFileVersion::new(major_versions::JAVA_5);
    pub const JAVA_V6: ClassFileVersion = ClassFileVersion::new(major_versions::JAVA_6);
    pub const JAVA_V7: ClassFileVersion = ClassFileVersion::new(major_versions::JAVA_7);
    pub const JAVA_V8: ClassFileVersion = ClassFileVersion::new(major_versions::JAVA_8);

    pub const fn new(major: u16) -> Self {
        Self { major, minor: 0 }
    }

    pub const fn with_minor(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u16 {
        self.major
    }

    pub fn minor(&self) -> u16 {
        self.minor
    }

    /// Whether `ldc` may push class literals (Java 5 onwards)
    pub fn supports_class_constants(&self) -> bool {
        self.major >= major_versions::JAVA_5
    }

    /// Whether `ldc` may push method types and handles (Java 7 onwards)
    pub fn supports_method_types(&self) -> bool {
        self.major >= major_versions::JAVA_7
    }
}

impl Default for ClassFileVersion {
    fn default() -> Self {
        Self::JAVA_V8
    }
}

impl std::fmt::Display for ClassFileVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
