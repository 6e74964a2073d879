//! Names of synthesized types.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::codegen::defs::ClassFileVersion;
use crate::description::TypeDescription;
use crate::error::{Error, Result};

/// What is known about a type before it is named
#[derive(Debug, Clone)]
pub struct UnnamedType<'a> {
    pub super_class: &'a TypeDescription,
    pub interfaces: &'a [TypeDescription],
    pub modifiers: u16,
    pub class_file_version: ClassFileVersion,
}

/// Decides the binary name of a synthesized type
pub trait NamingStrategy: fmt::Debug {
    fn name(&self, unnamed: &UnnamedType<'_>) -> String;
}

/// Always proposes the same name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedName(pub String);

impl FixedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl NamingStrategy for FixedName {
    fn name(&self, _unnamed: &UnnamedType<'_>) -> String {
        self.0.clone()
    }
}

/// Names a type after its supertype: `{super}$${suffix}${n}`.
///
/// Types in `java.` packages cannot be extended by user classes of the same
/// package, so their subclasses are moved below a separate package.
#[derive(Debug)]
pub struct SuffixingName {
    suffix: String,
    rehome_package: String,
    counter: AtomicU64,
}

impl SuffixingName {
    pub const DEFAULT_PACKAGE: &'static str = "classforge.renamed";

    pub fn new(suffix: impl Into<String>) -> Self {
        Self::with_package(suffix, Self::DEFAULT_PACKAGE)
    }

    pub fn with_package(suffix: impl Into<String>, rehome_package: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            rehome_package: rehome_package.into(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl NamingStrategy for SuffixingName {
    fn name(&self, unnamed: &UnnamedType<'_>) -> String {
        let mut super_name = unnamed.super_class.name();
        if super_name.starts_with("java.") {
            super_name = format!("{}.{}", self.rehome_package, super_name);
        }
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}$${}${}", super_name, self.suffix, n)
    }
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const", "continue",
    "default", "do", "double", "else", "enum", "extends", "final", "finally", "float", "for", "goto", "if",
    "implements", "import", "instanceof", "int", "interface", "long", "native", "new", "package", "private",
    "protected", "public", "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "try", "void", "volatile", "while", "true", "false", "null",
];

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Check that `name` is a legal binary type name not shared with the
/// supertype or any interface
pub fn validate_type_name(name: &str, super_class: &TypeDescription, interfaces: &[TypeDescription]) -> Result<()> {
    if name.is_empty() {
        return Err(Error::illegal_name(name, "empty name"));
    }
    for segment in name.split('.') {
        if JAVA_KEYWORDS.contains(&segment) {
            return Err(Error::illegal_name(name, format!("'{}' is a keyword", segment)));
        }
        if !is_identifier(segment) {
            return Err(Error::illegal_name(name, format!("'{}' is not an identifier", segment)));
        }
    }
    if super_class.name() == name {
        return Err(Error::illegal_name(name, "clashes with the supertype"));
    }
    if interfaces.iter().any(|interface| interface.name() == name) {
        return Err(Error::illegal_name(name, "clashes with an implemented interface"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unnamed(super_class: &TypeDescription) -> UnnamedType<'_> {
        UnnamedType {
            super_class,
            interfaces: &[],
            modifiers: 0,
            class_file_version: ClassFileVersion::default(),
        }
    }

    #[test]
    fn test_suffixing_name() {
        let strategy = SuffixingName::new("Forged");
        let foo = TypeDescription::class_named("pkg.Foo");
        assert_eq!(strategy.name(&unnamed(&foo)), "pkg.Foo$$Forged$1");
        assert_eq!(strategy.name(&unnamed(&foo)), "pkg.Foo$$Forged$2");
        let object = TypeDescription::object();
        assert_eq!(strategy.name(&unnamed(&object)), "classforge.renamed.java.lang.Object$$Forged$3");
    }

    #[test]
    fn test_validation() {
        let object = TypeDescription::object();
        assert!(validate_type_name("pkg.Foo$1", &object, &[]).is_ok());
        assert!(validate_type_name("_x.Y", &object, &[]).is_ok());
        assert!(validate_type_name("", &object, &[]).is_err());
        assert!(validate_type_name("pkg..Foo", &object, &[]).is_err());
        assert!(validate_type_name("pkg.class.Foo", &object, &[]).is_err());
        assert!(validate_type_name("1pkg.Foo", &object, &[]).is_err());
        assert!(validate_type_name("java.lang.Object", &object, &[]).is_err());
        let runnable = TypeDescription::interface_named("java.lang.Runnable");
        assert!(validate_type_name("java.lang.Runnable", &object, &[runnable]).is_err());
    }
}
