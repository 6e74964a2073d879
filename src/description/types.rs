//! Type descriptions consumed by the emission engine.
//!
//! A [`TypeDescription`] is a cheap, shareable handle onto a primitive type, an
//! array type or a class/interface definition. Class definitions are latent: they
//! describe a type by name, modifiers, supertype, interfaces and runtime-visible
//! annotations without requiring the type to exist anywhere else.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::annotation::AnnotationDescription;
use crate::codegen::defs::access_flags::*;
use crate::codegen::stack::Size;

/// Primitive types of the JVM, including `void`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }

    pub fn descriptor(&self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
            PrimitiveType::Void => 'V',
        }
    }

    pub fn stack_size(&self) -> StackSize {
        match self {
            PrimitiveType::Void => StackSize::Zero,
            PrimitiveType::Long | PrimitiveType::Double => StackSize::Double,
            _ => StackSize::Single,
        }
    }

    /// The wrapper type boxing this primitive, `None` for `void`
    pub fn wrapper(&self) -> Option<&'static TypeDescription> {
        let wrapper: &'static TypeDescription = match self {
            PrimitiveType::Boolean => &*BOOLEAN_WRAPPER,
            PrimitiveType::Byte => &*BYTE_WRAPPER,
            PrimitiveType::Char => &*CHARACTER_WRAPPER,
            PrimitiveType::Short => &*SHORT_WRAPPER,
            PrimitiveType::Int => &*INTEGER_WRAPPER,
            PrimitiveType::Long => &*LONG_WRAPPER,
            PrimitiveType::Float => &*FLOAT_WRAPPER,
            PrimitiveType::Double => &*DOUBLE_WRAPPER,
            PrimitiveType::Void => return None,
        };
        Some(wrapper)
    }

    /// The primitive boxed by the wrapper type of the given binary name
    pub fn for_wrapper(name: &str) -> Option<PrimitiveType> {
        match name {
            "java.lang.Boolean" => Some(PrimitiveType::Boolean),
            "java.lang.Byte" => Some(PrimitiveType::Byte),
            "java.lang.Character" => Some(PrimitiveType::Char),
            "java.lang.Short" => Some(PrimitiveType::Short),
            "java.lang.Integer" => Some(PrimitiveType::Int),
            "java.lang.Long" => Some(PrimitiveType::Long),
            "java.lang.Float" => Some(PrimitiveType::Float),
            "java.lang.Double" => Some(PrimitiveType::Double),
            _ => None,
        }
    }

    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Void,
    ];
}

/// Number of operand stack slots a value occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StackSize {
    Zero,
    Single,
    Double,
}

impl StackSize {
    pub fn size(&self) -> i32 {
        match self {
            StackSize::Zero => 0,
            StackSize::Single => 1,
            StackSize::Double => 2,
        }
    }

    pub fn of(type_description: &TypeDescription) -> StackSize {
        type_description.stack_size()
    }

    /// A size that grows the stack by this many slots
    pub fn to_increasing_size(&self) -> Size {
        Size::new(self.size(), self.size())
    }

    /// A size that shrinks the stack by this many slots
    pub fn to_decreasing_size(&self) -> Size {
        Size::new(-self.size(), 0)
    }

    pub fn maximum(self, other: StackSize) -> StackSize {
        self.max(other)
    }
}

#[derive(Debug)]
enum TypeKind {
    Primitive(PrimitiveType),
    Array(TypeDescription),
    Class(ClassDefinition),
}

#[derive(Debug)]
struct ClassDefinition {
    name: String,
    modifiers: u16,
    super_class: Option<TypeDescription>,
    interfaces: Vec<TypeDescription>,
    annotations: Vec<AnnotationDescription>,
}

/// Shared, immutable description of a type
#[derive(Clone)]
pub struct TypeDescription(Arc<TypeKind>);

pub static OBJECT: Lazy<TypeDescription> =
    Lazy::new(|| LatentType::new("java.lang.Object").no_super_class().build());
pub static CLONEABLE: Lazy<TypeDescription> =
    Lazy::new(|| LatentType::new("java.lang.Cloneable").modifiers(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT).build());
pub static SERIALIZABLE: Lazy<TypeDescription> =
    Lazy::new(|| LatentType::new("java.io.Serializable").modifiers(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT).build());
pub static COMPARABLE: Lazy<TypeDescription> =
    Lazy::new(|| LatentType::new("java.lang.Comparable").modifiers(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT).build());
pub static CHAR_SEQUENCE: Lazy<TypeDescription> =
    Lazy::new(|| LatentType::new("java.lang.CharSequence").modifiers(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT).build());
pub static STRING: Lazy<TypeDescription> = Lazy::new(|| {
    LatentType::new("java.lang.String")
        .modifiers(ACC_PUBLIC | ACC_FINAL | ACC_SUPER)
        .interface(SERIALIZABLE.clone())
        .interface(COMPARABLE.clone())
        .interface(CHAR_SEQUENCE.clone())
        .build()
});
pub static CLASS: Lazy<TypeDescription> = Lazy::new(|| {
    LatentType::new("java.lang.Class")
        .modifiers(ACC_PUBLIC | ACC_FINAL | ACC_SUPER)
        .interface(SERIALIZABLE.clone())
        .build()
});
pub static THROWABLE: Lazy<TypeDescription> =
    Lazy::new(|| LatentType::new("java.lang.Throwable").interface(SERIALIZABLE.clone()).build());
pub static EXCEPTION: Lazy<TypeDescription> =
    Lazy::new(|| LatentType::new("java.lang.Exception").super_class(THROWABLE.clone()).build());
pub static RUNTIME_EXCEPTION: Lazy<TypeDescription> =
    Lazy::new(|| LatentType::new("java.lang.RuntimeException").super_class(EXCEPTION.clone()).build());
pub static NUMBER: Lazy<TypeDescription> = Lazy::new(|| {
    LatentType::new("java.lang.Number")
        .modifiers(ACC_PUBLIC | ACC_ABSTRACT | ACC_SUPER)
        .interface(SERIALIZABLE.clone())
        .build()
});

fn wrapper(name: &str, numeric: bool) -> TypeDescription {
    let builder = LatentType::new(name)
        .modifiers(ACC_PUBLIC | ACC_FINAL | ACC_SUPER)
        .interface(COMPARABLE.clone());
    if numeric {
        builder.super_class(NUMBER.clone()).build()
    } else {
        builder.interface(SERIALIZABLE.clone()).build()
    }
}

pub static BOOLEAN_WRAPPER: Lazy<TypeDescription> = Lazy::new(|| wrapper("java.lang.Boolean", false));
pub static BYTE_WRAPPER: Lazy<TypeDescription> = Lazy::new(|| wrapper("java.lang.Byte", true));
pub static CHARACTER_WRAPPER: Lazy<TypeDescription> = Lazy::new(|| wrapper("java.lang.Character", false));
pub static SHORT_WRAPPER: Lazy<TypeDescription> = Lazy::new(|| wrapper("java.lang.Short", true));
pub static INTEGER_WRAPPER: Lazy<TypeDescription> = Lazy::new(|| wrapper("java.lang.Integer", true));
pub static LONG_WRAPPER: Lazy<TypeDescription> = Lazy::new(|| wrapper("java.lang.Long", true));
pub static FLOAT_WRAPPER: Lazy<TypeDescription> = Lazy::new(|| wrapper("java.lang.Float", true));
pub static DOUBLE_WRAPPER: Lazy<TypeDescription> = Lazy::new(|| wrapper("java.lang.Double", true));

static ARRAY_INTERFACES: Lazy<Vec<TypeDescription>> =
    Lazy::new(|| vec![CLONEABLE.clone(), SERIALIZABLE.clone()]);

impl TypeDescription {
    pub fn primitive(primitive: PrimitiveType) -> Self {
        Self(Arc::new(TypeKind::Primitive(primitive)))
    }

    pub fn void() -> Self {
        Self::primitive(PrimitiveType::Void)
    }

    pub fn int() -> Self {
        Self::primitive(PrimitiveType::Int)
    }

    pub fn long() -> Self {
        Self::primitive(PrimitiveType::Long)
    }

    pub fn double() -> Self {
        Self::primitive(PrimitiveType::Double)
    }

    pub fn boolean() -> Self {
        Self::primitive(PrimitiveType::Boolean)
    }

    pub fn object() -> Self {
        OBJECT.clone()
    }

    pub fn string() -> Self {
        STRING.clone()
    }

    /// An array type with the given component type
    pub fn array_of(component: TypeDescription) -> Self {
        Self(Arc::new(TypeKind::Array(component)))
    }

    /// A plain public class of the given binary name extending `java.lang.Object`
    pub fn class_named(name: impl Into<String>) -> Self {
        LatentType::new(name).build()
    }

    /// A public interface of the given binary name
    pub fn interface_named(name: impl Into<String>) -> Self {
        LatentType::new(name)
            .modifiers(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT)
            .build()
    }

    /// Binary name in `Class.getName()` form
    pub fn name(&self) -> String {
        match &*self.0 {
            TypeKind::Primitive(primitive) => primitive.name().to_string(),
            TypeKind::Array(_) => self.descriptor().replace('/', "."),
            TypeKind::Class(class) => class.name.clone(),
        }
    }

    /// Name as it would appear in Java source, e.g. `java.lang.String[]`
    pub fn source_name(&self) -> String {
        match &*self.0 {
            TypeKind::Array(component) => format!("{}[]", component.source_name()),
            _ => self.name(),
        }
    }

    /// Internal name as used by class file references
    pub fn internal_name(&self) -> String {
        match &*self.0 {
            TypeKind::Primitive(primitive) => primitive.name().to_string(),
            TypeKind::Array(_) => self.descriptor(),
            TypeKind::Class(class) => class.name.replace('.', "/"),
        }
    }

    pub fn descriptor(&self) -> String {
        match &*self.0 {
            TypeKind::Primitive(primitive) => primitive.descriptor().to_string(),
            TypeKind::Array(component) => format!("[{}", component.descriptor()),
            TypeKind::Class(class) => format!("L{};", class.name.replace('.', "/")),
        }
    }

    pub fn stack_size(&self) -> StackSize {
        match &*self.0 {
            TypeKind::Primitive(primitive) => primitive.stack_size(),
            _ => StackSize::Single,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match &*self.0 {
            TypeKind::Primitive(primitive) => Some(*primitive),
            _ => None,
        }
    }

    pub fn represents(&self, primitive: PrimitiveType) -> bool {
        self.as_primitive() == Some(primitive)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(&*self.0, TypeKind::Primitive(_))
    }

    pub fn is_void(&self) -> bool {
        self.represents(PrimitiveType::Void)
    }

    pub fn is_array(&self) -> bool {
        matches!(&*self.0, TypeKind::Array(_))
    }

    pub fn is_interface(&self) -> bool {
        self.modifiers() & ACC_INTERFACE != 0
    }

    pub fn is_annotation(&self) -> bool {
        self.modifiers() & ACC_ANNOTATION != 0
    }

    pub fn component_type(&self) -> Option<&TypeDescription> {
        match &*self.0 {
            TypeKind::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> u16 {
        match &*self.0 {
            TypeKind::Primitive(_) => ACC_PUBLIC | ACC_FINAL | ACC_ABSTRACT,
            TypeKind::Array(_) => ACC_PUBLIC | ACC_FINAL | ACC_ABSTRACT,
            TypeKind::Class(class) => class.modifiers,
        }
    }

    /// Direct supertype; `None` for primitives, interfaces and `java.lang.Object`
    pub fn supertype(&self) -> Option<&TypeDescription> {
        match &*self.0 {
            TypeKind::Primitive(_) => None,
            TypeKind::Array(_) => Some(&*OBJECT),
            TypeKind::Class(class) => class.super_class.as_ref(),
        }
    }

    pub fn interfaces(&self) -> &[TypeDescription] {
        match &*self.0 {
            TypeKind::Primitive(_) => &[],
            TypeKind::Array(_) => ARRAY_INTERFACES.as_slice(),
            TypeKind::Class(class) => class.interfaces.as_slice(),
        }
    }

    /// Annotations declared on this type, whatever their retention
    pub fn annotations(&self) -> &[AnnotationDescription] {
        match &*self.0 {
            TypeKind::Class(class) => class.annotations.as_slice(),
            _ => &[],
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(&*self.0, TypeKind::Class(class) if class.name == "java.lang.Object")
    }

    /// Whether a value of `other` may be assigned to a variable of this type
    /// without a conversion or cast
    pub fn is_assignable_from(&self, other: &TypeDescription) -> bool {
        if self == other {
            return true;
        }
        match (&*self.0, &*other.0) {
            (TypeKind::Primitive(_), _) | (_, TypeKind::Primitive(_)) => false,
            (TypeKind::Array(target), TypeKind::Array(source)) => {
                !target.is_primitive() && !source.is_primitive() && target.is_assignable_from(source)
            }
            (TypeKind::Array(_), TypeKind::Class(_)) => false,
            (TypeKind::Class(_), _) => self.is_object() || other.inherits_from(self),
        }
    }

    pub fn is_assignable_to(&self, other: &TypeDescription) -> bool {
        other.is_assignable_from(self)
    }

    fn inherits_from(&self, target: &TypeDescription) -> bool {
        if let Some(super_class) = self.supertype() {
            if super_class == target || super_class.inherits_from(target) {
                return true;
            }
        }
        self.interfaces()
            .iter()
            .any(|interface| interface == target || interface.inherits_from(target))
    }

    /// Whether both handles point at the same allocation
    pub fn ptr_eq(&self, other: &TypeDescription) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for TypeDescription {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (&*self.0, &*other.0) {
            (TypeKind::Primitive(left), TypeKind::Primitive(right)) => left == right,
            (TypeKind::Array(left), TypeKind::Array(right)) => left == right,
            (TypeKind::Class(left), TypeKind::Class(right)) => left.name == right.name,
            _ => false,
        }
    }
}

impl Eq for TypeDescription {}

impl Hash for TypeDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor().hash(state);
    }
}

impl fmt::Debug for TypeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescription({})", self.source_name())
    }
}

impl fmt::Display for TypeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source_name())
    }
}

impl From<PrimitiveType> for TypeDescription {
    fn from(primitive: PrimitiveType) -> Self {
        TypeDescription::primitive(primitive)
    }
}

/// Builder for a latent class or interface description
#[derive(Debug)]
pub struct LatentType {
    name: String,
    modifiers: u16,
    super_class: Option<TypeDescription>,
    explicit_super: bool,
    interfaces: Vec<TypeDescription>,
    annotations: Vec<AnnotationDescription>,
}

impl LatentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: ACC_PUBLIC | ACC_SUPER,
            super_class: None,
            explicit_super: false,
            interfaces: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn modifiers(mut self, modifiers: u16) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn super_class(mut self, super_class: TypeDescription) -> Self {
        self.super_class = Some(super_class);
        self.explicit_super = true;
        self
    }

    pub fn no_super_class(mut self) -> Self {
        self.super_class = None;
        self.explicit_super = true;
        self
    }

    pub fn interface(mut self, interface: TypeDescription) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn annotation(mut self, annotation: AnnotationDescription) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn build(self) -> TypeDescription {
        let super_class = if self.modifiers & ACC_INTERFACE != 0 {
            None
        } else if self.explicit_super {
            self.super_class
        } else {
            Some(OBJECT.clone())
        };
        TypeDescription(Arc::new(TypeKind::Class(ClassDefinition {
            name: self.name,
            modifiers: self.modifiers,
            super_class,
            interfaces: self.interfaces,
            annotations: self.annotations,
        })))
    }
}

/// Ordered list of types, e.g. the parameter types of a method
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeList(Vec<TypeDescription>);

impl TypeList {
    pub fn new(types: Vec<TypeDescription>) -> Self {
        Self(types)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Combined operand stack size of all types in the list
    pub fn stack_size(&self) -> i32 {
        self.0.iter().map(|t| t.stack_size().size()).sum()
    }

    /// Internal names of all types, `None` when the list is empty
    pub fn internal_names(&self) -> Option<Vec<String>> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.iter().map(TypeDescription::internal_name).collect())
        }
    }

    pub fn descriptors(&self) -> String {
        self.0.iter().map(TypeDescription::descriptor).collect()
    }
}

impl Deref for TypeList {
    type Target = [TypeDescription];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<TypeDescription>> for TypeList {
    fn from(types: Vec<TypeDescription>) -> Self {
        Self(types)
    }
}

impl FromIterator<TypeDescription> for TypeList {
    fn from_iter<I: IntoIterator<Item = TypeDescription>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TypeList {
    type Item = &'a TypeDescription;
    type IntoIter = std::slice::Iter<'a, TypeDescription>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors() {
        assert_eq!(TypeDescription::int().descriptor(), "I");
        assert_eq!(TypeDescription::string().descriptor(), "Ljava/lang/String;");
        let array = TypeDescription::array_of(TypeDescription::string());
        assert_eq!(array.descriptor(), "[Ljava/lang/String;");
        assert_eq!(array.internal_name(), "[Ljava/lang/String;");
        assert_eq!(array.name(), "[Ljava.lang.String;");
        assert_eq!(array.source_name(), "java.lang.String[]");
    }

    #[test]
    fn test_stack_sizes() {
        assert_eq!(TypeDescription::void().stack_size(), StackSize::Zero);
        assert_eq!(TypeDescription::long().stack_size(), StackSize::Double);
        assert_eq!(TypeDescription::double().stack_size(), StackSize::Double);
        assert_eq!(TypeDescription::object().stack_size(), StackSize::Single);
        let list = TypeList::new(vec![TypeDescription::int(), TypeDescription::long(), TypeDescription::string()]);
        assert_eq!(list.stack_size(), 4);
        assert_eq!(TypeList::empty().internal_names(), None);
    }

    #[test]
    fn test_assignability() {
        let object = TypeDescription::object();
        let string = TypeDescription::string();
        assert!(object.is_assignable_from(&string));
        assert!(!string.is_assignable_from(&object));
        assert!(SERIALIZABLE.is_assignable_from(&string));
        assert!(NUMBER.is_assignable_from(&INTEGER_WRAPPER));
        assert!(SERIALIZABLE.is_assignable_from(&INTEGER_WRAPPER));
        assert!(!TypeDescription::int().is_assignable_from(&INTEGER_WRAPPER));

        let strings = TypeDescription::array_of(string.clone());
        let objects = TypeDescription::array_of(object.clone());
        assert!(objects.is_assignable_from(&strings));
        assert!(object.is_assignable_from(&strings));
        assert!(CLONEABLE.is_assignable_from(&strings));
        let ints = TypeDescription::array_of(TypeDescription::int());
        assert!(!objects.is_assignable_from(&ints));
    }

    #[test]
    fn test_interface_has_no_supertype() {
        let runnable = TypeDescription::interface_named("java.lang.Runnable");
        assert!(runnable.is_interface());
        assert!(runnable.supertype().is_none());
        assert!(TypeDescription::object().is_assignable_from(&runnable));
    }

    #[test]
    fn test_wrappers() {
        assert_eq!(PrimitiveType::Int.wrapper().map(|t| t.name()), Some("java.lang.Integer".to_string()));
        assert_eq!(PrimitiveType::for_wrapper("java.lang.Character"), Some(PrimitiveType::Char));
        assert!(PrimitiveType::Void.wrapper().is_none());
    }
}
