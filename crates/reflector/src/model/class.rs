//! Class and interface descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ConstructorInfo, FieldInfo, MethodInfo};

/// Dense class identifier, assigned by the registry in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub usize);

impl ClassId {
    /// The implicit root class `Object`
    pub const OBJECT: ClassId = ClassId(0);

    /// Index into the registry
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a type is a class or an interface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// Concrete or abstract class with a superclass chain
    #[default]
    Class,
    /// Interface, only extends other interfaces
    Interface,
}

impl ClassKind {
    /// Lowercase keyword
    pub fn as_str(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Effective visibility of a class or member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Visible everywhere
    Public,
    /// Visible to subclasses
    Protected,
    /// Visible to the declaring class only
    Private,
    /// No visibility keyword
    Package,
}

/// Modifier flags for classes and members
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Public visibility
    pub is_public: bool,
    /// Protected visibility
    pub is_protected: bool,
    /// Private visibility
    pub is_private: bool,
    /// Static member
    pub is_static: bool,
    /// Final class or member
    pub is_final: bool,
    /// Abstract class or method
    pub is_abstract: bool,
}

impl Modifiers {
    /// Only `public` set
    pub fn public() -> Self {
        Self {
            is_public: true,
            ..Self::default()
        }
    }

    /// Only `protected` set
    pub fn protected() -> Self {
        Self {
            is_protected: true,
            ..Self::default()
        }
    }

    /// Only `private` set
    pub fn private() -> Self {
        Self {
            is_private: true,
            ..Self::default()
        }
    }

    /// Add `static`
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Add `final`
    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Add `abstract`
    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Set one modifier by keyword, returning false for unknown keywords
    pub fn apply_keyword(&mut self, keyword: &str) -> bool {
        match keyword {
            "public" => self.is_public = true,
            "protected" => self.is_protected = true,
            "private" => self.is_private = true,
            "static" => self.is_static = true,
            "final" => self.is_final = true,
            "abstract" => self.is_abstract = true,
            _ => return false,
        }
        true
    }

    /// Number of visibility keywords set (more than one is invalid)
    pub fn visibility_count(&self) -> usize {
        [self.is_public, self.is_protected, self.is_private]
            .iter()
            .filter(|set| **set)
            .count()
    }

    /// Effective visibility
    pub fn visibility(&self) -> Visibility {
        if self.is_public {
            Visibility::Public
        } else if self.is_protected {
            Visibility::Protected
        } else if self.is_private {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }
}

/// A class or interface with its own declared members
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// Class ID (unique identifier)
    pub id: ClassId,
    /// Class name
    pub name: String,
    /// Class or interface
    pub kind: ClassKind,
    /// Superclass (None for `Object` and for interfaces)
    pub parent_id: Option<ClassId>,
    /// Directly implemented (or, for interfaces, extended) interfaces
    pub interfaces: Vec<ClassId>,
    /// Class modifiers
    pub modifiers: Modifiers,
    /// Declared fields, in declaration order
    pub fields: Vec<FieldInfo>,
    /// Declared methods, in declaration order
    pub methods: Vec<MethodInfo>,
    /// Declared constructors, in declaration order
    pub constructors: Vec<ConstructorInfo>,
}

impl Class {
    /// Create a new public class extending `Object`
    pub fn new(id: ClassId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ClassKind::Class,
            parent_id: Some(ClassId::OBJECT),
            interfaces: Vec::new(),
            modifiers: Modifiers::public(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Create the root class `Object`
    pub(crate) fn root() -> Self {
        Self {
            parent_id: None,
            ..Self::new(ClassId::OBJECT, "Object").with_constructor(ConstructorInfo::new(
                Vec::<String>::new(),
            ))
        }
    }

    /// Create a new public interface
    pub fn interface(id: ClassId, name: impl Into<String>) -> Self {
        Self {
            kind: ClassKind::Interface,
            parent_id: None,
            modifiers: Modifiers::public().with_abstract(),
            ..Self::new(id, name)
        }
    }

    /// Set the superclass
    pub fn with_parent(mut self, parent_id: ClassId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Add a directly implemented interface
    pub fn implements(mut self, interface_id: ClassId) -> Self {
        self.interfaces.push(interface_id);
        self
    }

    /// Replace the class modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Declare a field
    pub fn with_field(mut self, mut field: FieldInfo) -> Self {
        field.declaring_class_id = self.id;
        self.fields.push(field);
        self
    }

    /// Declare a method
    pub fn with_method(mut self, mut method: MethodInfo) -> Self {
        method.declaring_class_id = self.id;
        self.methods.push(method);
        self
    }

    /// Declare a constructor
    pub fn with_constructor(mut self, mut constructor: ConstructorInfo) -> Self {
        constructor.declaring_class_id = self.id;
        self.constructors.push(constructor);
        self
    }

    /// Whether this is an interface
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// Declared field by name
    pub fn declared_field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared method by name and exact parameter types
    pub fn declared_method(&self, name: &str, parameter_types: &[&str]) -> Option<&MethodInfo> {
        self.methods
            .iter()
            .find(|m| m.matches_signature(name, parameter_types))
    }

    /// Declared constructor by exact parameter types
    pub fn declared_constructor(&self, parameter_types: &[&str]) -> Option<&ConstructorInfo> {
        self.constructors
            .iter()
            .find(|c| c.has_parameters(parameter_types))
    }
}
