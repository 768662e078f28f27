//! Field, method and constructor descriptors

use super::{ClassId, Modifiers};

/// Field information
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Declared type name
    pub type_name: String,
    /// Declaring class ID
    pub declaring_class_id: ClassId,
    /// Field modifiers
    pub modifiers: Modifiers,
}

impl FieldInfo {
    /// Create a public field (the declaring class is set on insertion)
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            declaring_class_id: ClassId::OBJECT,
            modifiers: Modifiers::public(),
        }
    }

    /// Replace the modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether the field is public
    pub fn is_public(&self) -> bool {
        self.modifiers.is_public
    }
}

/// Method information
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// Method name
    pub name: String,
    /// Parameter type names, in order
    pub parameter_types: Vec<String>,
    /// Return type name
    pub return_type: String,
    /// Declaring class ID
    pub declaring_class_id: ClassId,
    /// Method modifiers
    pub modifiers: Modifiers,
}

impl MethodInfo {
    /// Create a public method (the declaring class is set on insertion)
    pub fn new<I, S>(name: impl Into<String>, parameter_types: I, return_type: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            parameter_types: parameter_types.into_iter().map(Into::into).collect(),
            return_type: return_type.into(),
            declaring_class_id: ClassId::OBJECT,
            modifiers: Modifiers::public(),
        }
    }

    /// Replace the modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether the method is public
    pub fn is_public(&self) -> bool {
        self.modifiers.is_public
    }

    /// Exact parameter list comparison
    pub fn has_parameters(&self, parameter_types: &[&str]) -> bool {
        same_parameters(&self.parameter_types, parameter_types)
    }

    /// Name and exact parameter list comparison
    pub fn matches_signature(&self, name: &str, parameter_types: &[&str]) -> bool {
        self.name == name && self.has_parameters(parameter_types)
    }

    /// `name(A, B)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.parameter_types.join(", "))
    }
}

/// Constructor information
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorInfo {
    /// Parameter type names, in order
    pub parameter_types: Vec<String>,
    /// Declaring class ID
    pub declaring_class_id: ClassId,
    /// Constructor modifiers
    pub modifiers: Modifiers,
}

impl ConstructorInfo {
    /// Create a public constructor (the declaring class is set on insertion)
    pub fn new<I, S>(parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameter_types: parameter_types.into_iter().map(Into::into).collect(),
            declaring_class_id: ClassId::OBJECT,
            modifiers: Modifiers::public(),
        }
    }

    /// Replace the modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether the constructor is public
    pub fn is_public(&self) -> bool {
        self.modifiers.is_public
    }

    /// Exact parameter list comparison
    pub fn has_parameters(&self, parameter_types: &[&str]) -> bool {
        same_parameters(&self.parameter_types, parameter_types)
    }
}

fn same_parameters(declared: &[String], wanted: &[&str]) -> bool {
    declared.len() == wanted.len() && declared.iter().zip(wanted).all(|(d, w)| d == w)
}
