//! Reflector errors

use thiserror::Error;

use crate::model::ClassId;

/// Errors raised by the digger itself, before any probe runs
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DigError {
    /// The start or bound type is not part of the hierarchy being walked
    #[error("Unknown type: {ty}")]
    UnknownType {
        /// Debug rendering of the offending type handle
        ty: String,
    },
}

/// Errors that can occur while building a class model or looking up members
#[derive(Debug, Error)]
pub enum ReflectError {
    /// Digger misuse (unknown start or bound)
    #[error(transparent)]
    Dig(#[from] DigError),

    /// No class with the given ID is registered
    #[error("Unknown class ID: {0}")]
    UnknownClass(ClassId),

    /// No class with the given name is registered
    #[error("Class not found: {name}")]
    ClassNotFound {
        /// Name that was looked up
        name: String,
    },

    /// A class with the same name is already registered
    #[error("Duplicate class: {name}")]
    DuplicateClass {
        /// Name of the clashing class
        name: String,
    },

    /// Class IDs must be assigned densely in registration order
    #[error("Invalid class ID {actual} for {name}: expected {expected}")]
    InvalidClassId {
        /// Class being registered
        name: String,
        /// Next free ID
        expected: ClassId,
        /// ID carried by the class
        actual: ClassId,
    },

    /// The class breaks a structural rule of the hierarchy
    #[error("Invalid hierarchy for {name}: {reason}")]
    InvalidHierarchy {
        /// Class being registered
        name: String,
        /// Rule that was broken
        reason: String,
    },

    /// Type descriptions reference each other in a loop
    #[error("Cyclic hierarchy: {cycle}")]
    CyclicHierarchy {
        /// Names along the cycle, joined with " -> "
        cycle: String,
    },

    /// No field matched
    #[error("No such field in {class}: {name}")]
    NoSuchField {
        /// Class the search started from
        class: String,
        /// Field name or predicate description
        name: String,
    },

    /// No method matched
    #[error("No such method in {class}: {name}")]
    NoSuchMethod {
        /// Class the search started from
        class: String,
        /// Method name (with parameters when given) or predicate description
        name: String,
    },

    /// No constructor matched
    #[error("No such constructor in {class}: ({parameters})")]
    NoSuchConstructor {
        /// Class the search started from
        class: String,
        /// Parameter types, or a predicate description
        parameters: String,
    },

    /// Failed to read a model description
    #[error("Failed to read model description: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a TOML model description
    #[error("Failed to parse TOML model description: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to parse a JSON model description
    #[error("Failed to parse JSON model description: {0}")]
    Json(#[from] serde_json::Error),

    /// The model description is structurally invalid
    #[error("Invalid model description: {0}")]
    Validation(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ReflectError>;
