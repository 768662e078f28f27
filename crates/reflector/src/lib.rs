//! Reflector
//!
//! Bounded class-hierarchy digging: walk a type's superclass chain (and,
//! optionally, its interfaces) up to an inclusive bound, letting a probe decide
//! what counts as a match. Ships a small class model, TOML/JSON model
//! descriptions and name-based member lookups built on the digger.

#![warn(missing_docs)]

pub mod config;
pub mod digger;
pub mod error;
pub mod model;
pub mod reflector;

pub use config::HierarchyConfig;
pub use digger::{DigResult, FoundMember, HierarchyDigger, TypeHierarchy};
pub use error::{DigError, ReflectError, Result};
pub use model::{
    Class, ClassId, ClassKind, ClassRegistry, ConstructorInfo, FieldInfo, MethodInfo, Modifiers,
    Visibility,
};
pub use reflector::{FoundConstructor, FoundField, FoundMethod, Reflector};
