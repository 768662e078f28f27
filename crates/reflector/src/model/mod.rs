//! Class Model
//!
//! A small typed model of classes, interfaces and their declared members.
//! [`ClassRegistry`] implements [`TypeHierarchy`](crate::digger::TypeHierarchy)
//! so every dig in this crate runs over it.

mod class;
mod member;
mod registry;

pub use class::{Class, ClassId, ClassKind, Modifiers, Visibility};
pub use member::{ConstructorInfo, FieldInfo, MethodInfo};
pub use registry::ClassRegistry;
