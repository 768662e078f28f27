//! Class Registry
//!
//! Owns every class and interface of a model. Classes can only reference
//! types registered before them, so the superclass relation is acyclic and
//! every ascent ends at `Object` or at an interface.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::{Class, ClassId, ClassKind};
use crate::digger::{HierarchyDigger, TypeHierarchy};
use crate::error::{DigError, ReflectError, Result};

/// Registry of classes indexed by ID and name
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<Class>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Create a registry holding only the root class `Object`
    pub fn new() -> Self {
        let root = Class::root();
        let mut name_to_id = FxHashMap::default();
        name_to_id.insert(root.name.clone(), root.id);

        Self {
            classes: vec![root],
            name_to_id,
        }
    }

    /// Register a new class
    ///
    /// The class must carry [`next_class_id`](Self::next_class_id) and may
    /// only reference classes that are already registered.
    pub fn register_class(&mut self, mut class: Class) -> Result<ClassId> {
        let expected = self.next_class_id();
        if class.id != expected {
            return Err(ReflectError::InvalidClassId {
                name: class.name,
                expected,
                actual: class.id,
            });
        }
        if class.name.is_empty() {
            return Err(invalid(&class, "class name cannot be empty"));
        }
        if self.name_to_id.contains_key(&class.name) {
            return Err(ReflectError::DuplicateClass { name: class.name });
        }

        self.check_parent(&class)?;
        self.check_interfaces(&class)?;

        if class.is_interface() && !class.constructors.is_empty() {
            return Err(invalid(&class, "interfaces cannot declare constructors"));
        }

        let id = class.id;
        for field in &mut class.fields {
            field.declaring_class_id = id;
        }
        for method in &mut class.methods {
            method.declaring_class_id = id;
        }
        for constructor in &mut class.constructors {
            constructor.declaring_class_id = id;
        }

        debug!(
            %id,
            name = %class.name,
            kind = %class.kind,
            parent = ?class.parent_id,
            "registered class"
        );

        self.name_to_id.insert(class.name.clone(), id);
        self.classes.push(class);

        Ok(id)
    }

    fn check_parent(&self, class: &Class) -> Result<()> {
        match (class.kind, class.parent_id) {
            (ClassKind::Interface, Some(_)) => Err(invalid(
                class,
                "interfaces cannot extend classes; list super-interfaces instead",
            )),
            (ClassKind::Interface, None) => Ok(()),
            (ClassKind::Class, None) => Err(invalid(class, "only Object may omit a superclass")),
            (ClassKind::Class, Some(parent_id)) => {
                let parent = self
                    .get_class(parent_id)
                    .ok_or(ReflectError::UnknownClass(parent_id))?;
                if parent.is_interface() {
                    return Err(invalid(
                        class,
                        &format!("superclass {} is an interface", parent.name),
                    ));
                }
                if parent.modifiers.is_final {
                    return Err(invalid(
                        class,
                        &format!("superclass {} is final", parent.name),
                    ));
                }
                Ok(())
            }
        }
    }

    fn check_interfaces(&self, class: &Class) -> Result<()> {
        let mut seen = FxHashSet::default();
        for &interface_id in &class.interfaces {
            let interface = self
                .get_class(interface_id)
                .ok_or(ReflectError::UnknownClass(interface_id))?;
            if !interface.is_interface() {
                return Err(invalid(
                    class,
                    &format!("{} is not an interface", interface.name),
                ));
            }
            if !seen.insert(interface_id) {
                return Err(invalid(
                    class,
                    &format!("interface {} listed twice", interface.name),
                ));
            }
        }
        Ok(())
    }

    /// Get class by ID
    pub fn get_class(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id.index())
    }

    /// Get class by name
    pub fn get_class_by_name(&self, name: &str) -> Option<&Class> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.classes.get(id.index()))
    }

    /// Get next available class ID
    pub fn next_class_id(&self) -> ClassId {
        ClassId(self.classes.len())
    }

    /// Number of registered classes, `Object` included
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always false: `Object` is always registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over all classes with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes.iter().map(|class| (class.id, class))
    }

    /// The class followed by its superclasses, ending at the root
    pub fn class_hierarchy(&self, id: ClassId) -> Vec<&Class> {
        let mut hierarchy = Vec::new();
        let mut current_id = Some(id);

        while let Some(id) = current_id {
            match self.get_class(id) {
                Some(class) => {
                    hierarchy.push(class);
                    current_id = class.parent_id;
                }
                None => break,
            }
        }

        hierarchy
    }

    /// Every interface reachable from the class itself (not from its
    /// superclasses), breadth first in declaration order
    pub fn all_interfaces(&self, id: ClassId) -> Vec<ClassId> {
        let mut seen = FxHashSet::default();
        let mut ordered = Vec::new();
        let mut queue: VecDeque<ClassId> = self.interfaces(id).iter().copied().collect();

        while let Some(interface) = queue.pop_front() {
            if seen.insert(interface) {
                ordered.push(interface);
                queue.extend(self.interfaces(interface).iter().copied());
            }
        }

        ordered
    }

    /// Check if `sub` is `sup`, extends it, or implements it
    ///
    /// Every known type, interfaces included, is a subtype of `Object`.
    pub fn is_subclass_of(&self, sub: ClassId, sup: ClassId) -> bool {
        if sup == ClassId::OBJECT {
            return self.contains(sub);
        }
        HierarchyDigger::new(self)
            .dig_with_interfaces(
                sub,
                |ty| Ok::<_, DigError>((ty == sup).then_some(())),
                ClassId::OBJECT,
            )
            .is_ok_and(|found| found.is_some())
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeHierarchy for ClassRegistry {
    type Type = ClassId;

    fn contains(&self, ty: ClassId) -> bool {
        ty.index() < self.classes.len()
    }

    fn superclass(&self, ty: ClassId) -> Option<ClassId> {
        self.get_class(ty).and_then(|class| class.parent_id)
    }

    fn interfaces(&self, ty: ClassId) -> &[ClassId] {
        self.get_class(ty)
            .map(|class| class.interfaces.as_slice())
            .unwrap_or(&[])
    }
}

fn invalid(class: &Class, reason: &str) -> ReflectError {
    ReflectError::InvalidHierarchy {
        name: class.name.clone(),
        reason: reason.to_string(),
    }
}
