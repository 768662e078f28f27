//! Member Lookups
//!
//! Field, method and constructor lookups over a [`ClassRegistry`], all built
//! on the hierarchy digger by supplying per-kind probes.
//!
//! | Lookup family             | Where it looks                                 |
//! |---------------------------|------------------------------------------------|
//! | `dig_for_*`               | start class up to a caller-chosen bound        |
//! | `get_field` / `get_method`| public members, inherited and from interfaces  |
//! | `get_declared_*`          | the class itself, any visibility               |
//! | `get_constructor`         | public constructors of the class itself        |
//! | `get_*_optional/matching` | predicate, dug up to `Object`                  |
//! | `get_any_*`               | by name (or parameters), dug up to `Object`    |
//!
//! `*_optional` lookups report a miss as `Ok(None)`; the others turn it into
//! a `NoSuch*` error. Unknown class IDs are always an error.

use crate::digger::{FoundMember, HierarchyDigger};
use crate::error::{ReflectError, Result};
use crate::model::{Class, ClassId, ClassRegistry, ConstructorInfo, FieldInfo, MethodInfo};

const PREDICATE: &str = "<predicate>";

/// A field paired with the class that declares it
pub type FoundField<'r> = FoundMember<ClassId, &'r FieldInfo>;
/// A method paired with the class or interface that declares it
pub type FoundMethod<'r> = FoundMember<ClassId, &'r MethodInfo>;
/// A constructor paired with the class that declares it
pub type FoundConstructor<'r> = FoundMember<ClassId, &'r ConstructorInfo>;

/// Member lookups over a borrowed registry
#[derive(Debug, Clone, Copy)]
pub struct Reflector<'r> {
    registry: &'r ClassRegistry,
}

impl<'r> Reflector<'r> {
    /// Create a reflector over the given registry
    pub fn new(registry: &'r ClassRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry
    pub fn registry(&self) -> &'r ClassRegistry {
        self.registry
    }

    fn digger(&self) -> HierarchyDigger<'r, ClassRegistry> {
        HierarchyDigger::new(self.registry)
    }

    fn class(&self, id: ClassId) -> Result<&'r Class> {
        self.registry
            .get_class(id)
            .ok_or(ReflectError::UnknownClass(id))
    }

    // ========================================================================
    // Digging
    // ========================================================================

    /// Dig for a constructor matching `condition` in `class` and its
    /// superclasses up to `bound` (inclusive)
    pub fn dig_for_constructor<P>(
        &self,
        class: ClassId,
        mut condition: P,
        bound: ClassId,
    ) -> Result<Option<FoundConstructor<'r>>>
    where
        P: FnMut(&ConstructorInfo) -> bool,
    {
        let registry = self.registry;
        self.digger().dig(
            class,
            |owner| {
                let declared = declared_in(registry, owner)?;
                Ok(declared.constructors.iter().find(|c| condition(*c)))
            },
            bound,
        )
    }

    /// Dig for a field matching `condition` in `class` and its superclasses
    /// up to `bound` (inclusive)
    pub fn dig_for_field<P>(
        &self,
        class: ClassId,
        mut condition: P,
        bound: ClassId,
    ) -> Result<Option<FoundField<'r>>>
    where
        P: FnMut(&FieldInfo) -> bool,
    {
        let registry = self.registry;
        self.digger().dig(
            class,
            |owner| {
                let declared = declared_in(registry, owner)?;
                Ok(declared.fields.iter().find(|f| condition(*f)))
            },
            bound,
        )
    }

    /// Dig for a method matching `condition` in `class`, its superclasses up
    /// to `bound` (inclusive) and every interface they implement
    pub fn dig_for_method<P>(
        &self,
        class: ClassId,
        mut condition: P,
        bound: ClassId,
    ) -> Result<Option<FoundMethod<'r>>>
    where
        P: FnMut(&MethodInfo) -> bool,
    {
        let registry = self.registry;
        self.digger().dig_with_interfaces(
            class,
            |owner| {
                let declared = declared_in(registry, owner)?;
                Ok(declared.methods.iter().find(|m| condition(*m)))
            },
            bound,
        )
    }

    // ========================================================================
    // Class
    // ========================================================================

    /// Look up a class by its name
    pub fn class_for_name(&self, name: &str) -> Result<&'r Class> {
        self.registry
            .get_class_by_name(name)
            .ok_or_else(|| ReflectError::ClassNotFound {
                name: name.to_string(),
            })
    }

    // ========================================================================
    // Field
    // ========================================================================

    /// Public field declared on the class, a superclass or an interface
    pub fn get_field(&self, class: ClassId, name: &str) -> Result<&'r FieldInfo> {
        let registry = self.registry;
        let found = self.digger().dig_with_interfaces(
            class,
            |owner| {
                let declared = declared_in(registry, owner)?;
                Ok::<_, ReflectError>(declared.fields.iter().find(|f| f.name == name && f.is_public()))
            },
            ClassId::OBJECT,
        )?;
        found
            .map(FoundMember::into_member)
            .ok_or_else(|| self.no_such_field(class, name))
    }

    /// Field declared on the class itself, any visibility
    pub fn get_declared_field(&self, class: ClassId, name: &str) -> Result<&'r FieldInfo> {
        self.class(class)?
            .declared_field(name)
            .ok_or_else(|| self.no_such_field(class, name))
    }

    /// First field matching `predicate`, nearest class first
    pub fn get_field_optional<P>(&self, class: ClassId, predicate: P) -> Result<Option<&'r FieldInfo>>
    where
        P: FnMut(&FieldInfo) -> bool,
    {
        Ok(self
            .dig_for_field(class, predicate, ClassId::OBJECT)?
            .map(FoundMember::into_member))
    }

    /// Like [`get_field_optional`](Self::get_field_optional), failing on a miss
    pub fn get_field_matching<P>(&self, class: ClassId, predicate: P) -> Result<&'r FieldInfo>
    where
        P: FnMut(&FieldInfo) -> bool,
    {
        self.get_field_optional(class, predicate)?
            .ok_or_else(|| self.no_such_field(class, PREDICATE))
    }

    /// Field of any visibility named `name`, nearest class first
    pub fn get_any_field_optional(&self, class: ClassId, name: &str) -> Result<Option<&'r FieldInfo>> {
        self.get_field_optional(class, |field| field.name == name)
    }

    /// Like [`get_any_field_optional`](Self::get_any_field_optional), failing on a miss
    pub fn get_any_field(&self, class: ClassId, name: &str) -> Result<&'r FieldInfo> {
        self.get_any_field_optional(class, name)?
            .ok_or_else(|| self.no_such_field(class, name))
    }

    // ========================================================================
    // Method
    // ========================================================================

    /// Public method with exactly these parameters, declared on the class,
    /// a superclass or an interface
    ///
    /// The whole superclass chain is searched before any interface, so a
    /// concrete superclass method beats an abstract interface declaration.
    pub fn get_method(
        &self,
        class: ClassId,
        name: &str,
        parameter_types: &[&str],
    ) -> Result<&'r MethodInfo> {
        let registry = self.registry;
        let mut probe = |owner: ClassId| {
            let declared = declared_in(registry, owner)?;
            Ok::<_, ReflectError>(
                declared
                    .methods
                    .iter()
                    .find(|m| m.is_public() && m.matches_signature(name, parameter_types)),
            )
        };

        let digger = self.digger();
        let found = match digger.dig(class, &mut probe, ClassId::OBJECT)? {
            Some(found) => Some(found),
            None => digger.dig_with_interfaces(class, &mut probe, ClassId::OBJECT)?,
        };
        found
            .map(FoundMember::into_member)
            .ok_or_else(|| self.no_such_method(class, &signature(name, parameter_types)))
    }

    /// Method with exactly these parameters declared on the class itself
    pub fn get_declared_method(
        &self,
        class: ClassId,
        name: &str,
        parameter_types: &[&str],
    ) -> Result<&'r MethodInfo> {
        self.class(class)?
            .declared_method(name, parameter_types)
            .ok_or_else(|| self.no_such_method(class, &signature(name, parameter_types)))
    }

    /// First method matching `predicate`, classes before their interfaces
    pub fn get_method_optional<P>(&self, class: ClassId, predicate: P) -> Result<Option<&'r MethodInfo>>
    where
        P: FnMut(&MethodInfo) -> bool,
    {
        Ok(self
            .dig_for_method(class, predicate, ClassId::OBJECT)?
            .map(FoundMember::into_member))
    }

    /// Like [`get_method_optional`](Self::get_method_optional), failing on a miss
    pub fn get_method_matching<P>(&self, class: ClassId, predicate: P) -> Result<&'r MethodInfo>
    where
        P: FnMut(&MethodInfo) -> bool,
    {
        self.get_method_optional(class, predicate)?
            .ok_or_else(|| self.no_such_method(class, PREDICATE))
    }

    /// Method of any visibility and signature named `name`
    pub fn get_any_method_optional(&self, class: ClassId, name: &str) -> Result<Option<&'r MethodInfo>> {
        self.get_method_optional(class, |method| method.name == name)
    }

    /// Like [`get_any_method_optional`](Self::get_any_method_optional), failing on a miss
    pub fn get_any_method(&self, class: ClassId, name: &str) -> Result<&'r MethodInfo> {
        self.get_any_method_optional(class, name)?
            .ok_or_else(|| self.no_such_method(class, name))
    }

    // ========================================================================
    // Constructor
    // ========================================================================

    /// Public constructor of the class itself with exactly these parameters
    pub fn get_constructor(&self, class: ClassId, parameter_types: &[&str]) -> Result<&'r ConstructorInfo> {
        self.class(class)?
            .declared_constructor(parameter_types)
            .filter(|constructor| constructor.is_public())
            .ok_or_else(|| self.no_such_constructor(class, &parameter_types.join(", ")))
    }

    /// Constructor of the class itself with exactly these parameters
    pub fn get_declared_constructor(
        &self,
        class: ClassId,
        parameter_types: &[&str],
    ) -> Result<&'r ConstructorInfo> {
        self.class(class)?
            .declared_constructor(parameter_types)
            .ok_or_else(|| self.no_such_constructor(class, &parameter_types.join(", ")))
    }

    /// First constructor matching `predicate`, nearest class first
    pub fn get_constructor_optional<P>(
        &self,
        class: ClassId,
        predicate: P,
    ) -> Result<Option<&'r ConstructorInfo>>
    where
        P: FnMut(&ConstructorInfo) -> bool,
    {
        Ok(self
            .dig_for_constructor(class, predicate, ClassId::OBJECT)?
            .map(FoundMember::into_member))
    }

    /// Like [`get_constructor_optional`](Self::get_constructor_optional), failing on a miss
    pub fn get_constructor_matching<P>(&self, class: ClassId, predicate: P) -> Result<&'r ConstructorInfo>
    where
        P: FnMut(&ConstructorInfo) -> bool,
    {
        self.get_constructor_optional(class, predicate)?
            .ok_or_else(|| self.no_such_constructor(class, PREDICATE))
    }

    /// Constructor of any visibility with exactly these parameters
    pub fn get_any_constructor_optional(
        &self,
        class: ClassId,
        parameter_types: &[&str],
    ) -> Result<Option<&'r ConstructorInfo>> {
        self.get_constructor_optional(class, |constructor| {
            constructor.has_parameters(parameter_types)
        })
    }

    /// Like [`get_any_constructor_optional`](Self::get_any_constructor_optional), failing on a miss
    pub fn get_any_constructor(&self, class: ClassId, parameter_types: &[&str]) -> Result<&'r ConstructorInfo> {
        self.get_any_constructor_optional(class, parameter_types)?
            .ok_or_else(|| self.no_such_constructor(class, &parameter_types.join(", ")))
    }

    // ========================================================================
    // Errors
    // ========================================================================

    fn class_name(&self, class: ClassId) -> String {
        self.registry
            .get_class(class)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| class.to_string())
    }

    fn no_such_field(&self, class: ClassId, name: &str) -> ReflectError {
        ReflectError::NoSuchField {
            class: self.class_name(class),
            name: name.to_string(),
        }
    }

    fn no_such_method(&self, class: ClassId, name: &str) -> ReflectError {
        ReflectError::NoSuchMethod {
            class: self.class_name(class),
            name: name.to_string(),
        }
    }

    fn no_such_constructor(&self, class: ClassId, parameters: &str) -> ReflectError {
        ReflectError::NoSuchConstructor {
            class: self.class_name(class),
            parameters: parameters.to_string(),
        }
    }
}

fn declared_in(registry: &ClassRegistry, owner: ClassId) -> Result<&Class> {
    registry
        .get_class(owner)
        .ok_or(ReflectError::UnknownClass(owner))
}

fn signature(name: &str, parameter_types: &[&str]) -> String {
    format!("{}({})", name, parameter_types.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Modifiers, Visibility};

    /// Object <- Base <- Derived
    fn registry() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        let base = registry
            .register_class(
                Class::new(ClassId(1), "Base")
                    .with_field(FieldInfo::new("id", "long"))
                    .with_field(FieldInfo::new("secret", "String").with_modifiers(Modifiers::private()))
                    .with_constructor(ConstructorInfo::new(["long"])),
            )
            .unwrap();
        registry
            .register_class(
                Class::new(ClassId(2), "Derived")
                    .with_parent(base)
                    .with_field(FieldInfo::new("id", "int").with_modifiers(Modifiers::protected())),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_dig_for_field_reports_owner() {
        let registry = registry();
        let reflector = Reflector::new(&registry);

        let found = reflector
            .dig_for_field(ClassId(2), |f| f.name == "secret", ClassId::OBJECT)
            .unwrap()
            .unwrap();
        assert_eq!(found.owner(), ClassId(1));
        assert_eq!(found.member().type_name, "String");

        let found = reflector
            .dig_for_field(ClassId(2), |f| f.name == "id", ClassId::OBJECT)
            .unwrap()
            .unwrap();
        assert_eq!(found.owner(), ClassId(2));
    }

    #[test]
    fn test_public_field_skips_shadowing_protected() {
        let registry = registry();
        let reflector = Reflector::new(&registry);

        let field = reflector.get_field(ClassId(2), "id").unwrap();
        assert_eq!(field.declaring_class_id, ClassId(1));
        assert_eq!(field.type_name, "long");

        let field = reflector.get_any_field(ClassId(2), "id").unwrap();
        assert_eq!(field.declaring_class_id, ClassId(2));
        assert_eq!(field.modifiers.visibility(), Visibility::Protected);
    }

    #[test]
    fn test_declared_field_is_not_inherited() {
        let registry = registry();
        let reflector = Reflector::new(&registry);

        assert!(reflector.get_declared_field(ClassId(1), "secret").is_ok());
        let err = reflector.get_declared_field(ClassId(2), "secret").unwrap_err();
        assert_eq!(err.to_string(), "No such field in Derived: secret");
    }

    #[test]
    fn test_unknown_class_is_an_error() {
        let registry = registry();
        let reflector = Reflector::new(&registry);

        assert!(matches!(
            reflector.get_any_field_optional(ClassId(40), "id"),
            Err(ReflectError::Dig(_))
        ));
        assert!(matches!(
            reflector.get_declared_field(ClassId(40), "id"),
            Err(ReflectError::UnknownClass(ClassId(40)))
        ));
    }

    #[test]
    fn test_constructors() {
        let registry = registry();
        let reflector = Reflector::new(&registry);

        // Only Object's no-arg constructor is reachable from Derived by digging
        let ctor = reflector.get_any_constructor(ClassId(2), &[]).unwrap();
        assert_eq!(ctor.declaring_class_id, ClassId::OBJECT);

        let ctor = reflector.get_any_constructor(ClassId(2), &["long"]).unwrap();
        assert_eq!(ctor.declaring_class_id, ClassId(1));

        // get_constructor never looks past the class itself
        assert!(matches!(
            reflector.get_constructor(ClassId(2), &["long"]),
            Err(ReflectError::NoSuchConstructor { .. })
        ));
        assert!(reflector.get_constructor(ClassId(1), &["long"]).is_ok());
    }

    #[test]
    fn test_get_method_prefers_superclass_chain_over_interfaces() {
        let mut registry = ClassRegistry::new();
        let abstract_public = Modifiers::public().with_abstract();
        let named = registry
            .register_class(
                Class::interface(ClassId(1), "Named")
                    .with_method(MethodInfo::new("name", Vec::<String>::new(), "String").with_modifiers(abstract_public)),
            )
            .unwrap();
        let greeter = registry
            .register_class(
                Class::interface(ClassId(2), "Greeter")
                    .with_method(MethodInfo::new("greet", ["String"], "void").with_modifiers(abstract_public)),
            )
            .unwrap();
        let base = registry
            .register_class(
                Class::new(ClassId(3), "Base").with_method(MethodInfo::new("name", Vec::<String>::new(), "String")),
            )
            .unwrap();
        let derived = registry
            .register_class(
                Class::new(ClassId(4), "Derived")
                    .with_parent(base)
                    .implements(named)
                    .implements(greeter),
            )
            .unwrap();
        let reflector = Reflector::new(&registry);

        let name = reflector.get_method(derived, "name", &[]).unwrap();
        assert_eq!(name.declaring_class_id, base);
        assert!(!name.modifiers.is_abstract);

        // Only an interface declares greet, so the interface pass finds it
        let greet = reflector.get_method(derived, "greet", &["String"]).unwrap();
        assert_eq!(greet.declaring_class_id, greeter);

        assert!(matches!(
            reflector.get_method(derived, "greet", &[]),
            Err(ReflectError::NoSuchMethod { .. })
        ));
    }

    #[test]
    fn test_class_for_name() {
        let registry = registry();
        let reflector = Reflector::new(&registry);

        assert_eq!(reflector.class_for_name("Derived").unwrap().id, ClassId(2));
        assert!(matches!(
            reflector.class_for_name("Missing"),
            Err(ReflectError::ClassNotFound { .. })
        ));
    }
}
