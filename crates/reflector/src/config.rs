//! Model Descriptions
//!
//! Builds a [`ClassRegistry`] from a TOML or JSON description:
//!
//! ```toml
//! [[types]]
//! name = "Named"
//! kind = "interface"
//! methods = [{ name = "name", returns = "String", modifiers = ["public", "abstract"] }]
//!
//! [[types]]
//! name = "Dog"
//! extends = "Animal"
//! implements = ["Named"]
//!
//! [[types.fields]]
//! name = "tricks"
//! type = "int"
//! modifiers = ["private"]
//! ```
//!
//! Types may reference types declared further down; `Object` is implicit.

use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReflectError, Result};
use crate::model::{
    Class, ClassId, ClassKind, ClassRegistry, ConstructorInfo, FieldInfo, MethodInfo, Modifiers,
};

/// A whole model description
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HierarchyConfig {
    /// Classes and interfaces, in any order
    #[serde(default)]
    pub types: Vec<TypeConfig>,
}

/// One class or interface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TypeConfig {
    /// Unique type name
    pub name: String,

    /// `class` (default) or `interface`
    #[serde(default)]
    pub kind: ClassKind,

    /// Superclass name; classes default to `Object`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Implemented (or, for interfaces, extended) interface names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,

    /// Modifier keywords
    #[serde(default = "default_modifiers")]
    pub modifiers: Vec<String>,

    /// Declared fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfig>,

    /// Declared methods
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodConfig>,

    /// Declared constructors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<ConstructorConfig>,
}

/// Field description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Field name
    pub name: String,
    /// Declared type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// Modifier keywords
    #[serde(default = "default_modifiers")]
    pub modifiers: Vec<String>,
}

/// Method description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MethodConfig {
    /// Method name
    pub name: String,
    /// Parameter type names
    #[serde(default)]
    pub params: Vec<String>,
    /// Return type name
    #[serde(default = "default_return_type")]
    pub returns: String,
    /// Modifier keywords
    #[serde(default = "default_modifiers")]
    pub modifiers: Vec<String>,
}

/// Constructor description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConstructorConfig {
    /// Parameter type names
    #[serde(default)]
    pub params: Vec<String>,
    /// Modifier keywords
    #[serde(default = "default_modifiers")]
    pub modifiers: Vec<String>,
}

fn default_modifiers() -> Vec<String> {
    vec!["public".to_string()]
}

fn default_return_type() -> String {
    "void".to_string()
}

impl HierarchyConfig {
    /// Load a description from disk; `.json` files are parsed as JSON,
    /// anything else as TOML
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        debug!(path = %path.display(), json = is_json, "loading model description");

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parse and validate a TOML description
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: HierarchyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON description
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: HierarchyConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything that can be checked without resolving names
    pub fn validate(&self) -> Result<()> {
        let mut names = FxHashSet::default();

        for ty in &self.types {
            if ty.name.is_empty() {
                return Err(ReflectError::Validation(
                    "Type name cannot be empty".to_string(),
                ));
            }
            if ty.name == "Object" {
                return Err(ReflectError::Validation(
                    "Object is implicit and cannot be redeclared".to_string(),
                ));
            }
            if !names.insert(ty.name.as_str()) {
                return Err(ReflectError::DuplicateClass {
                    name: ty.name.clone(),
                });
            }

            if ty.kind == ClassKind::Interface {
                if ty.extends.is_some() {
                    return Err(ReflectError::Validation(format!(
                        "Interface {} cannot extend a class; use implements",
                        ty.name
                    )));
                }
                if !ty.constructors.is_empty() {
                    return Err(ReflectError::Validation(format!(
                        "Interface {} cannot declare constructors",
                        ty.name
                    )));
                }
            }

            parse_modifiers(&ty.name, &ty.modifiers)?;
            for field in &ty.fields {
                parse_modifiers(&format!("{}.{}", ty.name, field.name), &field.modifiers)?;
            }
            for method in &ty.methods {
                parse_modifiers(&format!("{}.{}", ty.name, method.name), &method.modifiers)?;
            }
            for constructor in &ty.constructors {
                parse_modifiers(&format!("{}.<init>", ty.name), &constructor.modifiers)?;
            }
        }

        Ok(())
    }

    /// Resolve names and register every type, dependencies first
    pub fn build_registry(&self) -> Result<ClassRegistry> {
        self.validate()?;

        let by_name: FxHashMap<&str, &TypeConfig> =
            self.types.iter().map(|ty| (ty.name.as_str(), ty)).collect();
        let mut registry = ClassRegistry::new();
        let mut stack = Vec::new();

        for ty in &self.types {
            self.register_type(&ty.name, &by_name, &mut registry, &mut stack)?;
        }

        debug!(classes = registry.len(), "built class registry");
        Ok(registry)
    }

    fn register_type<'c>(
        &'c self,
        name: &'c str,
        by_name: &FxHashMap<&'c str, &'c TypeConfig>,
        registry: &mut ClassRegistry,
        stack: &mut Vec<&'c str>,
    ) -> Result<ClassId> {
        if let Some(class) = registry.get_class_by_name(name) {
            return Ok(class.id);
        }

        if let Some(pos) = stack.iter().position(|pending| *pending == name) {
            let mut cycle = stack[pos..].to_vec();
            cycle.push(name);
            return Err(ReflectError::CyclicHierarchy {
                cycle: cycle.join(" -> "),
            });
        }

        let ty = by_name
            .get(name)
            .copied()
            .ok_or_else(|| ReflectError::ClassNotFound {
                name: name.to_string(),
            })?;

        stack.push(name);

        let parent_id = match (ty.kind, ty.extends.as_deref()) {
            (ClassKind::Interface, _) => None,
            (ClassKind::Class, None) => Some(ClassId::OBJECT),
            (ClassKind::Class, Some(parent)) => {
                Some(self.register_type(parent, by_name, registry, stack)?)
            }
        };

        let mut interfaces = Vec::with_capacity(ty.implements.len());
        for interface in &ty.implements {
            interfaces.push(self.register_type(interface, by_name, registry, stack)?);
        }

        stack.pop();

        let class = ty.to_class(registry.next_class_id(), parent_id, interfaces)?;
        registry.register_class(class)
    }
}

impl TypeConfig {
    fn to_class(
        &self,
        id: ClassId,
        parent_id: Option<ClassId>,
        interfaces: Vec<ClassId>,
    ) -> Result<Class> {
        let mut class = match self.kind {
            ClassKind::Class => Class::new(id, self.name.as_str()),
            ClassKind::Interface => Class::interface(id, self.name.as_str()),
        };
        class.parent_id = parent_id;
        class.interfaces = interfaces;

        let mut modifiers = parse_modifiers(&self.name, &self.modifiers)?;
        if class.is_interface() {
            modifiers.is_abstract = true;
        }
        class.modifiers = modifiers;

        for field in &self.fields {
            let modifiers = parse_modifiers(&field.name, &field.modifiers)?;
            class = class.with_field(
                FieldInfo::new(field.name.as_str(), field.type_name.as_str()).with_modifiers(modifiers),
            );
        }
        for method in &self.methods {
            let modifiers = parse_modifiers(&method.name, &method.modifiers)?;
            class = class.with_method(
                MethodInfo::new(method.name.as_str(), &method.params, method.returns.as_str())
                    .with_modifiers(modifiers),
            );
        }
        for constructor in &self.constructors {
            let modifiers = parse_modifiers(&self.name, &constructor.modifiers)?;
            class = class.with_constructor(
                ConstructorInfo::new(&constructor.params).with_modifiers(modifiers),
            );
        }

        Ok(class)
    }
}

fn parse_modifiers(owner: &str, keywords: &[String]) -> Result<Modifiers> {
    let mut modifiers = Modifiers::default();

    for keyword in keywords {
        if !modifiers.apply_keyword(keyword) {
            return Err(ReflectError::Validation(format!(
                "{}: unknown modifier '{}'",
                owner, keyword
            )));
        }
    }

    if modifiers.visibility_count() > 1 {
        return Err(ReflectError::Validation(format!(
            "{}: conflicting visibility modifiers",
            owner
        )));
    }

    Ok(modifiers)
}
