//! Subcommand implementations.

pub mod classes;
pub mod dig;
pub mod hierarchy;

use std::path::Path;

use anyhow::Context;
use reflector::{ClassRegistry, HierarchyConfig};

/// Load and build the registry described by `file`.
pub fn load_registry(file: &Path) -> anyhow::Result<ClassRegistry> {
    let config = HierarchyConfig::from_file(file)
        .with_context(|| format!("loading {}", file.display()))?;
    Ok(config.build_registry()?)
}
