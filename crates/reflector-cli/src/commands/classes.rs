//! `reflector classes` — List every type in a model.

use std::path::Path;

use super::load_registry;

pub fn execute(file: &Path) -> anyhow::Result<()> {
    let registry = load_registry(file)?;

    for (id, class) in registry.iter() {
        let parent = class
            .parent_id
            .and_then(|parent| registry.get_class(parent))
            .map(|parent| parent.name.as_str())
            .unwrap_or("-");

        println!(
            "{:>4}  {:<9} {:<24} extends {:<16} ({} fields, {} methods, {} constructors)",
            id.to_string(),
            class.kind,
            class.name,
            parent,
            class.fields.len(),
            class.methods.len(),
            class.constructors.len()
        );
    }

    Ok(())
}
