//! `reflector hierarchy` — Print a class's ascent.

use std::path::Path;

use reflector::Reflector;

use super::load_registry;

pub fn execute(file: &Path, class: &str) -> anyhow::Result<()> {
    let registry = load_registry(file)?;
    let start = Reflector::new(&registry).class_for_name(class)?;

    for (depth, level) in registry.class_hierarchy(start.id).iter().enumerate() {
        println!("{}{} {}", "  ".repeat(depth), level.kind, level.name);

        let interfaces: Vec<_> = registry
            .all_interfaces(level.id)
            .into_iter()
            .filter_map(|id| registry.get_class(id))
            .map(|iface| iface.name.as_str())
            .collect();
        if !interfaces.is_empty() {
            println!("{}  implements {}", "  ".repeat(depth), interfaces.join(", "));
        }
    }

    Ok(())
}
