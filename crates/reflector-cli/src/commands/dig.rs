//! `reflector dig` — Run one dig and print the owner of the match.

use std::path::Path;

use clap::Subcommand;
use reflector::{ClassId, ClassRegistry, Reflector};

use super::load_registry;

/// Which member kind to dig for
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum MemberQuery {
    /// Field of any visibility with this name
    Field {
        /// Field name
        name: String,
    },
    /// Method with this name, checking interfaces at each level
    Method {
        /// Method name
        name: String,
        /// Exact parameter types, comma separated; any signature if omitted
        #[arg(short, long, value_delimiter = ',')]
        params: Option<Vec<String>>,
    },
    /// Constructor with exactly these parameter types
    Constructor {
        /// Parameter types, comma separated
        #[arg(value_delimiter = ',')]
        params: Vec<String>,
    },
}

pub fn execute(
    file: &Path,
    class: &str,
    bound: Option<&str>,
    member: &MemberQuery,
) -> anyhow::Result<()> {
    let registry = load_registry(file)?;
    println!("{}", run(&registry, class, bound, member)?);
    Ok(())
}

/// Run one dig by class names and render the match as `Owner::member`.
///
/// `bound` defaults to `Object`; a miss is an error.
pub fn run(
    registry: &ClassRegistry,
    class: &str,
    bound: Option<&str>,
    member: &MemberQuery,
) -> anyhow::Result<String> {
    let reflector = Reflector::new(registry);

    let start = reflector.class_for_name(class)?.id;
    let bound = match bound {
        Some(name) => reflector.class_for_name(name)?.id,
        None => ClassId::OBJECT,
    };

    let found = match member {
        MemberQuery::Field { name } => reflector
            .dig_for_field(start, |f| &f.name == name, bound)?
            .map(|found| {
                let field = found.member();
                (found.owner(), format!("{}: {}", field.name, field.type_name))
            }),
        MemberQuery::Method { name, params } => reflector
            .dig_for_method(
                start,
                |m| {
                    &m.name == name
                        && params
                            .as_ref()
                            .is_none_or(|params| &m.parameter_types == params)
                },
                bound,
            )?
            .map(|found| {
                let method = found.member();
                (found.owner(), format!("{} -> {}", method.signature(), method.return_type))
            }),
        MemberQuery::Constructor { params } => reflector
            .dig_for_constructor(start, |c| &c.parameter_types == params, bound)?
            .map(|found| {
                let ctor = found.member();
                (found.owner(), format!("<init>({})", ctor.parameter_types.join(", ")))
            }),
    };

    match found {
        Some((owner, rendered)) => Ok(format!("{}::{}", owner_name(registry, owner), rendered)),
        None => anyhow::bail!(
            "no match between {} and {}",
            class,
            owner_name(registry, bound)
        ),
    }
}

fn owner_name(registry: &ClassRegistry, id: ClassId) -> &str {
    registry
        .get_class(id)
        .map(|class| class.name.as_str())
        .unwrap_or("?")
}
