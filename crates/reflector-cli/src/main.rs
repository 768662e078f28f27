//! Reflector CLI
//!
//! Inspect a class model description and run digs against it.

use clap::{Parser, Subcommand};
use reflector_cli::commands;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reflector")]
#[command(about = "Inspect class models and dig for members", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every class and interface in a model
    Classes {
        /// Model description (.toml or .json)
        file: PathBuf,
    },

    /// Show a class's ascent and the interfaces reachable at each level
    Hierarchy {
        /// Model description (.toml or .json)
        file: PathBuf,
        /// Class to inspect
        class: String,
    },

    /// Dig for a member starting at a class
    Dig {
        /// Model description (.toml or .json)
        file: PathBuf,
        /// Class the search starts from
        class: String,
        /// Last class probed (inclusive); defaults to Object
        #[arg(short, long)]
        bound: Option<String>,
        #[command(subcommand)]
        member: commands::dig::MemberQuery,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classes { file } => commands::classes::execute(&file),
        Commands::Hierarchy { file, class } => commands::hierarchy::execute(&file, &class),
        Commands::Dig {
            file,
            class,
            bound,
            member,
        } => commands::dig::execute(&file, &class, bound.as_deref(), &member),
    }
}
