//! Command implementations for the simpleread CLI
//!
//! Each command is implemented in its own module:
//! - `import`: descriptor-driven import with a summary or JSON report
//! - `import2d`: 2D matrix import
//! - `descriptor`: descriptor parsing and canonical rendering

pub mod descriptor;
pub mod import;
pub mod import2d;
pub mod shared;

use crate::cli::args::{Args, Commands};

/// Main command runner
///
/// Sets up logging for the selected command and dispatches to its handler.
pub fn run(args: Args) -> anyhow::Result<()> {
    shared::setup_logging(&args.logging());

    match args.command {
        Some(Commands::Import(import_args)) => import::run_import(import_args),
        Some(Commands::Import2d(import_args)) => import2d::run_import2d(import_args),
        Some(Commands::Descriptor(descriptor_args)) => {
            descriptor::run_descriptor(descriptor_args)
        }
        None => anyhow::bail!("No command given"),
    }
}
