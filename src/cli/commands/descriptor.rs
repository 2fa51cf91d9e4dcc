//! Descriptor command implementation

use super::shared::print_json;
use crate::app::services::simple_read::Descriptor;
use crate::cli::args::{DescriptorArgs, OutputFormat};
use anyhow::Context;
use colored::*;
use serde_json::json;

/// Parse a descriptor and print its groups and canonical form
pub fn run_descriptor(args: DescriptorArgs) -> anyhow::Result<()> {
    let descriptor = if args.strict {
        Descriptor::parse_strict(&args.descriptor).context("Descriptor rejected")?
    } else {
        Descriptor::parse(&args.descriptor)
    };

    match args.format {
        OutputFormat::Json => {
            let groups: Vec<_> = descriptor
                .groups()
                .iter()
                .map(|group| {
                    json!({
                        "name": group.name,
                        "type": group.declared.map(|kind| kind.type_tag()),
                        "roles": group.roles.iter().map(|role| role.marker()).collect::<Vec<_>>(),
                        "range": group.range.map(|range| (range.start, range.stop)),
                    })
                })
                .collect();
            print_json(&json!({
                "canonical": descriptor.to_string(),
                "groups": groups,
            }))
        }
        OutputFormat::Human => {
            if descriptor.is_empty() {
                println!("{}", "Empty descriptor: columns are named automatically".yellow());
                return Ok(());
            }
            println!("{} {}", "Canonical:".bright_green().bold(), descriptor);
            for group in descriptor.groups() {
                let kind = group
                    .declared
                    .map_or_else(|| "inferred".to_string(), |kind| kind.to_string());
                let roles: Vec<_> = group.roles.iter().map(|role| role.marker()).collect();
                let range = group
                    .range
                    .map_or_else(String::new, |range| format!(" {}", range));
                println!(
                    "  {:<16} {:<9} {}{}",
                    group.name.bright_white().bold(),
                    kind,
                    roles.join(" "),
                    range
                );
            }
            Ok(())
        }
    }
}
