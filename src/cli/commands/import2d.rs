//! 2D import command implementation

use super::shared::{print_datasets, print_json};
use crate::app::models::Document;
use crate::app::services::import_operation::Import2DOperation;
use crate::cli::args::{Import2DArgs, OutputFormat};
use anyhow::Context;
use colored::*;
use serde_json::json;
use tracing::debug;

/// 2D import command runner
pub fn run_import2d(args: Import2DArgs) -> anyhow::Result<()> {
    debug!("Import2D arguments: {:?}", args);

    let params = args.to_params().context("Invalid import arguments")?;
    let operation = Import2DOperation::new(params).context("Invalid 2D import parameters")?;

    let mut doc = Document::new();
    let outcome = operation
        .run(&mut doc)
        .context("Failed to import 2D data")?;

    let linked: Vec<String> = doc
        .linked_files()
        .iter()
        .map(|link| link.save_command(None))
        .collect();

    match args.format {
        OutputFormat::Json => {
            let data: serde_json::Map<String, serde_json::Value> = outcome
                .datasets
                .iter()
                .filter_map(|name| {
                    let dataset = doc.get(name)?;
                    Some((name.clone(), json!(dataset)))
                })
                .collect();
            print_json(&json!({
                "datasets": outcome.datasets,
                "rows": outcome.rows,
                "data": data,
                "linked": linked,
            }))
        }
        OutputFormat::Human => {
            println!("{}", "2D Import Summary".bright_green().bold());
            println!(
                "  Matrices read: {}",
                outcome.datasets.len().to_string().bright_white().bold()
            );
            print_datasets(&doc, &outcome.datasets, false);
            for command in &linked {
                println!("  Linked: {}", command.dimmed());
            }
            Ok(())
        }
    }
}
