//! Import command implementation

use super::shared::{print_datasets, print_json};
use crate::app::models::{Dataset, Document};
use crate::app::services::import_operation::{ImportOperation, ImportOutcome};
use crate::cli::args::{ImportArgs, OutputFormat};
use anyhow::Context;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

/// JSON report for an import
#[derive(Debug, Serialize)]
pub struct ImportReport<'a> {
    #[serde(flatten)]
    pub outcome: &'a ImportOutcome,
    pub data: BTreeMap<&'a str, &'a Dataset>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked: Vec<String>,
}

/// Import command runner
pub fn run_import(args: ImportArgs) -> anyhow::Result<()> {
    let start_time = Instant::now();
    debug!("Import arguments: {:?}", args);

    let params = args.to_params().context("Invalid import arguments")?;
    let mut operation = ImportOperation::new(params).context("Invalid import parameters")?;

    let mut doc = Document::new();
    let outcome = operation
        .run(&mut doc)
        .context("Failed to import data")?;
    info!("Import finished in {:.2?}", start_time.elapsed());

    let linked: Vec<String> = doc
        .linked_files()
        .iter()
        .map(|link| link.save_command(None))
        .collect();

    match args.format {
        OutputFormat::Json => {
            let data = outcome
                .datasets
                .iter()
                .filter_map(|name| doc.get(name).map(|d| (name.as_str(), d)))
                .collect();
            print_json(&ImportReport {
                outcome: &outcome,
                data,
                linked,
            })
        }
        OutputFormat::Human => {
            print_summary(&doc, &outcome, &linked, args.show_data);
            Ok(())
        }
    }
}

fn print_summary(doc: &Document, outcome: &ImportOutcome, linked: &[String], show_data: bool) {
    println!("{}", "Import Summary".bright_green().bold());
    println!(
        "  Datasets read: {}",
        outcome.datasets.len().to_string().bright_white().bold()
    );
    print_datasets(doc, &outcome.datasets, show_data);

    if outcome.total_invalid() > 0 {
        for (name, count) in outcome.failed_groups() {
            println!(
                "  {} {} conversions failed for dataset '{}'",
                "Warning:".yellow().bold(),
                count,
                name
            );
        }
    }

    for command in linked {
        println!("  Linked: {}", command.dimmed());
    }
}
