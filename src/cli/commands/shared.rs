//! Shared components for CLI commands
//!
//! Logging setup and dataset rendering used by more than one command.

use crate::app::dates::date_to_string;
use crate::app::models::{Dataset, Document};
use crate::cli::args::LoggingArgs;
use anyhow::Context;
use colored::*;
use serde::Serialize;
use tracing::debug;

/// Set up structured logging for a command
///
/// `RUST_LOG` takes precedence; otherwise the level follows the verbosity
/// flags. Logs go to stderr so stdout stays clean for results.
pub fn setup_logging(args: &LoggingArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("simpleread={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize results")?;
    println!("{}", json);
    Ok(())
}

/// Print one summary line per dataset, optionally followed by its values
pub fn print_datasets(doc: &Document, names: &[String], show_data: bool) {
    for name in names {
        let Some(dataset) = doc.get(name) else {
            continue;
        };
        println!(
            "  {:<20} {:<8} {} rows",
            name.bright_white().bold(),
            dataset.kind_name(),
            dataset.len()
        );
        if show_data {
            for line in format_values(dataset) {
                println!("      {}", line);
            }
        }
    }
}

/// Render the values of a dataset, one row per line
pub fn format_values(dataset: &Dataset) -> Vec<String> {
    match dataset {
        Dataset::Numeric {
            data,
            serr,
            perr,
            nerr,
        } => (0..data.len())
            .map(|i| {
                let mut row = data[i].to_string();
                if let Some(serr) = serr {
                    row.push_str(&format!(" ± {}", serr[i]));
                }
                if let Some(perr) = perr {
                    row.push_str(&format!(" +{}", perr[i]));
                }
                if let Some(nerr) = nerr {
                    row.push_str(&format!(" -{}", nerr[i]));
                }
                row
            })
            .collect(),
        Dataset::Text { data } => data.iter().map(|s| format!("{:?}", s)).collect(),
        Dataset::Date { data } => data
            .iter()
            .map(|&v| date_to_string(v).unwrap_or_else(|| "invalid date".to_string()))
            .collect(),
        Dataset::TwoD { data, .. } => data
            .iter()
            .map(|row| {
                row.iter()
                    .map(f64::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_numeric_with_errors() {
        let dataset = Dataset::Numeric {
            data: vec![1.0, 2.5],
            serr: None,
            perr: Some(vec![0.1, 0.2]),
            nerr: Some(vec![0.3, 0.4]),
        };
        assert_eq!(format_values(&dataset), vec!["1 +0.1 -0.3", "2.5 +0.2 -0.4"]);
    }

    #[test]
    fn test_format_dates() {
        let dataset = Dataset::Date {
            data: vec![0.0, f64::NAN],
        };
        assert_eq!(
            format_values(&dataset),
            vec!["2009-01-01T00:00:00", "invalid date"]
        );
    }
}
