//! Command-line argument definitions for simpleread
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::{Import2DParams, ImportParams, ImportSource};
use crate::constants::DEFAULT_ENCODING;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the simpleread data importer
///
/// Reads whitespace-separated data files into named datasets using a compact
/// column descriptor.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "simpleread",
    version,
    about = "Read column data files into named datasets using a descriptor",
    long_about = "Reads whitespace-separated scientific data into named, typed datasets. \
                  A descriptor such as 'x+- y+,- z+-[1:5]' says which dataset each column \
                  belongs to, including error bar columns and indexed dataset families."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Import datasets from a file or string using a descriptor
    Import(ImportArgs),
    /// Import 2D matrices from a file or string
    Import2d(Import2DArgs),
    /// Parse a descriptor and print its canonical form
    Descriptor(DescriptorArgs),
}

/// Logging flags shared by every command
#[derive(Debug, Clone, Default, Parser)]
pub struct LoggingArgs {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl LoggingArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Data file to read
    #[arg(value_name = "FILE", required_unless_present = "data")]
    pub file: Option<PathBuf>,

    /// Read this text instead of a file
    #[arg(long = "data", value_name = "TEXT", conflicts_with = "file")]
    pub data: Option<String>,

    /// Column descriptor; leave empty to name columns automatically
    #[arg(
        short = 'd',
        long = "descriptor",
        value_name = "DESCRIPTOR",
        default_value = "",
        allow_hyphen_values = true
    )]
    pub descriptor: String,

    /// Read blank-line or `no` separated blocks into `_1`, `_2`, ... datasets
    #[arg(short = 'b', long = "blocks")]
    pub blocks: bool,

    /// Skip lines that start with text
    #[arg(long = "ignore-text")]
    pub ignore_text: bool,

    /// Prefix added to each dataset name
    #[arg(long = "prefix", value_name = "TEXT", default_value = "")]
    pub prefix: String,

    /// Suffix added to each dataset name
    #[arg(long = "suffix", value_name = "TEXT", default_value = "")]
    pub suffix: String,

    /// Keep only the last N rows of each dataset
    #[arg(long = "tail", value_name = "N")]
    pub tail: Option<usize>,

    /// Reject descriptors with syntax errors
    #[arg(long = "strict")]
    pub strict: bool,

    /// Link the datasets to the file and print the command that recreates the link
    #[arg(long = "linked", requires = "file")]
    pub linked: bool,

    /// Text encoding of the file
    #[arg(long = "encoding", value_name = "NAME", default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Print the values of each dataset
    #[arg(long = "show-data")]
    pub show_data: bool,

    /// Output format for results
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl ImportArgs {
    /// Build import parameters from the arguments
    pub fn to_params(&self) -> Result<ImportParams> {
        let mut params = ImportParams {
            source: Some(source(&self.file, &self.data)?),
            descriptor: self.descriptor.clone(),
            use_blocks: self.blocks,
            ignore_text: self.ignore_text,
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            linked: self.linked,
            strict_descriptor: self.strict,
            encoding: self.encoding.clone(),
            ..Default::default()
        };
        if let Some(tail) = self.tail {
            params = params.with_tail(tail);
        }
        Ok(params)
    }
}

/// Arguments for the 2D import command
#[derive(Debug, Clone, Parser)]
pub struct Import2DArgs {
    /// Data file to read
    #[arg(value_name = "FILE", required_unless_present = "data")]
    pub file: Option<PathBuf>,

    /// Read this text instead of a file
    #[arg(long = "data", value_name = "TEXT", conflicts_with = "file")]
    pub data: Option<String>,

    /// Names of the matrices to read, in file order
    #[arg(
        short = 'n',
        long = "names",
        value_name = "LIST",
        value_delimiter = ',',
        required = true
    )]
    pub names: Vec<String>,

    /// Range of the x axis as MIN,MAX
    #[arg(long = "xrange", value_name = "MIN,MAX", value_parser = parse_range, allow_hyphen_values = true)]
    pub xrange: Option<(f64, f64)>,

    /// Range of the y axis as MIN,MAX
    #[arg(long = "yrange", value_name = "MIN,MAX", value_parser = parse_range, allow_hyphen_values = true)]
    pub yrange: Option<(f64, f64)>,

    /// Reverse the order of the rows
    #[arg(long = "invert-rows")]
    pub invert_rows: bool,

    /// Reverse the order of the columns
    #[arg(long = "invert-cols")]
    pub invert_cols: bool,

    /// Swap rows and columns
    #[arg(long = "transpose")]
    pub transpose: bool,

    /// Prefix added to each dataset name
    #[arg(long = "prefix", value_name = "TEXT", default_value = "")]
    pub prefix: String,

    /// Suffix added to each dataset name
    #[arg(long = "suffix", value_name = "TEXT", default_value = "")]
    pub suffix: String,

    /// Link the datasets to the file and print the command that recreates the link
    #[arg(long = "linked", requires = "file")]
    pub linked: bool,

    /// Text encoding of the file
    #[arg(long = "encoding", value_name = "NAME", default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Output format for results
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl Import2DArgs {
    /// Build 2D import parameters from the arguments
    pub fn to_params(&self) -> Result<Import2DParams> {
        Ok(Import2DParams {
            source: Some(source(&self.file, &self.data)?),
            dataset_names: self.names.clone(),
            xrange: self.xrange,
            yrange: self.yrange,
            invert_rows: self.invert_rows,
            invert_cols: self.invert_cols,
            transpose: self.transpose,
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            linked: self.linked,
            encoding: self.encoding.clone(),
        })
    }
}

/// Arguments for the descriptor command
#[derive(Debug, Clone, Parser)]
pub struct DescriptorArgs {
    /// Descriptor to parse
    #[arg(value_name = "DESCRIPTOR", allow_hyphen_values = true)]
    pub descriptor: String,

    /// Reject descriptors with syntax errors
    #[arg(long = "strict")]
    pub strict: bool,

    /// Output format for results
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Logging flags of the selected command
    pub fn logging(&self) -> LoggingArgs {
        match &self.command {
            Some(Commands::Import(args)) => args.logging.clone(),
            Some(Commands::Import2d(args)) => args.logging.clone(),
            Some(Commands::Descriptor(args)) => args.logging.clone(),
            None => LoggingArgs::default(),
        }
    }
}

fn source(file: &Option<PathBuf>, data: &Option<String>) -> Result<ImportSource> {
    match (file, data) {
        (Some(path), _) => Ok(ImportSource::File(path.clone())),
        (None, Some(text)) => Ok(ImportSource::Text(unescape_newlines(text))),
        (None, None) => Err(Error::missing_source()),
    }
}

/// Let `--data` carry several lines as `\n`
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Parse `MIN,MAX` into a pair of floats
fn parse_range(text: &str) -> std::result::Result<(f64, f64), String> {
    let (min, max) = text
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got '{}'", text))?;
    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{}': {}", value.trim(), e))
    };
    Ok((parse(min)?, parse(max)?))
}
