//! SimpleRead Library
//!
//! A Rust library for reading whitespace-separated scientific data files into
//! named, typed datasets driven by a compact column descriptor such as
//! `x+- y+,- z+-[1:5]`.
//!
//! This library provides tools for:
//! - Tokenizing data streams with comments, quoted strings and line continuation
//! - Parsing column descriptors with error bars, types and indexed families
//! - Reading data with type inference and tolerant numeric/date conversion
//! - Splitting a file into blocks of repeated data
//! - Reading 2D matrices with axis ranges and orientation settings
//! - Materializing the data into a document with linked-file bookkeeping

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod dates;
    pub mod models;
    pub mod services {
        pub mod import_operation;
        pub mod linked;
        pub mod matrix_reader;
        pub mod simple_read;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{DataKind, Dataset, DatasetSink, Document};
pub use app::services::import_operation::{Import2DOperation, ImportOperation, ImportOutcome};
pub use app::services::simple_read::{Descriptor, SimpleRead, Stream};
pub use config::{Import2DParams, ImportParams, ImportSource};

/// Result type alias for simpleread
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for reading and importing data
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Descriptor rejected by strict validation
    #[error("Invalid descriptor '{descriptor}': {message}")]
    Descriptor { descriptor: String, message: String },

    /// 2D matrix could not be read
    #[error("Matrix read error for dataset '{dataset}': {message}")]
    Matrix { dataset: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Neither a file nor inline text was given to read from
    #[error("No filename or data string to import from")]
    MissingSource,
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a descriptor validation error
    pub fn descriptor(descriptor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Descriptor {
            descriptor: descriptor.into(),
            message: message.into(),
        }
    }

    /// Create a 2D matrix read error
    pub fn matrix(dataset: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Matrix {
            dataset: dataset.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a missing source error
    pub fn missing_source() -> Self {
        Self::MissingSource
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
