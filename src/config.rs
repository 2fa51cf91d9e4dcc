//! Import parameters and validation.
//!
//! Provides the parameter structures for descriptor-driven imports and
//! 2D matrix imports, with builder methods and validation rules.

use crate::app::services::simple_read::{resolve_encoding, Descriptor};
use crate::constants::DEFAULT_ENCODING;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where data for an import comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportSource {
    /// Read from a file on disk
    File(PathBuf),
    /// Read from an in-memory string
    Text(String),
}

impl ImportSource {
    /// File path, if reading from a file
    pub fn path(&self) -> Option<&Path> {
        match self {
            ImportSource::File(path) => Some(path),
            ImportSource::Text(_) => None,
        }
    }
}

/// Parameters for a descriptor-driven import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportParams {
    /// Source of the data, if set
    pub source: Option<ImportSource>,

    /// Column descriptor; empty means automatic column naming
    pub descriptor: String,

    /// Read blank-line or `no` separated blocks into suffixed datasets
    pub use_blocks: bool,

    /// Skip lines that start with text
    pub ignore_text: bool,

    /// Prefix for output dataset names
    pub prefix: String,

    /// Suffix for output dataset names
    pub suffix: String,

    /// Keep only the last N rows of each dataset
    pub tail: Option<usize>,

    /// Remember the file so the document can reread it
    pub linked: bool,

    /// Reject descriptors with syntax errors instead of reading leniently
    pub strict_descriptor: bool,

    /// Text encoding of the file
    pub encoding: String,
}

impl Default for ImportParams {
    fn default() -> Self {
        Self {
            source: None,
            descriptor: String::new(),
            use_blocks: false,
            ignore_text: false,
            prefix: String::new(),
            suffix: String::new(),
            tail: None,
            linked: false,
            strict_descriptor: false,
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl ImportParams {
    /// Create parameters for importing a file with the given descriptor
    pub fn from_file(path: impl Into<PathBuf>, descriptor: impl Into<String>) -> Self {
        Self {
            source: Some(ImportSource::File(path.into())),
            descriptor: descriptor.into(),
            ..Default::default()
        }
    }

    /// Create parameters for importing in-memory text with the given descriptor
    pub fn from_text(text: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            source: Some(ImportSource::Text(text.into())),
            descriptor: descriptor.into(),
            ..Default::default()
        }
    }

    /// Read the data in blocks
    pub fn with_blocks(mut self) -> Self {
        self.use_blocks = true;
        self
    }

    /// Skip lines beginning with text
    pub fn with_ignore_text(mut self) -> Self {
        self.ignore_text = true;
        self
    }

    /// Set output name prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set output name suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Keep only the last `tail` rows
    pub fn with_tail(mut self, tail: usize) -> Self {
        self.tail = Some(tail);
        self
    }

    /// Link the datasets to the source file
    pub fn with_linked(mut self) -> Self {
        self.linked = true;
        self
    }

    /// Validate the descriptor strictly before reading
    pub fn with_strict_descriptor(mut self) -> Self {
        self.strict_descriptor = true;
        self
    }

    /// Set the text encoding of the file
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Check the parameters are consistent
    pub fn validate(&self) -> Result<()> {
        if self.tail == Some(0) {
            return Err(Error::configuration("tail must be at least 1"));
        }

        if self.linked && !matches!(self.source, Some(ImportSource::File(_))) {
            return Err(Error::configuration(
                "linked imports require a file to read from",
            ));
        }

        if self.strict_descriptor {
            Descriptor::parse_strict(&self.descriptor)?;
        }

        resolve_encoding(&self.encoding)?;

        debug!("Import parameters validated: {:?}", self);
        Ok(())
    }
}

/// Parameters for a 2D matrix import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import2DParams {
    /// Source of the data, if set
    pub source: Option<ImportSource>,

    /// Names of the datasets to read, one matrix each
    pub dataset_names: Vec<String>,

    /// Range of the x axis covered by the matrix
    pub xrange: Option<(f64, f64)>,

    /// Range of the y axis covered by the matrix
    pub yrange: Option<(f64, f64)>,

    /// Reverse the order of the rows
    pub invert_rows: bool,

    /// Reverse the order of the columns
    pub invert_cols: bool,

    /// Swap rows and columns
    pub transpose: bool,

    /// Prefix for output dataset names
    pub prefix: String,

    /// Suffix for output dataset names
    pub suffix: String,

    /// Remember the file so the document can reread it
    pub linked: bool,

    /// Text encoding of the file
    pub encoding: String,
}

impl Default for Import2DParams {
    fn default() -> Self {
        Self {
            source: None,
            dataset_names: Vec::new(),
            xrange: None,
            yrange: None,
            invert_rows: false,
            invert_cols: false,
            transpose: false,
            prefix: String::new(),
            suffix: String::new(),
            linked: false,
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl Import2DParams {
    /// Create parameters for reading the named matrices from a file
    pub fn from_file(path: impl Into<PathBuf>, dataset_names: Vec<String>) -> Self {
        Self {
            source: Some(ImportSource::File(path.into())),
            dataset_names,
            ..Default::default()
        }
    }

    /// Create parameters for reading the named matrices from text
    pub fn from_text(text: impl Into<String>, dataset_names: Vec<String>) -> Self {
        Self {
            source: Some(ImportSource::Text(text.into())),
            dataset_names,
            ..Default::default()
        }
    }

    /// Set the x axis range
    pub fn with_xrange(mut self, min: f64, max: f64) -> Self {
        self.xrange = Some((min, max));
        self
    }

    /// Set the y axis range
    pub fn with_yrange(mut self, min: f64, max: f64) -> Self {
        self.yrange = Some((min, max));
        self
    }

    /// Swap rows and columns after reading
    pub fn with_transpose(mut self) -> Self {
        self.transpose = true;
        self
    }

    /// Set output name prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set output name suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Link the datasets to the source file
    pub fn with_linked(mut self) -> Self {
        self.linked = true;
        self
    }

    /// Set the text encoding of the file
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Check the parameters are consistent
    pub fn validate(&self) -> Result<()> {
        if self.dataset_names.is_empty() {
            return Err(Error::configuration("no dataset names given for 2D import"));
        }

        if self.linked && !matches!(self.source, Some(ImportSource::File(_))) {
            return Err(Error::configuration(
                "linked imports require a file to read from",
            ));
        }

        for (axis, range) in [("xrange", self.xrange), ("yrange", self.yrange)] {
            if let Some((min, max)) = range {
                if !min.is_finite() || !max.is_finite() {
                    return Err(Error::configuration(format!(
                        "{} must be finite, got ({}, {})",
                        axis, min, max
                    )));
                }
            }
        }

        resolve_encoding(&self.encoding)?;
        Ok(())
    }
}
