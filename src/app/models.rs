//! Core data structures for simpleread
//!
//! Defines the data kinds a column can hold, the typed datasets produced by
//! the readers, and the document sink the datasets are handed to.

use crate::app::services::linked::LinkedFile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Kind of values held by a column group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Float,
    String,
    Date,
}

impl DataKind {
    /// Map a descriptor type tag such as `numeric` or `time` to a kind
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "float" | "numeric" | "number" => Some(DataKind::Float),
            "text" | "string" => Some(DataKind::String),
            "date" | "time" => Some(DataKind::Date),
            _ => None,
        }
    }

    /// Canonical descriptor tag for this kind
    pub fn type_tag(&self) -> &'static str {
        match self {
            DataKind::Float => "float",
            DataKind::String => "text",
            DataKind::Date => "date",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// A dataset produced by an import
///
/// Date values are seconds relative to the date epoch (see [`crate::app::dates`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Dataset {
    /// Numeric values with optional symmetric, positive and negative errors
    Numeric {
        data: Vec<f64>,
        serr: Option<Vec<f64>>,
        perr: Option<Vec<f64>>,
        nerr: Option<Vec<f64>>,
    },
    Text {
        data: Vec<String>,
    },
    Date {
        data: Vec<f64>,
    },
    /// A matrix whose first row is the lowest y value
    TwoD {
        data: Vec<Vec<f64>>,
        xrange: Option<(f64, f64)>,
        yrange: Option<(f64, f64)>,
    },
}

impl Dataset {
    /// Number of rows (or matrix rows)
    pub fn len(&self) -> usize {
        match self {
            Dataset::Numeric { data, .. } => data.len(),
            Dataset::Text { data } => data.len(),
            Dataset::Date { data } => data.len(),
            Dataset::TwoD { data, .. } => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the dataset variant
    pub fn kind_name(&self) -> &'static str {
        match self {
            Dataset::Numeric { .. } => "numeric",
            Dataset::Text { .. } => "text",
            Dataset::Date { .. } => "date",
            Dataset::TwoD { .. } => "2d",
        }
    }

    /// Numeric values, if this is a numeric dataset
    pub fn values(&self) -> Option<&[f64]> {
        match self {
            Dataset::Numeric { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Receiver of named datasets, normally a document
pub trait DatasetSink {
    /// Store a dataset under `name`, replacing any existing one
    fn set_data(&mut self, name: &str, dataset: Dataset, linked: Option<Arc<LinkedFile>>);
}

/// A dataset held by a document together with its link, if any
#[derive(Debug, Clone)]
pub struct DocumentEntry {
    pub dataset: Dataset,
    pub linked: Option<Arc<LinkedFile>>,
}

/// In-memory document keyed by dataset name
#[derive(Debug, Default, Clone)]
pub struct Document {
    entries: BTreeMap<String, DocumentEntry>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.entries.get(name).map(|e| &e.dataset)
    }

    pub fn entry(&self, name: &str) -> Option<&DocumentEntry> {
        self.entries.get(name)
    }

    /// Dataset names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct linked files referenced by datasets in this document
    pub fn linked_files(&self) -> Vec<Arc<LinkedFile>> {
        let mut links: Vec<Arc<LinkedFile>> = Vec::new();
        for entry in self.entries.values() {
            if let Some(link) = &entry.linked {
                if !links.iter().any(|l| Arc::ptr_eq(l, link)) {
                    links.push(Arc::clone(link));
                }
            }
        }
        links
    }
}

impl DatasetSink for Document {
    fn set_data(&mut self, name: &str, dataset: Dataset, linked: Option<Arc<LinkedFile>>) {
        self.entries
            .insert(name.to_string(), DocumentEntry { dataset, linked });
    }
}
