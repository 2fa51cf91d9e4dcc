//! Test utilities for descriptor-driven reading
//!
//! Helpers that run a whole read pass over in-memory text and pull values
//! back out of the resulting document.

use std::io::Write;
use tempfile::NamedTempFile;

use crate::app::models::{Dataset, Document};
use crate::app::services::simple_read::{SimpleRead, Stream};

// Test modules
mod descriptor_tests;
mod stream_tests;

/// Read `text` with `descriptor` and return the document and dataset names
pub fn read_text(descriptor: &str, text: &str) -> (Document, Vec<String>) {
    read_with(SimpleRead::from_descriptor(descriptor), text, false, false)
}

/// Read `text` in block mode
pub fn read_blocks(descriptor: &str, text: &str) -> (Document, Vec<String>) {
    read_with(SimpleRead::from_descriptor(descriptor), text, true, false)
}

/// Run a full read pass with an existing reader
pub fn read_with(
    mut reader: SimpleRead,
    text: &str,
    use_blocks: bool,
    ignore_text: bool,
) -> (Document, Vec<String>) {
    let mut stream = Stream::from_text(text);
    reader
        .read_data(&mut stream, use_blocks, ignore_text)
        .expect("in-memory read cannot fail");
    let mut doc = Document::new();
    let names = reader.set_in_document(&mut doc, None, "", "");
    (doc, names)
}

/// Numeric values of a dataset, panicking if it is missing or not numeric
pub fn values(doc: &Document, name: &str) -> Vec<f64> {
    match doc.get(name) {
        Some(Dataset::Numeric { data, .. }) => data.clone(),
        other => panic!("expected numeric dataset '{}', got {:?}", name, other),
    }
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}
