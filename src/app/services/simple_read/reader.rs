//! Reader driver: feeds stream lines to the column groups and materializes
//! the buffers into datasets

use super::column_group::Buffers;
use super::descriptor::{ColumnGroup, Descriptor, Role};
use super::stream::Stream;
use crate::app::models::{DataKind, DatasetSink};
use crate::app::services::linked::LinkedFile;
use crate::constants::{AUTO_COLUMN_PREFIX, BLOCK_SEPARATOR, DESCRIPTOR_DIRECTIVE, NUMERIC_LINE_WORDS};
use crate::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Reads datasets from a stream as laid out by a descriptor
///
/// The reader keeps its buffers between [`read_data`](Self::read_data) calls
/// until [`set_in_document`](Self::set_in_document) hands them to a sink.
#[derive(Debug, Clone)]
pub struct SimpleRead {
    descriptor: Descriptor,
    groups: Vec<ColumnGroup>,
    active: Vec<usize>,
    auto_descriptor: bool,
    buffers: Buffers,
    blocks: BTreeSet<usize>,
    tail: Option<usize>,
}

impl SimpleRead {
    /// Create a reader for the descriptor; an empty descriptor names columns
    /// automatically
    pub fn new(descriptor: Descriptor) -> Self {
        let mut reader = Self {
            auto_descriptor: descriptor.is_empty(),
            descriptor,
            groups: Vec::new(),
            active: Vec::new(),
            buffers: Buffers::new(),
            blocks: BTreeSet::new(),
            tail: None,
        };
        reader.clear_state();
        reader
    }

    /// Parse the descriptor leniently and create a reader for it
    pub fn from_descriptor(descriptor: &str) -> Self {
        Self::new(Descriptor::parse(descriptor))
    }

    /// Keep only the last `tail` rows of each dataset; zero keeps every row
    pub fn with_tail(mut self, tail: usize) -> Self {
        self.tail = (tail > 0).then_some(tail);
        self
    }

    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    /// Start reading from scratch with the descriptor given at construction
    pub fn clear_state(&mut self) {
        self.groups = self.descriptor.groups().to_vec();
        self.groups.iter_mut().for_each(ColumnGroup::reset);
        self.active = (0..self.groups.len()).collect();
        self.auto_descriptor = self.descriptor.is_empty();
        self.buffers.clear();
        self.blocks.clear();
    }

    /// All groups that will be materialized, in the order they were added
    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    /// Read every line of the stream
    ///
    /// In block mode, blank lines and lines starting with `no` separate blocks
    /// and dataset names get a `_<block>` suffix. With `ignore_text`, lines
    /// starting with a word are skipped unless the first column holds text.
    pub fn read_data<R: BufRead>(
        &mut self,
        stream: &mut Stream<R>,
        use_blocks: bool,
        ignore_text: bool,
    ) -> Result<()> {
        let mut block = 1;
        let mut lines = 0usize;

        while stream.new_line()? {
            lines += 1;
            if use_blocks {
                let separator = match stream.all_columns().first() {
                    None => true,
                    Some(first) => first.eq_ignore_ascii_case(BLOCK_SEPARATOR),
                };
                if separator {
                    if self.blocks.contains(&block) {
                        block += 1;
                        debug!("Advancing to block {} at line {}", block, stream.line_number());
                    }
                    stream.flush_line();
                    continue;
                }
                if self.read_line(stream, Some(block), ignore_text) {
                    self.blocks.insert(block);
                }
            } else {
                self.read_line(stream, None, ignore_text);
            }
            stream.flush_line();
        }

        info!(
            "Read {} lines into {} buffers ({} groups{})",
            lines,
            self.buffers.len(),
            self.groups.len(),
            if use_blocks {
                format!(", {} blocks", self.blocks.len())
            } else {
                String::new()
            }
        );
        Ok(())
    }

    /// Handle one logical line; returns whether it was dispatched as data
    fn read_line<R: BufRead>(
        &mut self,
        stream: &mut Stream<R>,
        block: Option<usize>,
        ignore_text: bool,
    ) -> bool {
        let columns = stream.all_columns();

        if columns.first().map(String::as_str) == Some(DESCRIPTOR_DIRECTIVE) {
            let text = columns[1..].join(" ");
            let descriptor = Descriptor::parse(&text);
            debug!(
                "Descriptor changed to '{}' at line {}",
                descriptor,
                stream.line_number()
            );
            let first = self.groups.len();
            self.groups.extend(descriptor.into_groups());
            self.active = (first..self.groups.len()).collect();
            self.auto_descriptor = false;
            return false;
        }

        if ignore_text && self.is_text_line(columns) {
            trace!("Skipping text line {}", stream.line_number());
            return false;
        }

        if columns.is_empty() {
            return false;
        }

        for &i in &self.active {
            self.groups[i].read_from_stream(stream, &mut self.buffers, block);
        }

        if self.auto_descriptor {
            while !stream.all_columns().is_empty() {
                let mut group = ColumnGroup::single((self.active.len() + 1).to_string());
                group.read_from_stream(stream, &mut self.buffers, block);
                self.active.push(self.groups.len());
                self.groups.push(group);
            }
        }

        true
    }

    fn is_text_line(&self, columns: &[String]) -> bool {
        let Some(first) = columns.first() else {
            return false;
        };
        let starts_with_letter = first.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        let numeric_word = NUMERIC_LINE_WORDS
            .iter()
            .any(|word| first.eq_ignore_ascii_case(word));
        let first_is_text = match self.active.first() {
            Some(&i) => self.groups[i].datatype() == Some(DataKind::String),
            None => return false,
        };
        starts_with_letter && !numeric_word && !first_is_text
    }

    /// Number of failed numeric conversions per group name
    pub fn invalid_conversions(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for group in &self.groups {
            *counts.entry(group.name.clone()).or_insert(0) += group.error_count();
        }
        counts
    }

    /// Rows read so far per dataset, before truncation
    pub fn dataset_counts(&self) -> BTreeMap<String, usize> {
        self.buffers
            .iter()
            .filter(|(key, _)| key.role == Role::Data)
            .map(|(key, values)| (key.dataset_name(), values.len()))
            .collect()
    }

    /// Hand the datasets read to the sink and return their final names
    pub fn set_in_document(
        &mut self,
        sink: &mut dyn DatasetSink,
        linked: Option<Arc<LinkedFile>>,
        prefix: &str,
        suffix: &str,
    ) -> Vec<String> {
        self.materialize(sink, linked, prefix, suffix)
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    /// As [`set_in_document`](Self::set_in_document), also returning the
    /// number of rows given to each dataset
    pub fn materialize(
        &mut self,
        sink: &mut dyn DatasetSink,
        linked: Option<Arc<LinkedFile>>,
        prefix: &str,
        suffix: &str,
    ) -> Vec<(String, usize)> {
        let prefix = if self.auto_descriptor && prefix.is_empty() && suffix.is_empty() {
            AUTO_COLUMN_PREFIX
        } else {
            prefix
        };

        let blocks: Vec<Option<usize>> = if self.blocks.is_empty() {
            vec![None]
        } else {
            self.blocks.iter().copied().map(Some).collect()
        };

        let mut produced = Vec::new();
        for block in blocks {
            for group in &self.groups {
                produced.extend(group.set_in_document(
                    &self.buffers,
                    sink,
                    block,
                    linked.as_ref(),
                    prefix,
                    suffix,
                    self.tail,
                ));
            }
        }

        debug!("Materialized {} datasets", produced.len());
        self.buffers.clear();
        produced
    }
}
