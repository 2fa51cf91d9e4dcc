//! Reading one column group from a line and turning its buffers into datasets

use super::descriptor::{ColumnGroup, Role};
use super::stream::Stream;
use super::values::{convert, guess_data_type, Cell};
use crate::app::models::{DataKind, Dataset, DatasetSink};
use crate::app::services::linked::LinkedFile;
use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;
use tracing::trace;

/// Identifies the buffer holding one role of one dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferKey {
    pub name: String,
    pub index: Option<i64>,
    pub block: Option<usize>,
    pub role: Role,
}

impl BufferKey {
    pub fn new(name: &str, index: Option<i64>, block: Option<usize>, role: Role) -> Self {
        Self {
            name: name.to_string(),
            index,
            block,
            role,
        }
    }

    /// Same dataset, different role
    pub fn with_role(&self, role: Role) -> Self {
        Self {
            role,
            ..self.clone()
        }
    }

    /// Name of the dataset this buffer belongs to, e.g. `z_3` or `x_2`
    pub fn dataset_name(&self) -> String {
        let mut name = self.name.clone();
        if let Some(index) = self.index {
            name.push_str(&format!("_{}", index));
        }
        if let Some(block) = self.block {
            name.push_str(&format!("_{}", block));
        }
        name
    }
}

/// Values read so far, in row order, per buffer
pub type Buffers = HashMap<BufferKey, Vec<Cell>>;

impl ColumnGroup {
    /// Member indices: the range for a family, a single `None` otherwise
    fn member_indices(&self) -> Box<dyn Iterator<Item = Option<i64>>> {
        match self.range {
            Some(range) => Box::new(range.indices().map(Some)),
            None => Box::new(std::iter::once(None)),
        }
    }

    /// Consume this group's columns from the current line of the stream
    ///
    /// Reading stops quietly when the line runs out of tokens, so a short line
    /// fills fewer members (or fewer roles of the last member).
    pub fn read_from_stream<R: BufRead>(
        &mut self,
        stream: &mut Stream<R>,
        buffers: &mut Buffers,
        block: Option<usize>,
    ) {
        for index in self.member_indices() {
            for position in 0..self.roles.len() {
                let role = self.roles[position];
                let Some(token) = stream.next_column() else {
                    return;
                };
                if role == Role::Skip {
                    continue;
                }

                let kind = match self.datatype() {
                    Some(kind) => kind,
                    None => {
                        let guessed = guess_data_type(&token);
                        trace!("Inferred type {} for '{}' from '{}'", guessed, self.name, token);
                        self.inferred = Some(guessed);
                        guessed
                    }
                };

                let (cell, failed) = convert(&token, kind);
                if failed {
                    self.error_count += 1;
                }

                buffers
                    .entry(BufferKey::new(&self.name, index, block, role))
                    .or_default()
                    .push(cell);
            }
        }
    }

    /// Build datasets from the buffers and hand them to the sink
    ///
    /// Returns the names given to the sink with their row counts. A family
    /// ends at the first member without data values.
    #[allow(clippy::too_many_arguments)]
    pub fn set_in_document(
        &self,
        buffers: &Buffers,
        sink: &mut dyn DatasetSink,
        block: Option<usize>,
        linked: Option<&Arc<LinkedFile>>,
        prefix: &str,
        suffix: &str,
        tail: Option<usize>,
    ) -> Vec<(String, usize)> {
        let Some(kind) = self.datatype() else {
            return Vec::new();
        };

        let mut produced = Vec::new();
        for index in self.member_indices() {
            let key = BufferKey::new(&self.name, index, block, Role::Data);
            let Some(data) = buffers.get(&key) else {
                break;
            };

            let errors = [Role::SymError, Role::PosError, Role::NegError]
                .map(|role| buffers.get(&key.with_role(role)));
            let min_len = errors
                .iter()
                .flatten()
                .map(|b| b.len())
                .fold(data.len(), usize::min);
            let start = match tail {
                Some(n) => min_len.saturating_sub(n),
                None => 0,
            };
            let rows = start..min_len;

            let dataset = match kind {
                DataKind::Float => {
                    let numbers = |buffer: &Vec<Cell>| -> Vec<f64> {
                        buffer[rows.clone()].iter().map(Cell::to_f64).collect()
                    };
                    let [serr, perr, nerr] = errors.map(|b| b.map(&numbers));
                    Dataset::Numeric {
                        data: numbers(data),
                        serr,
                        perr,
                        nerr,
                    }
                }
                DataKind::String => Dataset::Text {
                    data: data[rows.clone()].iter().map(Cell::to_text).collect(),
                },
                DataKind::Date => Dataset::Date {
                    data: data[rows.clone()].iter().map(Cell::to_f64).collect(),
                },
            };

            let name = format!("{}{}{}", prefix, key.dataset_name(), suffix);
            let len = dataset.len();
            sink.set_data(&name, dataset, linked.cloned());
            produced.push((name, len));
        }

        produced
    }
}
