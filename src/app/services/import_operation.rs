//! Import operations: one complete read of a source into a document
//!
//! An operation owns its reader for the duration of the call, opens the
//! source, reads it, attaches a [`LinkedFile`] when requested and hands the
//! datasets to the sink. Conversion failures are reported in the outcome
//! rather than treated as errors.

use crate::app::models::DatasetSink;
use crate::app::services::linked::LinkedFile;
use crate::app::services::matrix_reader::SimpleRead2D;
use crate::app::services::simple_read::{Descriptor, FileStream, SimpleRead, Stream};
use crate::config::{Import2DParams, ImportParams, ImportSource};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of running an import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportOutcome {
    /// Names of the datasets given to the document, in order
    pub datasets: Vec<String>,
    /// Failed numeric conversions per column group name
    pub invalid_conversions: BTreeMap<String, usize>,
    /// Rows stored per dataset
    pub rows: BTreeMap<String, usize>,
}

impl ImportOutcome {
    /// Total failed numeric conversions across all groups
    pub fn total_invalid(&self) -> usize {
        self.invalid_conversions.values().sum()
    }

    /// Groups with at least one failed conversion
    pub fn failed_groups(&self) -> impl Iterator<Item = (&str, usize)> {
        self.invalid_conversions
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, count)| (name.as_str(), *count))
    }
}

/// Descriptor-driven import of a file or string
#[derive(Debug)]
pub struct ImportOperation {
    params: ImportParams,
    reader: SimpleRead,
}

impl ImportOperation {
    /// Validate the parameters and prepare a reader for the descriptor
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for inconsistent parameters and
    /// `Error::Descriptor` when strict descriptor checking fails.
    pub fn new(params: ImportParams) -> Result<Self> {
        params.validate()?;

        let mut reader = SimpleRead::new(Descriptor::parse(&params.descriptor));
        if let Some(tail) = params.tail {
            reader = reader.with_tail(tail);
        }

        Ok(Self { params, reader })
    }

    pub fn params(&self) -> &ImportParams {
        &self.params
    }

    /// Read the source and store the datasets in the sink
    ///
    /// # Arguments
    ///
    /// * `sink` - Document receiving the datasets
    ///
    /// # Returns
    ///
    /// The dataset names, failed conversion counts and row counts
    pub fn run(&mut self, sink: &mut dyn DatasetSink) -> Result<ImportOutcome> {
        match self.params.source.clone() {
            Some(ImportSource::File(path)) => {
                info!("Importing {} with descriptor '{}'", path.display(), self.params.descriptor);
                let mut stream = FileStream::open_with_encoding(&path, &self.params.encoding)?;
                self.import(&mut stream, sink)
            }
            Some(ImportSource::Text(text)) => {
                info!("Importing {} bytes of text with descriptor '{}'", text.len(), self.params.descriptor);
                let mut stream = Stream::from_text(text);
                self.import(&mut stream, sink)
            }
            None => Err(Error::missing_source()),
        }
    }

    fn import<R: BufRead>(
        &mut self,
        stream: &mut Stream<R>,
        sink: &mut dyn DatasetSink,
    ) -> Result<ImportOutcome> {
        self.reader.clear_state();
        self.reader
            .read_data(stream, self.params.use_blocks, self.params.ignore_text)?;

        let linked = self
            .params
            .linked
            .then(|| Arc::new(LinkedFile::Simple(self.params.clone())));

        let produced = self
            .reader
            .materialize(sink, linked, &self.params.prefix, &self.params.suffix);
        let invalid_conversions = self.reader.invalid_conversions();

        let outcome = ImportOutcome {
            datasets: produced.iter().map(|(name, _)| name.clone()).collect(),
            rows: produced.into_iter().collect(),
            invalid_conversions,
        };

        for (name, count) in outcome.failed_groups() {
            warn!("{} conversions failed for dataset '{}'", count, name);
        }
        info!(
            "Imported {} datasets from {} lines",
            outcome.datasets.len(),
            stream.line_number()
        );
        Ok(outcome)
    }
}

/// Import of one or more 2D matrices from a file or string
#[derive(Debug)]
pub struct Import2DOperation {
    params: Import2DParams,
}

impl Import2DOperation {
    /// Validate the parameters
    pub fn new(params: Import2DParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &Import2DParams {
        &self.params
    }

    /// Read one matrix per dataset name, in order, from the source
    ///
    /// A matrix that cannot be read stops the import with `Error::Matrix`;
    /// matrices stored before it stay in the sink.
    pub fn run(&self, sink: &mut dyn DatasetSink) -> Result<ImportOutcome> {
        match &self.params.source {
            Some(ImportSource::File(path)) => {
                info!("Importing 2D data from {}", path.display());
                let mut stream = FileStream::open_with_encoding(path, &self.params.encoding)?;
                self.import(&mut stream, sink)
            }
            Some(ImportSource::Text(text)) => {
                let mut stream = Stream::from_text(text.as_str());
                self.import(&mut stream, sink)
            }
            None => Err(Error::missing_source()),
        }
    }

    fn import<R: BufRead>(
        &self,
        stream: &mut Stream<R>,
        sink: &mut dyn DatasetSink,
    ) -> Result<ImportOutcome> {
        let linked = self
            .params
            .linked
            .then(|| Arc::new(LinkedFile::TwoD(self.params.clone())));

        let mut outcome = ImportOutcome::default();
        for name in &self.params.dataset_names {
            let mut reader = SimpleRead2D::new(name, &self.params);
            reader.read_data(stream)?;
            let rows = reader.data().map_or(0, <[_]>::len);
            for stored in reader.set_in_document(sink, linked.clone())? {
                outcome.rows.insert(stored.clone(), rows);
                outcome.datasets.push(stored);
            }
        }

        info!("Imported {} matrices", outcome.datasets.len());
        Ok(outcome)
    }
}
