//! 2D matrix reading
//!
//! A matrix is written one row per line, highest y first. Before the rows a
//! few setting lines may appear:
//!
//! ```text
//! xrange 0 10
//! yrange -1 1
//! invertrows
//! invertcols
//! transpose
//! ```
//!
//! A blank line after the rows ends the matrix, so several matrices can
//! follow each other in one stream.

use crate::app::models::{Dataset, DatasetSink};
use crate::app::services::linked::LinkedFile;
use crate::app::services::simple_read::values::parse_float;
use crate::app::services::simple_read::Stream;
use crate::config::Import2DParams;
use crate::{Error, Result};
use std::io::BufRead;
use std::sync::Arc;
use tracing::{debug, trace};

/// Reads one named matrix from a stream
#[derive(Debug, Clone)]
pub struct SimpleRead2D {
    name: String,
    params: Import2DParams,
    data: Option<Vec<Vec<f64>>>,
}

impl SimpleRead2D {
    /// Create a reader for `name`; settings found in the stream override a
    /// copy of `params`
    pub fn new(name: impl Into<String>, params: &Import2DParams) -> Self {
        Self {
            name: name.into(),
            params: params.clone(),
            data: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in effect after reading, including settings from the stream
    pub fn params(&self) -> &Import2DParams {
        &self.params
    }

    /// Rows read, lowest y first
    pub fn data(&self) -> Option<&[Vec<f64>]> {
        self.data.as_deref()
    }

    /// Read settings and rows up to the blank line that ends the matrix
    pub fn read_data<R: BufRead>(&mut self, stream: &mut Stream<R>) -> Result<()> {
        let mut rows: Vec<Vec<f64>> = Vec::new();

        while stream.new_line()? {
            let columns = stream.all_columns();
            match columns.first() {
                None if !rows.is_empty() => break,
                None => continue,
                Some(first) => {
                    let setting = first.to_lowercase();
                    if self.apply_setting(&setting, columns)? {
                        stream.flush_line();
                        continue;
                    }
                }
            }

            let mut line = Vec::with_capacity(stream.all_columns().len());
            while let Some(token) = stream.next_column() {
                let value = parse_float(&token).ok_or_else(|| {
                    Error::matrix(&self.name, format!("could not interpret number '{}'", token))
                })?;
                line.push(value);
            }

            if self.params.invert_cols {
                line.reverse();
            }
            rows.insert(0, line);
        }

        if self.params.invert_rows {
            rows.reverse();
        }

        if rows.is_empty() {
            return Err(Error::matrix(&self.name, "no data could be imported"));
        }

        let width = rows[0].len();
        if let Some(ragged) = rows.iter().position(|row| row.len() != width) {
            return Err(Error::matrix(
                &self.name,
                format!(
                    "rows have different lengths ({} and {} values)",
                    width,
                    rows[ragged].len()
                ),
            ));
        }

        if self.params.transpose {
            rows = transpose(&rows, width);
        }

        debug!(
            "Read {}x{} matrix for '{}'",
            rows.len(),
            rows.first().map_or(0, Vec::len),
            self.name
        );
        self.data = Some(rows);
        Ok(())
    }

    /// Returns true if the line was a setting line
    fn apply_setting(&mut self, setting: &str, columns: &[String]) -> Result<bool> {
        match setting {
            "xrange" => self.params.xrange = Some(self.parse_range(setting, columns)?),
            "yrange" => self.params.yrange = Some(self.parse_range(setting, columns)?),
            "invertrows" => self.params.invert_rows = true,
            "invertcols" => self.params.invert_cols = true,
            "transpose" => self.params.transpose = true,
            _ => return Ok(false),
        }
        trace!("Applied setting '{}' for '{}'", setting, self.name);
        Ok(true)
    }

    fn parse_range(&self, setting: &str, columns: &[String]) -> Result<(f64, f64)> {
        let bound = |i: usize| columns.get(i).and_then(|t| parse_float(t));
        match (bound(1), bound(2)) {
            (Some(min), Some(max)) => Ok((min, max)),
            _ => Err(Error::matrix(
                &self.name,
                format!("could not interpret {}", setting),
            )),
        }
    }

    /// Hand the matrix to the sink under `prefix + name + suffix`
    pub fn set_in_document(
        &mut self,
        sink: &mut dyn DatasetSink,
        linked: Option<Arc<LinkedFile>>,
    ) -> Result<Vec<String>> {
        let data = self
            .data
            .take()
            .ok_or_else(|| Error::matrix(&self.name, "no data has been read"))?;

        let dataset = Dataset::TwoD {
            data,
            xrange: self.params.xrange,
            yrange: self.params.yrange,
        };
        let name = format!("{}{}{}", self.params.prefix, self.name, self.params.suffix);
        sink.set_data(&name, dataset, linked);
        Ok(vec![name])
    }
}

fn transpose(rows: &[Vec<f64>], width: usize) -> Vec<Vec<f64>> {
    (0..width)
        .map(|col| rows.iter().map(|row| row[col]).collect())
        .collect()
}
