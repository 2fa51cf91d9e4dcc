//! Files linked to the datasets read from them
//!
//! A linked file keeps the parameters of the import that produced a set of
//! datasets, so a document can read the file again later or save the command
//! that recreates the link.

use crate::app::models::DatasetSink;
use crate::app::services::import_operation::{Import2DOperation, ImportOperation, ImportOutcome};
use crate::config::{Import2DParams, ImportParams};
use crate::constants::DEFAULT_ENCODING;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Import parameters remembered alongside linked datasets
#[derive(Debug, Clone, PartialEq)]
pub enum LinkedFile {
    /// Descriptor-driven import
    Simple(ImportParams),
    /// 2D matrix import
    TwoD(Import2DParams),
}

impl LinkedFile {
    /// The file the datasets were read from
    pub fn path(&self) -> Option<&Path> {
        let source = match self {
            LinkedFile::Simple(params) => params.source.as_ref(),
            LinkedFile::TwoD(params) => params.source.as_ref(),
        };
        source.and_then(|s| s.path())
    }

    /// Read the file again into the sink, replacing the linked datasets
    pub fn reload(&self, sink: &mut dyn DatasetSink) -> Result<ImportOutcome> {
        let path = self.path().ok_or_else(Error::missing_source)?;
        info!("Reloading linked file {}", path.display());
        match self {
            LinkedFile::Simple(params) => ImportOperation::new(params.clone())?.run(sink),
            LinkedFile::TwoD(params) => Import2DOperation::new(params.clone())?.run(sink),
        }
    }

    /// Command that recreates this link when a document is loaded
    ///
    /// With `relative_to`, a file below that directory is written relative to it.
    pub fn save_command(&self, relative_to: Option<&Path>) -> String {
        let filename = self.save_filename(relative_to);
        match self {
            LinkedFile::Simple(params) => {
                let mut args = vec![
                    py_str(&filename),
                    py_str(&params.descriptor),
                    "linked=True".to_string(),
                    format!("ignoretext={}", py_bool(params.ignore_text)),
                ];
                if params.encoding != DEFAULT_ENCODING {
                    args.push(format!("encoding={}", py_str(&params.encoding)));
                }
                if params.use_blocks {
                    args.push("useblocks=True".to_string());
                }
                if !params.prefix.is_empty() {
                    args.push(format!("prefix={}", py_str(&params.prefix)));
                }
                if !params.suffix.is_empty() {
                    args.push(format!("suffix={}", py_str(&params.suffix)));
                }
                format!("ImportFile({})", args.join(", "))
            }
            LinkedFile::TwoD(params) => {
                let names: Vec<String> = params.dataset_names.iter().map(|n| py_str(n)).collect();
                let mut args = vec![py_str(&filename), format!("[{}]", names.join(", "))];
                for (key, range) in [("xrange", params.xrange), ("yrange", params.yrange)] {
                    if let Some((min, max)) = range {
                        args.push(format!("{}=({:?}, {:?})", key, min, max));
                    }
                }
                for (key, flag) in [
                    ("invertrows", params.invert_rows),
                    ("invertcols", params.invert_cols),
                    ("transpose", params.transpose),
                ] {
                    if flag {
                        args.push(format!("{}=True", key));
                    }
                }
                if !params.prefix.is_empty() {
                    args.push(format!("prefix={}", py_str(&params.prefix)));
                }
                if !params.suffix.is_empty() {
                    args.push(format!("suffix={}", py_str(&params.suffix)));
                }
                if params.encoding != DEFAULT_ENCODING {
                    args.push(format!("encoding={}", py_str(&params.encoding)));
                }
                args.push("linked=True".to_string());
                format!("ImportFile2D({})", args.join(", "))
            }
        }
    }

    fn save_filename(&self, relative_to: Option<&Path>) -> String {
        let path = self.path().map(Path::to_path_buf).unwrap_or_default();
        let path = match relative_to {
            Some(base) => path
                .strip_prefix(base)
                .map(PathBuf::from)
                .unwrap_or(path),
            None => path,
        };
        path.to_string_lossy().into_owned()
    }
}

fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Quote a string the way the document command language reads it back
fn py_str(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_py_str_quoting() {
        assert_eq!(py_str("x y"), "'x y'");
        assert_eq!(py_str("it's"), "\"it's\"");
        assert_eq!(py_str("a'b\"c"), "'a\\'b\"c'");
        assert_eq!(py_str("back\\slash"), "'back\\\\slash'");
    }

    #[test]
    fn test_simple_save_command() {
        let link = LinkedFile::Simple(
            ImportParams::from_file("/data/run1/values.dat", "x+- y")
                .with_blocks()
                .with_prefix("r1_")
                .with_linked(),
        );
        assert_eq!(
            link.save_command(None),
            "ImportFile('/data/run1/values.dat', 'x+- y', linked=True, ignoretext=False, useblocks=True, prefix='r1_')"
        );
        assert_eq!(
            link.save_command(Some(Path::new("/data"))),
            "ImportFile('run1/values.dat', 'x+- y', linked=True, ignoretext=False, useblocks=True, prefix='r1_')"
        );
    }

    #[test]
    fn test_save_command_names_non_default_encoding() {
        let link = LinkedFile::Simple(
            ImportParams::from_file("old.dat", "x").with_encoding("latin_1").with_linked(),
        );
        assert_eq!(
            link.save_command(None),
            "ImportFile('old.dat', 'x', linked=True, ignoretext=False, encoding='latin_1')"
        );

        let link = LinkedFile::TwoD(
            Import2DParams::from_file("m.dat", vec!["a".to_string()])
                .with_encoding("cp1252")
                .with_linked(),
        );
        assert_eq!(
            link.save_command(None),
            "ImportFile2D('m.dat', ['a'], encoding='cp1252', linked=True)"
        );
    }

    #[test]
    fn test_2d_save_command() {
        let link = LinkedFile::TwoD(
            Import2DParams::from_file("m.dat", vec!["a".to_string(), "b".to_string()])
                .with_xrange(0.0, 1.5)
                .with_transpose()
                .with_linked(),
        );
        assert_eq!(
            link.save_command(Some(Path::new("/elsewhere"))),
            "ImportFile2D('m.dat', ['a', 'b'], xrange=(0.0, 1.5), transpose=True, linked=True)"
        );
    }
}
