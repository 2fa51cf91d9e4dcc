//! Descriptor-driven reading of column data
//!
//! Text is split into tokens by a [`Stream`], a [`Descriptor`] says which
//! dataset each column belongs to, and [`SimpleRead`] drives the read and
//! hands the finished datasets to a [`DatasetSink`](crate::DatasetSink).
//!
//! # Example
//!
//! ```
//! use simpleread::{Document, SimpleRead, Stream};
//!
//! let mut stream = Stream::from_text("1 0.1\n2 0.2\n");
//! let mut reader = SimpleRead::from_descriptor("x+-");
//! reader.read_data(&mut stream, false, false)?;
//!
//! let mut doc = Document::new();
//! let names = reader.set_in_document(&mut doc, None, "", "");
//! assert_eq!(names, vec!["x"]);
//! # Ok::<(), simpleread::Error>(())
//! ```

pub mod column_group;
pub mod descriptor;
pub mod reader;
pub mod stream;
pub mod values;

pub use column_group::{BufferKey, Buffers};
pub use descriptor::{ColumnGroup, Descriptor, IndexRange, Role};
pub use reader::SimpleRead;
pub use stream::{resolve_encoding, split_line, FileStream, Stream};
pub use values::{guess_data_type, Cell};

#[cfg(test)]
pub mod tests;
