//! Line tokenizer feeding the readers
//!
//! A [`Stream`] pulls physical lines from any [`BufRead`] source, splits them
//! into tokens and joins continued lines, handing out one logical line of
//! tokens at a time.

use crate::constants::{COMMENT_CHARS, DEFAULT_ENCODING, DESCRIPTOR_DIRECTIVE, LINE_CONTINUATION};
use crate::{Error, Result};
use encoding_rs::Encoding;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use tracing::{debug, trace};

/// Token stream over a line-oriented text source
#[derive(Debug)]
pub struct Stream<R> {
    source: R,
    buffer: String,
    line_number: usize,
    tokens: Vec<String>,
    position: usize,
}

impl Stream<Cursor<String>> {
    /// Create a stream reading from in-memory text
    pub fn from_text(text: impl Into<String>) -> Self {
        Stream::new(Cursor::new(text.into()))
    }
}

/// Stream over a file decoded to UTF-8 as it is read
pub type FileStream = Stream<BufReader<DecodeReaderBytes<File, Vec<u8>>>>;

impl FileStream {
    /// Open a UTF-8 file and create a stream reading from it
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_encoding(path, DEFAULT_ENCODING)
    }

    /// Open a file in the named encoding and create a stream reading from it
    ///
    /// Bytes that are invalid in the encoding become U+FFFD instead of
    /// failing the read. A byte order mark overrides the named encoding.
    pub fn open_with_encoding(path: &Path, encoding: &str) -> Result<Self> {
        let encoding = resolve_encoding(encoding)?;
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }
        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
        let decoder = DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding))
            .build(file);
        debug!("Opened {} stream for {}", encoding.name(), path.display());
        Ok(Stream::new(BufReader::new(decoder)))
    }
}

/// Look up an encoding by name
///
/// Accepts WHATWG labels (`utf-8`, `windows-1252`) as well as the underscore
/// spellings saved in documents (`utf_8`, `latin_1`, `iso8859_15`).
pub fn resolve_encoding(name: &str) -> Result<&'static Encoding> {
    let name = name.trim();
    [name.to_string(), name.replace('_', "-"), name.replace('_', "")]
        .iter()
        .find_map(|label| Encoding::for_label(label.as_bytes()))
        .ok_or_else(|| Error::configuration(format!("unknown encoding '{}'", name)))
}

impl<R: BufRead> Stream<R> {
    /// Create a stream over a buffered source
    pub fn new(source: R) -> Self {
        Self {
            source,
            buffer: String::new(),
            line_number: 0,
            tokens: Vec::new(),
            position: 0,
        }
    }

    /// Number of physical lines read so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Advance to the next logical line
    ///
    /// Returns `Ok(false)` once the source is exhausted. A line whose last
    /// token is a lone backslash continues onto the next physical line.
    pub fn new_line(&mut self) -> Result<bool> {
        self.tokens.clear();
        self.position = 0;

        loop {
            if !self.read_physical_line()? {
                // a dangling continuation still yields what was gathered
                return Ok(!self.tokens.is_empty());
            }

            self.tokens.extend(split_line(&self.buffer));

            if self.tokens.last().map(String::as_str) == Some(LINE_CONTINUATION) {
                self.tokens.pop();
                trace!("Line {} continues", self.line_number);
            } else {
                return Ok(true);
            }
        }
    }

    /// Take the next unread token of the current line
    pub fn next_column(&mut self) -> Option<String> {
        let token = self.tokens.get(self.position)?.clone();
        self.position += 1;
        Some(token)
    }

    /// Tokens remaining on the current line, without consuming them
    pub fn all_columns(&self) -> &[String] {
        &self.tokens[self.position..]
    }

    /// Forget the rest of the current line
    pub fn flush_line(&mut self) {
        self.position = self.tokens.len();
    }

    fn read_physical_line(&mut self) -> Result<bool> {
        self.buffer.clear();
        let read = self
            .source
            .read_line(&mut self.buffer)
            .map_err(|e| Error::io(format!("Failed to read line {}", self.line_number + 1), e))?;
        if read == 0 {
            return Ok(false);
        }

        self.line_number += 1;
        if self.buffer.ends_with('\n') {
            self.buffer.pop();
            if self.buffer.ends_with('\r') {
                self.buffer.pop();
            }
        }
        Ok(true)
    }
}

/// Split one physical line into tokens
///
/// Backtick-quoted names, quoted strings (optionally `u`-prefixed) and plain
/// runs of non-space characters each form one token. A comment character ends
/// the line unless it is immediately followed by `descriptor`, in which case
/// only the comment character is dropped.
pub fn split_line(line: &str) -> Vec<String> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let byte = bytes[pos];
        if is_space(byte) {
            pos += 1;
            continue;
        }

        if is_comment(byte) {
            if line[pos + 1..].starts_with(DESCRIPTOR_DIRECTIVE) {
                pos += 1;
                continue;
            }
            break;
        }

        let end = backtick_end(bytes, pos)
            .or_else(|| quoted_end(bytes, pos))
            .unwrap_or_else(|| plain_end(bytes, pos));
        tokens.push(line[pos..end].to_string());
        pos = end;
    }

    tokens
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_comment(byte: u8) -> bool {
    COMMENT_CHARS.contains(&(byte as char))
}

fn is_separator(byte: u8) -> bool {
    is_space(byte) || is_comment(byte)
}

/// `` `name` `` with at least one character inside, plus any attached suffix
fn backtick_end(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes[start] != b'`' {
        return None;
    }
    let close = (start + 2..bytes.len()).find(|&i| bytes[i] == b'`')?;
    Some(plain_end(bytes, close + 1))
}

/// `"..."` or `'...'`, optionally `u`-prefixed, ending at an unescaped quote
fn quoted_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut open = start;
    if bytes[open] == b'u' {
        open += 1;
    }
    let quote = *bytes.get(open)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    if bytes.get(open + 1) == Some(&quote) {
        return Some(open + 2);
    }

    (open + 1..bytes.len().saturating_sub(1))
        .find(|&i| bytes[i] != b'\\' && bytes[i + 1] == quote)
        .map(|i| i + 2)
}

fn plain_end(bytes: &[u8], start: usize) -> usize {
    (start..bytes.len())
        .find(|&i| is_separator(bytes[i]))
        .unwrap_or(bytes.len())
}
