//! Column descriptor parsing
//!
//! A descriptor lists the datasets found in each line of the data, in column
//! order. Each dataset name may be followed by a type tag, error bar markers
//! and an index range:
//!
//! ```text
//! x+- y+,- z+-[1:5]
//! x(text) y(date) z(number),+-
//! `name with spaces`+-
//! ```
//!
//! - `+-` reads a symmetric error column, `+` and `-` read positive and
//!   negative error columns in the order given
//! - `(text)`, `(date)` or `(number)` fixes the type instead of inferring it
//! - `z+-[1:5]` reads `z_1`, `z_2`, ... `z_5`, each with its own error column;
//!   either bound may be omitted (`[:]`, `[2:]`, `[:5]`)
//! - a comma standing on its own (at the start, after another comma or after
//!   a space) skips a column; commas attached to a name or marker are ignored

use crate::app::models::DataKind;
use crate::constants::{DEFAULT_RANGE_START, UNBOUNDED_RANGE_STOP};
use crate::{Error, Result};
use regex::Regex;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use tracing::debug;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`[^`]*`|[ ,]|\([a-z]+?\)|\+-|\+|-|\[.*?\]").expect("token pattern is valid")
});

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(-?[0-9]+)?:(-?[0-9]+)?\]$").expect("range pattern is valid")
});

/// Meaning of one column within a column group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The data value itself
    Data,
    /// Symmetric error (`+-`)
    SymError,
    /// Positive error (`+`)
    PosError,
    /// Negative error (`-`)
    NegError,
    /// A column that is read and discarded (`,`)
    Skip,
}

impl Role {
    /// Role for an error bar marker
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "+-" => Some(Role::SymError),
            "+" => Some(Role::PosError),
            "-" => Some(Role::NegError),
            _ => None,
        }
    }

    /// Descriptor text for this role
    pub fn marker(&self) -> &'static str {
        match self {
            Role::Data => "D",
            Role::SymError => "+-",
            Role::PosError => "+",
            Role::NegError => "-",
            Role::Skip => ",",
        }
    }
}

/// Inclusive range of indices for a dataset family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: i64,
    pub stop: i64,
}

impl IndexRange {
    pub fn new(start: i64, stop: i64) -> Self {
        Self { start, stop }
    }

    /// Parse `[a:b]`, `[a:]`, `[:b]` or `[:]`
    pub fn parse(token: &str) -> Option<Self> {
        let caps = RANGE_RE.captures(token)?;
        let bound = |i: usize, default: i64| -> Option<i64> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(default),
            }
        };
        Some(Self {
            start: bound(1, DEFAULT_RANGE_START)?,
            stop: bound(2, UNBOUNDED_RANGE_STOP)?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.stop == UNBOUNDED_RANGE_STOP
    }

    pub fn indices(&self) -> RangeInclusive<i64> {
        self.start..=self.stop
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            write!(f, "[{}:]", self.start)
        } else {
            write!(f, "[{}:{}]", self.start, self.stop)
        }
    }
}

/// One dataset (or family of datasets) described by the descriptor
///
/// The declared type comes from a type tag; otherwise the type is inferred
/// from the first value read and then kept for the rest of the read.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGroup {
    pub name: String,
    pub declared: Option<DataKind>,
    pub roles: Vec<Role>,
    pub range: Option<IndexRange>,
    pub(crate) inferred: Option<DataKind>,
    pub(crate) error_count: usize,
}

impl ColumnGroup {
    pub fn new(
        name: impl Into<String>,
        declared: Option<DataKind>,
        roles: Vec<Role>,
        range: Option<IndexRange>,
    ) -> Self {
        Self {
            name: name.into(),
            declared,
            roles,
            range,
            inferred: None,
            error_count: 0,
        }
    }

    /// A single untyped data column
    pub fn single(name: impl Into<String>) -> Self {
        Self::new(name, None, vec![Role::Data], None)
    }

    /// Declared type, or the type inferred while reading
    pub fn datatype(&self) -> Option<DataKind> {
        self.declared.or(self.inferred)
    }

    /// Number of values that failed numeric conversion
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Whether the group reads a family of indexed datasets
    pub fn is_ranged(&self) -> bool {
        self.range.is_some()
    }

    /// Same descriptor content, ignoring state accumulated while reading
    pub fn same_layout(&self, other: &ColumnGroup) -> bool {
        self.name == other.name
            && self.declared == other.declared
            && self.roles == other.roles
            && self.range == other.range
    }

    /// Forget the inferred type and conversion errors
    pub fn reset(&mut self) {
        self.inferred = None;
        self.error_count = 0;
    }
}

impl fmt::Display for ColumnGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seen_data = false;
        let mut previous = None;
        for role in &self.roles {
            if previous == Some(Role::PosError) && *role == Role::NegError {
                f.write_str(",")?;
            }
            previous = Some(*role);
            match role {
                Role::Data => {
                    seen_data = true;
                    f.write_str(&quote_name(&self.name))?;
                    if let Some(kind) = self.declared {
                        write!(f, "({})", kind.type_tag())?;
                    }
                    if let Some(range) = &self.range {
                        write!(f, "{}", range)?;
                    }
                }
                Role::Skip if seen_data => f.write_str(" ,")?,
                Role::Skip => f.write_str(",")?,
                other => f.write_str(other.marker())?,
            }
        }
        Ok(())
    }
}

fn quote_name(name: &str) -> String {
    let plain = !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || ",()+-[]`".contains(c));
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name)
    }
}

/// Parsed descriptor: the column groups in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    groups: Vec<ColumnGroup>,
}

impl Descriptor {
    /// Parse leniently: malformed tags and ranges are taken as dataset names
    pub fn parse(descriptor: &str) -> Self {
        let groups = parse_groups(descriptor, false).unwrap_or_default();
        debug!(
            "Parsed descriptor '{}' into {} column groups",
            descriptor.trim(),
            groups.len()
        );
        Self { groups }
    }

    /// Parse, rejecting unknown type tags, malformed or inverted ranges and
    /// error markers that have no dataset name
    pub fn parse_strict(descriptor: &str) -> Result<Self> {
        let groups = parse_groups(descriptor, true)?;
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<ColumnGroup> {
        self.groups
    }

    /// An empty descriptor asks for automatically named columns
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Same descriptor content, ignoring state accumulated while reading
    pub fn same_layout(&self, other: &Descriptor) -> bool {
        self.groups.len() == other.groups.len()
            && self
                .groups
                .iter()
                .zip(&other.groups)
                .all(|(a, b)| a.same_layout(b))
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", group)?;
        }
        Ok(())
    }
}

/// Split a descriptor into delimiter tokens and the text between them
fn split_tokens(descriptor: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in TOKEN_RE.find_iter(descriptor) {
        if m.start() > last {
            tokens.push(&descriptor[last..m.start()]);
        }
        tokens.push(m.as_str());
        last = m.end();
    }
    if last < descriptor.len() {
        tokens.push(&descriptor[last..]);
    }
    tokens
}

fn parse_groups(descriptor: &str, strict: bool) -> Result<Vec<ColumnGroup>> {
    let descriptor = descriptor.trim();
    let tokens = split_tokens(descriptor);
    let reject = |message: String| -> Result<Vec<ColumnGroup>> {
        Err(Error::descriptor(descriptor, message))
    };

    let mut groups = Vec::new();
    let mut name: Option<String> = None;
    let mut declared = None;
    let mut range = None;
    let mut roles = Vec::new();

    for (i, &token) in tokens.iter().enumerate() {
        if token == " " {
            continue;
        }

        if token == "," {
            if i == 0 || matches!(tokens[i - 1], "," | " ") {
                roles.push(Role::Skip);
            }
            continue;
        }

        if token.starts_with('(') && token.ends_with(')') {
            if let Some(kind) = DataKind::from_type_tag(&token[1..token.len() - 1]) {
                declared = Some(kind);
                continue;
            }
            if strict {
                return reject(format!("unknown type tag {}", token));
            }
        }

        if let Some(role) = Role::from_marker(token) {
            if strict && name.is_none() {
                return reject(format!("error marker '{}' before any dataset name", token));
            }
            roles.push(role);
            continue;
        }

        if let Some(parsed) = IndexRange::parse(token) {
            if strict && parsed.start > parsed.stop {
                return reject(format!("index range {} starts after it stops", token));
            }
            range = Some(parsed);
            continue;
        }

        if strict && token.starts_with('[') && token.ends_with(']') {
            return reject(format!("malformed index range {}", token));
        }

        let token = if token.len() >= 2 && token.starts_with('`') && token.ends_with('`') {
            &token[1..token.len() - 1]
        } else {
            token
        };
        if strict && token.is_empty() {
            return reject("empty dataset name".to_string());
        }

        if let Some(previous) = name.take() {
            groups.push(ColumnGroup::new(
                previous,
                declared.take(),
                std::mem::take(&mut roles),
                range.take(),
            ));
        }
        roles.push(Role::Data);
        name = Some(token.to_string());
    }

    if let Some(last) = name {
        groups.push(ColumnGroup::new(last, declared, roles, range));
    } else if strict && roles.iter().any(|r| *r != Role::Skip) {
        return reject("no dataset name given".to_string());
    }

    Ok(groups)
}
