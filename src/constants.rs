//! Application constants for simpleread
//!
//! This module contains the marker characters, sentinels and default values
//! shared by the stream tokenizer, the descriptor parser and the readers.

// =============================================================================
// Stream Tokenization
// =============================================================================

/// Characters that start a comment running to the end of the physical line
pub const COMMENT_CHARS: &[char] = &['#', '!', '%', ';'];

/// Token that introduces an in-stream descriptor change
pub const DESCRIPTOR_DIRECTIVE: &str = "descriptor";

/// Trailing token marking a continued logical line
pub const LINE_CONTINUATION: &str = "\\";

/// Token (compared case-insensitively) separating blocks in block mode
pub const BLOCK_SEPARATOR: &str = "no";

/// Encoding assumed for files unless the import names another
pub const DEFAULT_ENCODING: &str = "utf_8";

// =============================================================================
// Descriptor Defaults
// =============================================================================

/// First index of a ranged dataset family when the range omits it
pub const DEFAULT_RANGE_START: i64 = 1;

/// Upper index used when a range omits its stop value (read until data runs out)
pub const UNBOUNDED_RANGE_STOP: i64 = 999_999_999;

/// Prefix used for automatically named columns when none is given
pub const AUTO_COLUMN_PREFIX: &str = "col";

/// Words accepted as numeric values besides ordinary float literals
pub const SPECIAL_FLOAT_WORDS: &[&str] = &["inf", "+inf", "-inf", "nan"];

/// Words that never count as a text annotation line
pub const NUMERIC_LINE_WORDS: &[&str] = &["inf", "nan"];

// =============================================================================
// Dates
// =============================================================================

/// Dates are stored as seconds relative to this instant (UTC)
pub const DATE_EPOCH: &str = "2009-01-01T00:00:00";

/// Format used when rendering date values back to text
pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
