//! Type inference and value conversion for data tokens

use crate::app::dates::{date_string_to_date, is_date_time};
use crate::app::models::DataKind;
use crate::constants::SPECIAL_FLOAT_WORDS;
use regex::Regex;
use std::sync::LazyLock;

static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:u?""|u?".*?[^\\]"|u?''|u?'.*?[^\\]')$"#).expect("string pattern is valid")
});

/// A converted value held in a read buffer
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Numeric value; dates are stored as seconds from the epoch
    Number(f64),
    Text(String),
}

impl Cell {
    /// Numeric view of the cell, NaN for text that is not a number
    pub fn to_f64(&self) -> f64 {
        match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => parse_float(s).unwrap_or(f64::NAN),
        }
    }

    /// Text view of the cell
    pub fn to_text(&self) -> String {
        match self {
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

/// Parse a float literal, including `inf` and `nan` spellings
pub fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}

/// Whether the token is a well-formed quoted string literal
pub fn is_quoted_string(token: &str) -> bool {
    QUOTED_RE.is_match(token)
}

/// Guess the kind of data from a sample token
///
/// Numbers win, then quoted strings, then dates; anything else is text.
pub fn guess_data_type(token: &str) -> DataKind {
    if parse_float(token).is_some() || SPECIAL_FLOAT_WORDS.contains(&token.to_lowercase().as_str())
    {
        DataKind::Float
    } else if is_quoted_string(token) {
        DataKind::String
    } else if is_date_time(token) {
        DataKind::Date
    } else {
        DataKind::String
    }
}

/// Convert a token to a cell of the given kind
///
/// Returns the cell and whether a numeric conversion failed.
pub fn convert(token: &str, kind: DataKind) -> (Cell, bool) {
    match kind {
        DataKind::Float => match parse_float(token) {
            Some(v) => (Cell::Number(v), false),
            None => (Cell::Number(f64::NAN), true),
        },
        DataKind::String => (Cell::Text(convert_string(token)), false),
        DataKind::Date => (Cell::Number(date_string_to_date(token)), false),
    }
}

/// Strip quotes from a quoted literal, decoding escapes; other text is kept as is
pub fn convert_string(token: &str) -> String {
    if is_quoted_string(token) {
        if let Some(text) = unescape_literal(token) {
            return text;
        }
    }
    token.to_string()
}

/// Decode a quoted string literal such as `"a\tb"` or `u'caf\u00e9'`
///
/// Only quotes and backslash escapes are interpreted. Returns `None` if the
/// literal contains an unescaped closing quote before its end.
pub fn unescape_literal(token: &str) -> Option<String> {
    let body = token.strip_prefix('u').unwrap_or(token);
    let quote = body.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if body.len() < 2 || !body.ends_with(quote) {
        return None;
    }
    let inner = &body[1..body.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == quote {
            return None;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'x' => out.push(hex_escape(&mut chars, 2)?),
            'u' => out.push(hex_escape(&mut chars, 4)?),
            'U' => out.push(hex_escape(&mut chars, 8)?),
            d @ '0'..='7' => {
                let mut value = d.to_digit(8)?;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value)?);
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Some(out)
}

fn hex_escape(chars: &mut impl Iterator<Item = char>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_numbers() {
        assert_eq!(guess_data_type("1"), DataKind::Float);
        assert_eq!(guess_data_type("-1.5e-3"), DataKind::Float);
        assert_eq!(guess_data_type(".5"), DataKind::Float);
        assert_eq!(guess_data_type("inf"), DataKind::Float);
        assert_eq!(guess_data_type("-INF"), DataKind::Float);
        assert_eq!(guess_data_type("NaN"), DataKind::Float);
    }

    #[test]
    fn test_guess_strings_and_dates() {
        assert_eq!(guess_data_type("\"hello\""), DataKind::String);
        assert_eq!(guess_data_type("''"), DataKind::String);
        assert_eq!(guess_data_type("2020-05-01"), DataKind::Date);
        assert_eq!(guess_data_type("2020-05-01T12:00:00"), DataKind::Date);
        assert_eq!(guess_data_type("hello"), DataKind::String);
    }

    #[test]
    fn test_convert_float_failure_is_nan() {
        let (cell, failed) = convert("abc", DataKind::Float);
        assert!(failed);
        assert!(cell.to_f64().is_nan());

        let (cell, failed) = convert("2.5", DataKind::Float);
        assert!(!failed);
        assert_eq!(cell, Cell::Number(2.5));
    }

    #[test]
    fn test_convert_string_unquotes() {
        assert_eq!(convert_string("\"a b\""), "a b");
        assert_eq!(convert_string("'it\\'s'"), "it's");
        assert_eq!(convert_string("u\"caf\\u00e9\""), "café");
        assert_eq!(convert_string("\"tab\\there\""), "tab\there");
        assert_eq!(convert_string("plain"), "plain");
    }

    #[test]
    fn test_unescape_rejects_inner_quote() {
        assert_eq!(unescape_literal("\"a\"b\""), None);
        assert_eq!(convert_string("\"a\"b\""), "\"a\"b\"");
    }

    #[test]
    fn test_unescape_octal_and_unknown() {
        assert_eq!(unescape_literal("\"\\101\"").as_deref(), Some("A"));
        assert_eq!(unescape_literal("\"\\q\"").as_deref(), Some("\\q"));
    }
}
