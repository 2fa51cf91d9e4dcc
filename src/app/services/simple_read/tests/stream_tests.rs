//! Tests for line tokenizing and continuation

use super::*;
use crate::app::services::simple_read::split_line;
use crate::Error;
use std::io::Write;

fn all_lines(text: &str) -> Vec<Vec<String>> {
    let mut stream = Stream::from_text(text);
    let mut lines = Vec::new();
    while stream.new_line().unwrap() {
        lines.push(stream.all_columns().to_vec());
    }
    lines
}

#[test]
fn test_split_whitespace() {
    assert_eq!(split_line("1  2\t3"), vec!["1", "2", "3"]);
    assert!(split_line("   ").is_empty());
}

#[test]
fn test_comments_end_line() {
    assert_eq!(split_line("1 2 # three"), vec!["1", "2"]);
    assert_eq!(split_line("1 2;3"), vec!["1", "2"]);
    assert!(split_line("! comment").is_empty());
    assert!(split_line("% comment").is_empty());
}

#[test]
fn test_comment_descriptor_directive() {
    assert_eq!(split_line("#descriptor x y"), vec!["descriptor", "x", "y"]);
    assert_eq!(split_line("descriptor x y"), vec!["descriptor", "x", "y"]);
    assert!(split_line("# descriptor x y").is_empty());
}

#[test]
fn test_quoted_tokens() {
    assert_eq!(
        split_line(r#""a b" 'c # d' 1"#),
        vec![r#""a b""#, "'c # d'", "1"]
    );
    assert_eq!(split_line(r#"u"x y" 2"#), vec![r#"u"x y""#, "2"]);
    assert_eq!(split_line(r#""say \"hi\"" 3"#), vec![r#""say \"hi\"""#, "3"]);
}

#[test]
fn test_backtick_tokens() {
    assert_eq!(split_line("`my name`+- y"), vec!["`my name`+-", "y"]);
}

#[test]
fn test_line_continuation() {
    let lines = all_lines("1 2 \\\n3 4\n5\n");
    assert_eq!(lines, vec![vec!["1", "2", "3", "4"], vec!["5"]]);
}

#[test]
fn test_dangling_continuation_at_end() {
    let lines = all_lines("1 2 \\\n");
    assert_eq!(lines, vec![vec!["1", "2"]]);
}

#[test]
fn test_blank_lines_are_empty() {
    let lines = all_lines("1\n\n2\r\n");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].is_empty());
    assert_eq!(lines[2], vec!["2"]);
}

#[test]
fn test_next_column_and_flush() {
    let mut stream = Stream::from_text("a b c\nd\n");
    assert!(stream.new_line().unwrap());
    assert_eq!(stream.next_column().as_deref(), Some("a"));
    assert_eq!(stream.all_columns(), &["b".to_string(), "c".to_string()]);
    stream.flush_line();
    assert_eq!(stream.next_column(), None);

    assert!(stream.new_line().unwrap());
    assert_eq!(stream.line_number(), 2);
    assert_eq!(stream.next_column().as_deref(), Some("d"));
    assert!(!stream.new_line().unwrap());
}

#[test]
fn test_open_file() {
    let file = create_temp_file("1 2\n3 4\n");
    let mut stream = Stream::open(file.path()).unwrap();
    assert!(stream.new_line().unwrap());
    assert_eq!(stream.all_columns().len(), 2);
}

#[test]
fn test_open_with_encoding() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"\xb5m 2\n").unwrap();

    let mut stream = Stream::open_with_encoding(file.path(), "iso8859_1").unwrap();
    assert!(stream.new_line().unwrap());
    assert_eq!(stream.next_column().as_deref(), Some("µm"));

    let result = Stream::open_with_encoding(file.path(), "no_such_encoding");
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_open_missing_file() {
    let result = Stream::open(std::path::Path::new("/nonexistent/data.dat"));
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}
