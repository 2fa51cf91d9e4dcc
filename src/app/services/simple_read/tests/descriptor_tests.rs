//! Tests for descriptor parsing, canonical rendering and strict validation

use crate::app::models::DataKind;
use crate::app::services::simple_read::{ColumnGroup, Descriptor, IndexRange, Role};
use crate::Error;

fn names(descriptor: &Descriptor) -> Vec<&str> {
    descriptor.groups().iter().map(|g| g.name.as_str()).collect()
}

#[test]
fn test_plain_names() {
    let descriptor = Descriptor::parse("x y z");
    assert_eq!(names(&descriptor), vec!["x", "y", "z"]);
    for group in descriptor.groups() {
        assert_eq!(group.roles, vec![Role::Data]);
        assert_eq!(group.declared, None);
        assert_eq!(group.range, None);
    }
}

#[test]
fn test_error_markers() {
    let descriptor = Descriptor::parse("x+- y+,- z-+");
    let groups = descriptor.groups();
    assert_eq!(groups[0].roles, vec![Role::Data, Role::SymError]);
    assert_eq!(groups[1].roles, vec![Role::Data, Role::PosError, Role::NegError]);
    assert_eq!(groups[2].roles, vec![Role::Data, Role::NegError, Role::PosError]);
}

#[test]
fn test_comma_then_space() {
    for text in ["x, y", "x,y", "x y"] {
        let descriptor = Descriptor::parse(text);
        assert_eq!(names(&descriptor), vec!["x", "y"], "descriptor {:?}", text);
        for group in descriptor.groups() {
            assert_eq!(group.roles, vec![Role::Data], "descriptor {:?}", text);
        }
    }

    // a comma after a space still skips a column
    let groups = Descriptor::parse("x , y").groups().to_vec();
    assert_eq!(groups[0].roles, vec![Role::Data, Role::Skip]);
    assert_eq!(groups[1].roles, vec![Role::Data]);
}

#[test]
fn test_type_tags() {
    let descriptor = Descriptor::parse("a(text) b(date) c(numeric) d(time) e(string)");
    let kinds: Vec<_> = descriptor.groups().iter().map(|g| g.declared).collect();
    assert_eq!(
        kinds,
        vec![
            Some(DataKind::String),
            Some(DataKind::Date),
            Some(DataKind::Float),
            Some(DataKind::Date),
            Some(DataKind::String),
        ]
    );
}

#[test]
fn test_index_ranges() {
    let descriptor = Descriptor::parse("z+-[1:5] w[:3] v[2:] u[:]");
    let ranges: Vec<_> = descriptor.groups().iter().map(|g| g.range).collect();
    assert_eq!(ranges[0], Some(IndexRange::new(1, 5)));
    assert_eq!(ranges[1], Some(IndexRange::new(1, 3)));
    assert!(ranges[2].is_some_and(|r| r.start == 2 && r.is_unbounded()));
    assert!(ranges[3].is_some_and(|r| r.start == 1 && r.is_unbounded()));
    assert_eq!(
        descriptor.groups()[0].roles,
        vec![Role::Data, Role::SymError]
    );
}

#[test]
fn test_backtick_names() {
    let descriptor = Descriptor::parse("`first value`+- `b,c`");
    assert_eq!(names(&descriptor), vec!["first value", "b,c"]);
    assert_eq!(descriptor.groups()[0].roles, vec![Role::Data, Role::SymError]);
}

#[test]
fn test_skip_placeholders() {
    let descriptor = Descriptor::parse(",x , y ,, z");
    let groups = descriptor.groups();
    assert_eq!(groups[0].roles, vec![Role::Skip, Role::Data, Role::Skip]);
    assert_eq!(groups[1].roles, vec![Role::Data, Role::Skip, Role::Skip]);
    assert_eq!(groups[2].roles, vec![Role::Data]);
}

#[test]
fn test_attached_commas_are_decorative() {
    let descriptor = Descriptor::parse("x,y");
    assert_eq!(names(&descriptor), vec!["x", "y"]);
    assert_eq!(descriptor.groups()[0].roles, vec![Role::Data]);
}

#[test]
fn test_empty_descriptor_is_auto() {
    assert!(Descriptor::parse("").is_empty());
    assert!(Descriptor::parse("   ").is_empty());
}

#[test]
fn test_lenient_malformed_tokens_become_names() {
    let descriptor = Descriptor::parse("x(blob) y[1-3]");
    assert_eq!(names(&descriptor), vec!["x", "(blob)", "y", "[1-3]"]);
}

#[test]
fn test_strict_rejects_bad_descriptors() {
    for bad in ["x(blob)", "y[3:1]", "y[a:b]", "+- x", "``"] {
        assert!(
            matches!(Descriptor::parse_strict(bad), Err(Error::Descriptor { .. })),
            "'{}' should be rejected",
            bad
        );
    }
}

#[test]
fn test_strict_accepts_good_descriptors() {
    for good in ["", "x y", "x+- y+,- z+-[1:5]", "`a b`(text) ,c(date)"] {
        let strict = Descriptor::parse_strict(good).unwrap();
        assert_eq!(strict, Descriptor::parse(good));
    }
}

#[test]
fn test_canonical_round_trip() {
    for text in [
        "x y z",
        "x+- y+,- z+-[1:5]",
        "a(text) b(date),+- c(float)[2:]",
        ",x , `first value`-+ y[:4] ,,",
        "`a+b`[3:7]",
    ] {
        let descriptor = Descriptor::parse(text);
        let rendered = descriptor.to_string();
        let reparsed = Descriptor::parse(&rendered);
        assert!(
            reparsed.same_layout(&descriptor),
            "'{}' rendered as '{}' did not round trip",
            text,
            rendered
        );
    }
}

#[test]
fn test_canonical_rendering() {
    assert_eq!(Descriptor::parse("x +- y + -").to_string(), "x+- y+,-");
    assert_eq!(Descriptor::parse("y + , -").to_string(), "y+ ,-");
    assert_eq!(
        Descriptor::parse("`my x`(numeric)+-[1:3]").to_string(),
        "`my x`(float)[1:3]+-"
    );
    assert_eq!(Descriptor::parse("z[2:]").to_string(), "z[2:]");
}

#[test]
fn test_single_group() {
    let group = ColumnGroup::single("7");
    assert_eq!(group.roles, vec![Role::Data]);
    assert_eq!(group.datatype(), None);
    assert!(!group.is_ranged());
}
