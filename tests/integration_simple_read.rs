//! Integration tests for file imports, blocks and linked files
//!
//! These tests write realistic data files to a temporary directory and run
//! complete imports through the public API.

use simpleread::app::services::linked::LinkedFile;
use simpleread::{
    Dataset, Document, Import2DOperation, Import2DParams, ImportOperation, ImportParams,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write `content` to `name` inside a fresh temporary directory
fn write_data(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write data file");
    (dir, path)
}

fn numeric(doc: &Document, name: &str) -> Vec<f64> {
    doc.get(name)
        .and_then(Dataset::values)
        .unwrap_or_else(|| panic!("missing numeric dataset {}", name))
        .to_vec()
}

/// Purpose: a commented file with a header line, error bars and text column
#[test]
fn test_import_annotated_file() {
    let content = "\
# Calibration run 4
time flux flux_err source
0.0 12.5 0.3 \"lamp A\"
1.0 13.1 0.4 \"lamp A\" ; drift check
2.0 nan 0.5 'lamp B'
";
    let (_dir, path) = write_data("calib.dat", content);
    let params = ImportParams::from_file(&path, "t flux+- src").with_ignore_text();

    let mut doc = Document::new();
    let outcome = ImportOperation::new(params)
        .unwrap()
        .run(&mut doc)
        .unwrap();

    assert_eq!(outcome.datasets, vec!["t", "flux", "src"]);
    assert_eq!(outcome.total_invalid(), 0);
    assert_eq!(numeric(&doc, "t"), vec![0.0, 1.0, 2.0]);
    assert_eq!(
        doc.get("src"),
        Some(&Dataset::Text {
            data: vec!["lamp A".into(), "lamp A".into(), "lamp B".into()]
        })
    );
    match doc.get("flux") {
        Some(Dataset::Numeric { data, serr, .. }) => {
            assert!(data[2].is_nan());
            assert_eq!(serr.as_deref(), Some(&[0.3, 0.4, 0.5][..]));
        }
        other => panic!("unexpected dataset {:?}", other),
    }
}

/// Purpose: block mode over a file with repeated scans
#[test]
fn test_import_blocks_from_file() {
    let content = "1 10\n2 20\n\n1 11\n2 21\n3 31\nno more data\n1 12\n";
    let (_dir, path) = write_data("scans.dat", content);
    let params = ImportParams::from_file(&path, "x y").with_blocks().with_suffix("_scan");

    let mut doc = Document::new();
    let outcome = ImportOperation::new(params)
        .unwrap()
        .run(&mut doc)
        .unwrap();

    assert_eq!(
        outcome.datasets,
        vec!["x_1_scan", "y_1_scan", "x_2_scan", "y_2_scan", "x_3_scan", "y_3_scan"]
    );
    assert_eq!(numeric(&doc, "x_1_scan"), vec![1.0, 2.0]);
    assert_eq!(numeric(&doc, "y_2_scan"), vec![11.0, 21.0, 31.0]);
    assert_eq!(numeric(&doc, "x_3_scan"), vec![1.0]);
    assert_eq!(numeric(&doc, "y_3_scan"), vec![12.0]);
}

/// Purpose: linked datasets can be reread after the file changes
#[test]
fn test_linked_reload_picks_up_changes() {
    let (dir, path) = write_data("live.dat", "1 2\n3 4\n");
    let params = ImportParams::from_file(&path, "a b").with_linked();

    let mut doc = Document::new();
    ImportOperation::new(params)
        .unwrap()
        .run(&mut doc)
        .unwrap();

    let links = doc.linked_files();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].path(), Some(path.as_path()));
    assert_eq!(
        links[0].save_command(Some(dir.path())),
        "ImportFile('live.dat', 'a b', linked=True, ignoretext=False)"
    );

    fs::write(&path, "5 6\n7 8\n9 10\n").unwrap();
    let outcome = links[0].reload(&mut doc).unwrap();

    assert_eq!(outcome.rows.get("a"), Some(&3));
    assert_eq!(numeric(&doc, "a"), vec![5.0, 7.0, 9.0]);
    assert!(doc.entry("b").and_then(|e| e.linked.as_ref()).is_some());
}

/// Purpose: 2D matrices read from a file share one link
#[test]
fn test_import_2d_file_linked() {
    let content = "xrange 0 2\nyrange 0 1\n1 2\n3 4\n\n5 6 7\n";
    let (_dir, path) = write_data("image.dat", content);
    let params = Import2DParams::from_file(&path, vec!["img".into(), "row".into()]).with_linked();

    let mut doc = Document::new();
    let outcome = Import2DOperation::new(params)
        .unwrap()
        .run(&mut doc)
        .unwrap();

    assert_eq!(outcome.datasets, vec!["img", "row"]);
    match doc.get("img") {
        Some(Dataset::TwoD {
            data,
            xrange,
            yrange,
        }) => {
            assert_eq!(data, &vec![vec![3.0, 4.0], vec![1.0, 2.0]]);
            assert_eq!(*xrange, Some((0.0, 2.0)));
            assert_eq!(*yrange, Some((0.0, 1.0)));
        }
        other => panic!("unexpected dataset {:?}", other),
    }

    let links = doc.linked_files();
    assert_eq!(links.len(), 1);
    assert!(matches!(links[0].as_ref(), LinkedFile::TwoD(_)));
}

/// Purpose: missing files surface as errors rather than empty imports
#[test]
fn test_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let params = ImportParams::from_file(dir.path().join("absent.dat"), "x");
    let result = ImportOperation::new(params).unwrap().run(&mut Document::new());
    assert!(matches!(result, Err(simpleread::Error::FileNotFound { .. })));
}

/// Purpose: a Latin-1 file decodes when its encoding is named, and a stray
/// non-UTF-8 byte in a comment does not stop a default import
#[test]
fn test_import_latin1_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("station.dat");
    fs::write(&path, b"# temperature in \xb0C\n1 'caf\xe9'\n3 'cr\xe8me'\n")
        .expect("Failed to write data file");

    let params = ImportParams::from_file(&path, "x label").with_encoding("latin_1");
    let mut doc = Document::new();
    ImportOperation::new(params).unwrap().run(&mut doc).unwrap();
    assert_eq!(numeric(&doc, "x"), vec![1.0, 3.0]);
    assert_eq!(
        doc.get("label"),
        Some(&Dataset::Text {
            data: vec!["café".into(), "crème".into()]
        })
    );

    let mut doc = Document::new();
    let outcome = ImportOperation::new(ImportParams::from_file(&path, "x"))
        .unwrap()
        .run(&mut doc)
        .unwrap();
    assert_eq!(outcome.datasets, vec!["x"]);
    assert_eq!(numeric(&doc, "x"), vec![1.0, 3.0]);
}
