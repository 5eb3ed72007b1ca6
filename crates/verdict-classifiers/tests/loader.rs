//! Integration tests for the CSV loader against on-disk fixtures.

use std::fs;

use tempfile::tempdir;
use verdict_classifiers::error::PipelineError;
use verdict_classifiers::io::loader::{load, load_wdbc, ColumnSchema, DataSource};

fn small_schema() -> ColumnSchema {
    ColumnSchema {
        id_column: "id".to_string(),
        label_column: "diagnosis".to_string(),
        feature_columns: vec!["f1".to_string(), "f2".to_string(), "f3".to_string()],
    }
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[test]
fn loads_a_well_formed_headerless_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "1001,M,1.0,2.0,3.0\n1002,B,4.0,5.0,6.0\n").unwrap();

    let table = load(&DataSource::LocalPath(path), &small_schema()).unwrap();
    assert_eq!(table.n_records(), 2);
    assert_eq!(table.ids, vec!["1001", "1002"]);
    assert_eq!(table.labels, vec!["M", "B"]);
    assert_eq!(table.x.shape(), &[2, 3]);
    assert_eq!(table.x[(0, 0)], 1.0);
    assert_eq!(table.x[(1, 2)], 6.0);
    assert_eq!(table.feature_names, vec!["f1", "f2", "f3"]);
}

#[test]
fn wdbc_shaped_rows_load_with_the_default_schema() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wdbc.data");

    let features: Vec<String> = (0..30).map(|i| format!("{}.5", i)).collect();
    let row = format!("842302,M,{}", features.join(","));
    fs::write(&path, format!("{}\n", row)).unwrap();

    let table = load_wdbc(&DataSource::LocalPath(path)).unwrap();
    assert_eq!(table.n_records(), 1);
    assert_eq!(table.x.shape(), &[1, 30]);
    assert_eq!(table.x[(0, 29)], 29.5);
}

#[test]
fn whitespace_around_cells_is_tolerated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "1001, M , 1.0 ,2.0,3.0\n").unwrap();

    let table = load(&DataSource::LocalPath(path), &small_schema()).unwrap();
    assert_eq!(table.labels, vec!["M"]);
    assert_eq!(table.x[(0, 0)], 1.0);
}

#[test]
fn empty_file_yields_an_empty_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    let table = load(&DataSource::LocalPath(path), &small_schema()).unwrap();
    assert_eq!(table.n_records(), 0);
    assert_eq!(table.x.shape(), &[0, 3]);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn missing_file_is_source_unavailable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("definitely-not-here.csv");

    match load(&DataSource::LocalPath(path), &small_schema()) {
        Err(PipelineError::SourceUnavailable { source, .. }) => {
            assert!(source.contains("definitely-not-here"), "source was {}", source)
        }
        other => panic!("expected SourceUnavailable, got {:?}", other),
    }
}

#[test]
fn short_row_is_a_schema_mismatch_with_its_row_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "1001,M,1.0,2.0,3.0\n1002,B,4.0,5.0\n").unwrap();

    match load(&DataSource::LocalPath(path), &small_schema()) {
        Err(PipelineError::SchemaMismatch { row, detail }) => {
            assert_eq!(row, 2);
            assert!(detail.contains("expected 5"), "detail was {}", detail);
        }
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn non_numeric_feature_names_the_offending_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "1001,M,1.0,oops,3.0\n").unwrap();

    match load(&DataSource::LocalPath(path), &small_schema()) {
        Err(PipelineError::SchemaMismatch { row, detail }) => {
            assert_eq!(row, 1);
            assert!(detail.contains("f2"), "detail should name the column, was {}", detail);
            assert!(detail.contains("oops"), "detail should carry the value, was {}", detail);
        }
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn unreachable_url_is_source_unavailable() {
    // Reserved TLD, resolves nowhere.
    let source = DataSource::parse("http://wdbc.invalid/wdbc.data");
    match load(&source, &small_schema()) {
        Err(PipelineError::SourceUnavailable { source, .. }) => {
            assert!(source.contains("wdbc.invalid"))
        }
        other => panic!("expected SourceUnavailable, got {:?}", other),
    }
}
