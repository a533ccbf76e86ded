//! Tests for CSV ingestion
//!
//! These tests verify:
//! - Line parsing with and without quotes
//! - Malformed lines are rejected with their line number
//! - Loading appends in file order

use std::io::Write;

use blocksort::block::FileBlockStore;
use blocksort::heap::HeapFile;
use blocksort::ingest::{load_csv, parse_record_line};
use blocksort::BlockSortError;
use tempfile::{NamedTempFile, TempDir};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, FileBlockStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileBlockStore::open(temp_dir.path()).unwrap();
    (temp_dir, store)
}

fn write_csv(contents: &str) -> NamedTempFile {
    let mut csv = NamedTempFile::new().unwrap();
    csv.write_all(contents.as_bytes()).unwrap();
    csv.flush().unwrap();
    csv
}

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_parse_quoted_line() {
    let r = parse_record_line(r#"12,"Giorgos","Papadopoulos","Athens""#).unwrap();
    assert_eq!(r.id, 12);
    assert_eq!(r.name(), "Giorgos");
    assert_eq!(r.surname(), "Papadopoulos");
    assert_eq!(r.city(), "Athens");
}

#[test]
fn test_parse_unquoted_line_with_cr() {
    let r = parse_record_line("-4, Eleni ,Nikolaou,Volos\r").unwrap();
    assert_eq!(r.id, -4);
    assert_eq!(r.name(), "Eleni");
    assert_eq!(r.city(), "Volos");
}

#[test]
fn test_parse_rejects_wrong_field_count() {
    assert!(parse_record_line("1,\"a\",\"b\"").is_err());
    assert!(parse_record_line("1,a,b,c,d").is_err());
}

#[test]
fn test_parse_rejects_bad_id() {
    assert!(matches!(
        parse_record_line("x,a,b,c"),
        Err(BlockSortError::InvalidArgument(_))
    ));
}

#[test]
fn test_parse_rejects_oversized_field() {
    let line = format!("1,{},b,c", "n".repeat(20));
    assert!(parse_record_line(&line).is_err());
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_appends_in_order() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();
    let csv = write_csv("3,\"a\",\"b\",\"c\"\n\n1,\"d\",\"e\",\"f\"\n2,\"g\",\"h\",\"i\"\n");

    let mut file = HeapFile::open(&store, "people").unwrap();
    assert_eq!(load_csv(&mut file, csv.path()).unwrap(), 3);

    let ids: Vec<i32> = file.scan().map(|r| r.unwrap().id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn test_load_reports_line_number() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();
    let csv = write_csv("1,a,b,c\n2,a,b\n");

    let mut file = HeapFile::open(&store, "people").unwrap();
    let err = load_csv(&mut file, csv.path()).unwrap_err();
    assert!(err.to_string().contains(":2:"), "{}", err);
    // The good line before the failure stays
    assert_eq!(file.record_count().unwrap(), 1);
}

#[test]
fn test_load_missing_csv() {
    let (temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();

    let mut file = HeapFile::open(&store, "people").unwrap();
    assert!(matches!(
        load_csv(&mut file, &temp.path().join("nope.csv")),
        Err(BlockSortError::Io(_))
    ));
}
