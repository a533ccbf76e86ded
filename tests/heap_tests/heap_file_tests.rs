//! Tests for HeapFile
//!
//! These tests verify:
//! - Metadata written at creation
//! - Append order and block growth
//! - Sorted files reject caller inserts
//! - Scans and record counts

use blocksort::block::{BlockStore, FileBlockStore, SortState, BLOCK_SIZE, MAX_RECORDS};
use blocksort::heap::{sorted_file_name, HeapFile};
use blocksort::{BlockSortError, Field, Record};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, FileBlockStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileBlockStore::open(temp_dir.path()).unwrap();
    (temp_dir, store)
}

fn rec(id: i32) -> Record {
    Record::new(id, format!("name{}", id), "surname", "city").unwrap()
}

fn insert_ids(store: &FileBlockStore, name: &str, ids: impl IntoIterator<Item = i32>) {
    let mut file = HeapFile::open(store, name).unwrap();
    for id in ids {
        file.insert_entry(&rec(id)).unwrap();
    }
    file.close().unwrap();
}

fn scan_ids(file: &HeapFile<'_>) -> Vec<i32> {
    file.scan().map(|r| r.unwrap().id).collect()
}

// =============================================================================
// Creation Tests
// =============================================================================

#[test]
fn test_create_writes_metadata_block() {
    let (temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();

    let len = std::fs::metadata(temp.path().join("people")).unwrap().len();
    assert_eq!(len, BLOCK_SIZE as u64);

    let file = HeapFile::open(&store, "people").unwrap();
    assert!(file.meta().is_heap());
    assert_eq!(file.meta().sort, SortState::NotSorted);
    assert_eq!(file.block_count().unwrap(), 1);
    assert_eq!(file.data_block_count().unwrap(), 0);
    assert_eq!(file.record_count().unwrap(), 0);
}

#[test]
fn test_create_existing_fails() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();
    match HeapFile::create(&store, "people") {
        Err(BlockSortError::Storage { op, source, .. }) => {
            assert_eq!(op, "create");
            assert!(matches!(*source, BlockSortError::FileExists(_)));
        }
        other => panic!("unexpected result: {:?}", other.err()),
    }
}

#[test]
fn test_create_sorted_records_field() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create_sorted(&store, "people_Sorted_3", Field::City).unwrap();

    let file = HeapFile::open(&store, "people_Sorted_3").unwrap();
    assert!(file.meta().is_heap());
    assert_eq!(file.sorted_by(), Some(Field::City));
}

#[test]
fn test_open_missing_file() {
    let (_temp, store) = setup_temp_store();
    assert!(HeapFile::open(&store, "nothing").is_err());
}

#[test]
fn test_open_zero_block_file_is_empty() {
    let (_temp, store) = setup_temp_store();
    store.create_file("raw").unwrap();

    assert!(matches!(
        HeapFile::open(&store, "raw"),
        Err(BlockSortError::EmptyFile(_))
    ));
}

#[test]
fn test_sorted_file_name() {
    assert_eq!(sorted_file_name("people", Field::Id), "people_Sorted_0");
    assert_eq!(sorted_file_name("people", Field::City), "people_Sorted_3");
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_insert_first_record_allocates_block_1() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();
    insert_ids(&store, "people", [5]);

    let file = HeapFile::open(&store, "people").unwrap();
    assert_eq!(file.block_count().unwrap(), 2);
    assert_eq!(file.read_block(1).unwrap().filled().unwrap(), 1);
    // Block 0 stays free of records
    assert_eq!(file.read_block(0).unwrap().filled().unwrap(), 0);
}

#[test]
fn test_insert_exactly_one_block() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();
    insert_ids(&store, "people", 0..MAX_RECORDS as i32);

    let file = HeapFile::open(&store, "people").unwrap();
    assert_eq!(file.data_block_count().unwrap(), 1);
    assert!(file.read_block(1).unwrap().is_full().unwrap());
}

#[test]
fn test_insert_spills_into_new_block() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();
    insert_ids(&store, "people", 0..MAX_RECORDS as i32 + 1);

    let file = HeapFile::open(&store, "people").unwrap();
    assert_eq!(file.data_block_count().unwrap(), 2);
    assert_eq!(file.read_block(2).unwrap().filled().unwrap(), 1);
    assert_eq!(file.record_count().unwrap(), MAX_RECORDS + 1);
}

#[test]
fn test_only_last_block_partial() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();
    insert_ids(&store, "people", 0..40);

    let file = HeapFile::open(&store, "people").unwrap();
    let blocks = file.block_count().unwrap();
    assert_eq!(blocks, 1 + 6);
    for index in 1..blocks - 1 {
        assert!(file.read_block(index).unwrap().is_full().unwrap());
    }
    assert_eq!(file.read_block(blocks - 1).unwrap().filled().unwrap(), 40 - 35);
}

#[test]
fn test_inserts_survive_reopen_in_order() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();
    insert_ids(&store, "people", [3, 1, 2]);
    insert_ids(&store, "people", [9, 8]);

    let file = HeapFile::open(&store, "people").unwrap();
    assert_eq!(scan_ids(&file), vec![3, 1, 2, 9, 8]);
}

#[test]
fn test_sorted_file_is_read_only() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create_sorted(&store, "people_Sorted_0", Field::Id).unwrap();

    let mut file = HeapFile::open(&store, "people_Sorted_0").unwrap();
    assert!(matches!(
        file.insert_entry(&rec(1)),
        Err(BlockSortError::ReadOnly(_))
    ));
    assert_eq!(file.block_count().unwrap(), 1);
}

// =============================================================================
// Scan Tests
// =============================================================================

#[test]
fn test_scan_empty_file() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();

    let file = HeapFile::open(&store, "people").unwrap();
    assert_eq!(file.scan().count(), 0);
}

#[test]
fn test_scan_returns_full_records() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();

    let maria = Record::new(11, "Maria", "Papadopoulou", "Thessaloniki").unwrap();
    let mut file = HeapFile::open(&store, "people").unwrap();
    file.insert_entry(&maria).unwrap();

    let records: Vec<Record> = file.scan().collect::<Result<_, _>>().unwrap();
    assert_eq!(records, vec![maria]);
}

#[test]
fn test_drop_closes_file() {
    let (_temp, store) = setup_temp_store();
    HeapFile::create(&store, "people").unwrap();

    {
        let _file = HeapFile::open(&store, "people").unwrap();
        assert_eq!(store.open_file_count(), 1);
    }
    assert_eq!(store.open_file_count(), 0);
}
