//! Tests for SortVerifier
//!
//! These tests verify:
//! - Sort outputs pass the check for their field
//! - Unsorted heap files report the first violation
//! - Violations across block boundaries are caught
//! - Empty files and mismatched fields

use blocksort::block::{BlockStore, FileBlockStore, MAX_RECORDS};
use blocksort::heap::HeapFile;
use blocksort::sort::ExternalSorter;
use blocksort::verify::{SortCheck, SortVerifier};
use blocksort::{BlockSortError, Config, Field, MismatchPolicy, Record};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, FileBlockStore, Config) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileBlockStore::open(temp_dir.path()).unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).build();
    (temp_dir, store, config)
}

fn create_heap_with_ids(store: &FileBlockStore, name: &str, ids: &[i32]) {
    HeapFile::create(store, name).unwrap();
    let mut file = HeapFile::open(store, name).unwrap();
    for &id in ids {
        let record = Record::new(id, format!("n{}", id), "s", "c").unwrap();
        file.insert_entry(&record).unwrap();
    }
    file.close().unwrap();
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_sorted_heap_passes() {
    let (_temp, store, config) = setup_temp_store();
    let ids: Vec<i32> = (0..30).collect();
    create_heap_with_ids(&store, "f", &ids);

    let check = SortVerifier::new(&store, &config)
        .check_sorted("f", Field::Id)
        .unwrap();
    assert_eq!(check, SortCheck::Sorted);
    assert!(check.is_sorted());
}

#[test]
fn test_unsorted_within_block() {
    let (_temp, store, config) = setup_temp_store();
    create_heap_with_ids(&store, "f", &[1, 2, 5, 4, 6]);

    let check = SortVerifier::new(&store, &config)
        .check_sorted("f", Field::Id)
        .unwrap();
    assert_eq!(check, SortCheck::NotSorted { block: 1, slot: 3 });
    assert!(!check.is_sorted());
}

#[test]
fn test_unsorted_across_block_boundary() {
    let (_temp, store, config) = setup_temp_store();
    // Each block sorted on its own; block 2 starts below block 1's end
    let mut ids: Vec<i32> = (10..10 + MAX_RECORDS as i32).collect();
    ids.push(0);
    create_heap_with_ids(&store, "f", &ids);

    let check = SortVerifier::new(&store, &config)
        .check_sorted("f", Field::Id)
        .unwrap();
    assert_eq!(check, SortCheck::NotSorted { block: 2, slot: 0 });
}

#[test]
fn test_duplicates_are_sorted() {
    let (_temp, store, config) = setup_temp_store();
    create_heap_with_ids(&store, "f", &[1, 1, 1, 2, 2, 3, 3, 3, 3]);

    assert!(SortVerifier::new(&store, &config)
        .check_sorted("f", Field::Id)
        .unwrap()
        .is_sorted());
}

#[test]
fn test_sort_output_passes_for_every_field() {
    let (_temp, store, config) = setup_temp_store();
    let ids: Vec<i32> = (0..45).map(|i| (i * 17) % 23).collect();
    create_heap_with_ids(&store, "f", &ids);

    for field in Field::ALL {
        ExternalSorter::new(&store, &config)
            .sort_file("f", field)
            .unwrap();
        let output = blocksort::heap::sorted_file_name("f", field);
        let check = SortVerifier::new(&store, &config)
            .check_sorted(&output, field)
            .unwrap();
        assert_eq!(check, SortCheck::Sorted, "{} by {}", output, field);
    }
}

#[test]
fn test_metadata_only_file_is_sorted() {
    let (_temp, store, config) = setup_temp_store();
    create_heap_with_ids(&store, "f", &[]);

    assert!(SortVerifier::new(&store, &config)
        .check_sorted("f", Field::City)
        .unwrap()
        .is_sorted());
}

// =============================================================================
// Precondition Tests
// =============================================================================

#[test]
fn test_zero_block_file_is_empty() {
    let (_temp, store, config) = setup_temp_store();
    store.create_file("raw").unwrap();

    assert!(matches!(
        SortVerifier::new(&store, &config).check_sorted("raw", Field::Id),
        Err(BlockSortError::EmptyFile(_))
    ));
}

#[test]
fn test_mismatch_aborts_by_default() {
    let (_temp, store, config) = setup_temp_store();
    create_heap_with_ids(&store, "f", &[3, 1, 2]);
    ExternalSorter::new(&store, &config)
        .sort_file("f", Field::Id)
        .unwrap();

    assert!(matches!(
        SortVerifier::new(&store, &config).check_sorted("f_Sorted_0", Field::Name),
        Err(BlockSortError::SortFieldMismatch { .. })
    ));
}

#[test]
fn test_mismatch_proceeds_when_allowed() {
    let (_temp, store, config) = setup_temp_store();
    create_heap_with_ids(&store, "f", &[3, 1, 2]);
    ExternalSorter::new(&store, &config)
        .sort_file("f", Field::Id)
        .unwrap();

    // Names n1, n2, n3 follow id order, so the check passes
    let check = SortVerifier::new(&store, &config)
        .on_mismatch(MismatchPolicy::ProceedAnyway)
        .check_sorted("f_Sorted_0", Field::Name)
        .unwrap();
    assert!(check.is_sorted());
}
