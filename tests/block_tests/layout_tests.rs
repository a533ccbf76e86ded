//! Tests for the block layout
//!
//! These tests verify:
//! - Trailer word positions and values
//! - File metadata round trips through block 0
//! - Slot append and fill-count bounds

use blocksort::block::{
    Block, FileMeta, SortState, BLOCK_SIZE, FILE_NOT_SORTED, FILE_SORTED, HEAP_FILE, MAX_RECORDS,
};
use blocksort::{BlockSortError, Field, Record};

// =============================================================================
// Helper Functions
// =============================================================================

fn word_from_end(block: &Block, n: usize) -> i32 {
    let at = BLOCK_SIZE - n * 4;
    let bytes = &block.as_bytes()[at..at + 4];
    i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn rec(id: i32) -> Record {
    Record::new(id, "n", "s", "c").unwrap()
}

// =============================================================================
// Trailer Tests
// =============================================================================

#[test]
fn test_new_block_is_empty() {
    let block = Block::new();
    assert_eq!(block.filled().unwrap(), 0);
    assert!(!block.is_full().unwrap());
    assert_eq!(block.as_bytes().len(), BLOCK_SIZE);
}

#[test]
fn test_heap_meta_words() {
    let mut block = Block::new();
    block.set_file_meta(&FileMeta::heap());

    assert_eq!(word_from_end(&block, 1), 0);
    assert_eq!(word_from_end(&block, 2), HEAP_FILE);
    assert_eq!(word_from_end(&block, 3), FILE_NOT_SORTED);
}

#[test]
fn test_sorted_meta_words() {
    let mut block = Block::new();
    block.set_file_meta(&FileMeta::sorted(Field::Surname));

    assert_eq!(word_from_end(&block, 2), HEAP_FILE);
    assert_eq!(word_from_end(&block, 3), FILE_SORTED);
    assert_eq!(word_from_end(&block, 4), 2);
}

#[test]
fn test_meta_round_trip() {
    for meta in [
        FileMeta::heap(),
        FileMeta::sorted(Field::Id),
        FileMeta::sorted(Field::City),
    ] {
        let mut block = Block::new();
        block.set_file_meta(&meta);
        assert_eq!(block.file_meta().unwrap(), meta);
    }
}

#[test]
fn test_zeroed_block_is_not_heap() {
    let meta = Block::new().file_meta().unwrap();
    assert!(!meta.is_heap());
    assert_eq!(meta.sort, SortState::NotSorted);
}

#[test]
fn test_bad_sorted_by_is_corruption() {
    let mut bytes = vec![0u8; BLOCK_SIZE];
    bytes[BLOCK_SIZE - 12..BLOCK_SIZE - 8].copy_from_slice(&FILE_SORTED.to_le_bytes());
    bytes[BLOCK_SIZE - 16..BLOCK_SIZE - 12].copy_from_slice(&9i32.to_le_bytes());
    let block = Block::from_bytes(bytes).unwrap();

    assert!(matches!(
        block.file_meta(),
        Err(BlockSortError::Corruption(_))
    ));
}

#[test]
fn test_from_bytes_checks_size() {
    assert!(Block::from_bytes(vec![0u8; 100]).is_err());
}

// =============================================================================
// Slot Tests
// =============================================================================

#[test]
fn test_push_until_full() {
    let mut block = Block::new();
    for id in 0..MAX_RECORDS as i32 {
        block.push_record(&rec(id)).unwrap();
    }
    assert!(block.is_full().unwrap());
    assert_eq!(word_from_end(&block, 1), MAX_RECORDS as i32);
    assert!(matches!(
        block.push_record(&rec(99)),
        Err(BlockSortError::SlotOutOfRange(_))
    ));

    let ids: Vec<i32> = block.records().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, (0..MAX_RECORDS as i32).collect::<Vec<_>>());
}

#[test]
fn test_records_do_not_touch_trailer() {
    let mut block = Block::new();
    block.set_file_meta(&FileMeta::sorted(Field::Name));
    for id in 0..MAX_RECORDS as i32 {
        block.push_record(&rec(id)).unwrap();
    }
    assert_eq!(
        block.file_meta().unwrap().sorted_by(),
        Some(Field::Name)
    );
}

#[test]
fn test_bad_fill_count_is_corruption() {
    let mut bytes = vec![0u8; BLOCK_SIZE];
    bytes[BLOCK_SIZE - 4..].copy_from_slice(&(MAX_RECORDS as i32 + 1).to_le_bytes());
    let block = Block::from_bytes(bytes).unwrap();
    assert!(matches!(block.filled(), Err(BlockSortError::Corruption(_))));
}
