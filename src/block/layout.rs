//! Block layout
//!
//! Owned block buffer with typed access to slots and trailer words.

use crate::error::{BlockSortError, Result};
use crate::record::{self, Field, Record};

use super::{BLOCK_SIZE, FILE_NOT_SORTED, FILE_SORTED, HEAP_FILE, MAX_RECORDS};

// Trailer words, counted back from the end of the block
const FILLED_WORD: usize = 1;
const FILE_TYPE_WORD: usize = 2;
const SORTED_WORD: usize = 3;
const SORTED_BY_WORD: usize = 4;

/// Sort state recorded in block 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortState {
    NotSorted,
    Sorted(Field),
}

/// File metadata held in the trailer of block 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    /// Raw file type marker (`HEAP_FILE` for every file the engine writes)
    pub file_type: i32,
    pub sort: SortState,
}

impl FileMeta {
    /// Metadata for a freshly created heap file
    pub fn heap() -> Self {
        Self {
            file_type: HEAP_FILE,
            sort: SortState::NotSorted,
        }
    }

    /// Metadata for a sort output
    pub fn sorted(field: Field) -> Self {
        Self {
            file_type: HEAP_FILE,
            sort: SortState::Sorted(field),
        }
    }

    pub fn is_heap(&self) -> bool {
        self.file_type == HEAP_FILE
    }

    pub fn sorted_by(&self) -> Option<Field> {
        match self.sort {
            SortState::Sorted(field) => Some(field),
            SortState::NotSorted => None,
        }
    }
}

/// One block's bytes
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    data: Box<[u8]>,
}

impl Block {
    /// A zeroed block (filled count 0)
    pub fn new() -> Self {
        Self {
            data: vec![0u8; BLOCK_SIZE].into_boxed_slice(),
        }
    }

    /// Wrap raw bytes read from the store
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != BLOCK_SIZE {
            return Err(BlockSortError::Corruption(format!(
                "block is {} bytes, expected {}",
                bytes.len(),
                BLOCK_SIZE
            )));
        }
        Ok(Self {
            data: bytes.into_boxed_slice(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    // =========================================================================
    // Trailer
    // =========================================================================

    /// Number of occupied slots
    pub fn filled(&self) -> Result<usize> {
        let raw = self.word(FILLED_WORD);
        if raw < 0 || raw as usize > MAX_RECORDS {
            return Err(BlockSortError::Corruption(format!(
                "filled count {} outside 0..={}",
                raw, MAX_RECORDS
            )));
        }
        Ok(raw as usize)
    }

    pub fn set_filled(&mut self, filled: usize) {
        debug_assert!(filled <= MAX_RECORDS);
        self.set_word(FILLED_WORD, filled as i32);
    }

    pub fn is_full(&self) -> Result<bool> {
        Ok(self.filled()? == MAX_RECORDS)
    }

    /// Decode block 0's metadata words
    pub fn file_meta(&self) -> Result<FileMeta> {
        let file_type = self.word(FILE_TYPE_WORD);
        let sort = match self.word(SORTED_WORD) {
            FILE_SORTED => {
                let by = self.word(SORTED_BY_WORD);
                let field = Field::try_from(by).map_err(|_| {
                    BlockSortError::Corruption(format!("sorted-by field {} in block 0", by))
                })?;
                SortState::Sorted(field)
            }
            _ => SortState::NotSorted,
        };
        Ok(FileMeta { file_type, sort })
    }

    pub fn set_file_meta(&mut self, meta: &FileMeta) {
        self.set_word(FILE_TYPE_WORD, meta.file_type);
        match meta.sort {
            SortState::NotSorted => self.set_word(SORTED_WORD, FILE_NOT_SORTED),
            SortState::Sorted(field) => {
                self.set_word(SORTED_WORD, FILE_SORTED);
                self.set_word(SORTED_BY_WORD, field.number());
            }
        }
    }

    // =========================================================================
    // Slots
    // =========================================================================

    pub fn record(&self, slot: usize) -> Result<Record> {
        record::decode(slot, &self.data)
    }

    pub fn set_record(&mut self, slot: usize, record: &Record) -> Result<()> {
        record::encode(record, slot, &mut self.data)
    }

    /// Append into the next free slot; fails when the block is full
    pub fn push_record(&mut self, record: &Record) -> Result<()> {
        let filled = self.filled()?;
        if filled == MAX_RECORDS {
            return Err(BlockSortError::SlotOutOfRange(filled));
        }
        self.set_record(filled, record)?;
        self.set_filled(filled + 1);
        Ok(())
    }

    /// All records in slot order
    pub fn records(&self) -> Result<Vec<Record>> {
        let filled = self.filled()?;
        (0..filled).map(|slot| self.record(slot)).collect()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn word_offset(word_from_end: usize) -> usize {
        BLOCK_SIZE - word_from_end * 4
    }

    fn word(&self, word_from_end: usize) -> i32 {
        let at = Self::word_offset(word_from_end);
        i32::from_le_bytes([
            self.data[at],
            self.data[at + 1],
            self.data[at + 2],
            self.data[at + 3],
        ])
    }

    fn set_word(&mut self, word_from_end: usize, value: i32) {
        let at = Self::word_offset(word_from_end);
        self.data[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("filled", &self.word(FILLED_WORD))
            .field("file_type", &self.word(FILE_TYPE_WORD))
            .field("sorted", &self.word(SORTED_WORD))
            .finish()
    }
}
