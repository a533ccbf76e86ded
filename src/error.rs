//! Error types for blocksort
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::record::Field;

/// Result type alias using BlockSortError
pub type Result<T> = std::result::Result<T, BlockSortError>;

/// Unified error type for blocksort operations
#[derive(Debug, Error)]
pub enum BlockSortError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A block store primitive failed. Fatal for the running operation.
    #[error("Storage fault during {op} on '{file}' block {block:?}: {source}")]
    Storage {
        file: String,
        block: Option<u32>,
        op: &'static str,
        #[source]
        source: Box<BlockSortError>,
    },

    // -------------------------------------------------------------------------
    // Block Store Errors
    // -------------------------------------------------------------------------
    #[error("File already exists: {0}")]
    FileExists(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unknown file id: {0}")]
    BadFileId(u32),

    #[error("Block {index} out of range for '{file}' ({count} blocks)")]
    BlockOutOfRange { file: String, index: u32, count: u32 },

    // -------------------------------------------------------------------------
    // Layout Errors
    // -------------------------------------------------------------------------
    #[error("Slot {0} outside the record area")]
    SlotOutOfRange(usize),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Intermediate run '{0}' is not sorted")]
    CorruptRun(String),

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Unknown field number {0} (expected 0..=3)")]
    InvalidField(i64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Precondition Errors
    // -------------------------------------------------------------------------
    #[error("'{0}' is not a heap file")]
    NotHeapFile(String),

    #[error("'{0}' is not sorted")]
    NotSorted(String),

    #[error("'{file}' is sorted by {recorded} but {requested} was requested")]
    SortFieldMismatch {
        file: String,
        recorded: Field,
        requested: Field,
    },

    #[error("'{0}' is empty")]
    EmptyFile(String),

    #[error("'{0}' is a sorted file and cannot be appended to")]
    ReadOnly(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BlockSortError {
    /// Wrap a block store failure with the file and block it happened on
    pub(crate) fn storage(
        file: &str,
        block: Option<u32>,
        op: &'static str,
        source: BlockSortError,
    ) -> Self {
        BlockSortError::Storage {
            file: file.to_string(),
            block,
            op,
            source: Box::new(source),
        }
    }
}
