//! Block Module
//!
//! Fixed-size block layout and access to the underlying block store.
//!
//! ## Responsibilities
//! - Define the block trailer (fill count, and file metadata in block 0)
//! - Address record slots within a block
//! - Wrap the block store's allocate/read/write primitives, attaching the
//!   file and block index to every failure
//!
//! ## Block Format (512 bytes)
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ Slot 0 .. Slot 6            (7 × 64-byte records)          │
//! ├────────────────────────────────────────────────────────────┤
//! │ unused                                                     │
//! ├──────────────┬──────────────┬──────────────┬───────────────┤
//! │ SortedBy (4) │ Sorted (4)   │ FileType (4) │ Filled (4)    │
//! │ word -4      │ word -3      │ word -2      │ word -1       │
//! └──────────────┴──────────────┴──────────────┴───────────────┘
//! ```
//! All trailer words are little-endian i32. Only `Filled` is meaningful in
//! data blocks; the other three are written to block 0 of a file.

mod layout;
mod pager;
mod store;

pub use layout::{Block, FileMeta, SortState};
pub use pager::Pager;
pub use store::{BlockStore, FileBlockStore, FileId};

use crate::record::RECORD_SIZE;

/// Size of one block in bytes
pub const BLOCK_SIZE: usize = 512;

/// Record slots per block; the last slot's worth of space holds the trailer
pub const MAX_RECORDS: usize = BLOCK_SIZE / RECORD_SIZE - 1;

/// File type marker stored in block 0
pub const HEAP_FILE: i32 = 256;

/// Sorted-flag value for a sorted file
pub const FILE_SORTED: i32 = 255;

/// Sorted-flag value for an unsorted file
pub const FILE_NOT_SORTED: i32 = 254;
