//! Heap File Module
//!
//! Append-only record files made of fixed-size blocks.
//!
//! ## Responsibilities
//! - Create heap files (unsorted) and sorted output files
//! - Open/close files through a scoped `Pager`
//! - Append records in call order, growing the file block by block
//! - Sequential scans in storage order
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Block 0: metadata only                  │
//! │   trailer: FileType | Sorted | SortedBy │
//! ├─────────────────────────────────────────┤
//! │ Block 1: records 0..filled              │
//! ├─────────────────────────────────────────┤
//! │ Block 2: records 0..filled              │
//! │ ... (only the last block may be partial)│
//! └─────────────────────────────────────────┘
//! ```

mod file;
mod iterator;

pub use file::HeapFile;
pub use iterator::RecordIter;

/// Name of the file `sort_file(name, field)` produces
pub fn sorted_file_name(name: &str, field: crate::record::Field) -> String {
    format!("{}_Sorted_{}", name, field.number())
}
