//! Sort Module
//!
//! External merge sort of heap files under a fixed memory budget.
//!
//! ## Responsibilities
//! - Split a heap file into one-block runs, each sorted in memory
//! - Reduce runs with 2-way merge passes over temporary run files
//! - Materialize the final run as `<name>_Sorted_<field>`
//! - Clean up every temporary run, on success and on failure
//!
//! ## Memory
//! At most three record buffers of `MAX_RECORDS` are live during a merge:
//! two input cursors and one output cursor. Run generation uses one.
//!
//! ## Passes
//! ```text
//! pass 0:  [b1] [b2] [b3] [b4] [b5] [  ]     one run per data block,
//!            \   /     \   /     \   /        padded to an even count
//! pass 1:   [b1b2]    [b3b4]    [b5]   [  ]
//!               \      /          \    /
//! pass 2:     [b1..b4]            [b5]
//!                   \             /
//! pass 3:        [   b1 .. b5   ]             → materialized
//! ```
//! Run files carry no metadata block: records start at block 0.

mod memory;
mod merge;
mod run;
mod sorter;

pub use memory::merge_sort;
pub use sorter::{ExternalSorter, SortOutcome, SortReport};
