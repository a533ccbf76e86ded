//! # blocksort
//!
//! A block-oriented record store with:
//! - Append-only heap files of fixed-schema records
//! - External merge sort under a one-block-per-buffer memory budget
//! - Sortedness verification
//! - Duplicate-aware binary search over sorted files
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Engine                             │
//! └──────┬──────────────┬───────────────┬───────────────┬───────┘
//!        │              │               │               │
//!        ▼              ▼               ▼               ▼
//! ┌─────────────┐ ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//! │  Heap File  │ │ Ext. Sorter │ │  Verifier   │ │  Retrieval  │
//! │  (append)   │ │ (run merge) │ │   (scan)    │ │  (bsearch)  │
//! └──────┬──────┘ └──────┬──────┘ └──────┬──────┘ └──────┬──────┘
//!        └──────────────┬┴───────────────┴───────────────┘
//!                       ▼
//!              ┌─────────────────┐
//!              │  Block Layout   │  Pager, trailer, record slots
//!              └────────┬────────┘
//!                       ▼
//!              ┌─────────────────┐
//!              │   Block Store   │  allocate / read / write
//!              └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod block;
pub mod heap;
pub mod sort;
pub mod verify;
pub mod retrieval;
pub mod ingest;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BlockSortError, Result};
pub use config::{Config, MismatchPolicy};
pub use engine::Engine;
pub use record::{Field, FieldValue, Record, SearchKey};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of blocksort
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
