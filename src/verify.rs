//! Sortedness Verifier
//!
//! Linear scan confirming a file is in non-decreasing order by a field.
//!
//! ## Responsibilities
//! - Refuse empty files
//! - Apply the mismatch policy when the file is recorded as sorted by a
//!   different field
//! - Compare every record with its predecessor, across block boundaries

use tracing::{debug, warn};

use crate::block::BlockStore;
use crate::config::{Config, MismatchPolicy};
use crate::error::{BlockSortError, Result};
use crate::heap::HeapFile;
use crate::record::{Field, Record};

/// Outcome of a sortedness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCheck {
    Sorted,

    /// First record found smaller than its predecessor
    NotSorted { block: u32, slot: usize },
}

impl SortCheck {
    pub fn is_sorted(&self) -> bool {
        matches!(self, SortCheck::Sorted)
    }
}

/// Checks files for order by a field
pub struct SortVerifier<'s> {
    store: &'s dyn BlockStore,
    on_mismatch: MismatchPolicy,
}

impl<'s> SortVerifier<'s> {
    pub fn new(store: &'s dyn BlockStore, config: &Config) -> Self {
        Self {
            store,
            on_mismatch: config.on_mismatch,
        }
    }

    /// Override the configured mismatch policy
    pub fn on_mismatch(mut self, policy: MismatchPolicy) -> Self {
        self.on_mismatch = policy;
        self
    }

    /// Check `name` is sorted by `field`
    pub fn check_sorted(&self, name: &str, field: Field) -> Result<SortCheck> {
        let file = HeapFile::open(self.store, name)?;

        if let Some(recorded) = file.sorted_by() {
            if recorded != field {
                match self.on_mismatch {
                    MismatchPolicy::Abort => {
                        return Err(BlockSortError::SortFieldMismatch {
                            file: name.to_string(),
                            recorded,
                            requested: field,
                        })
                    }
                    MismatchPolicy::ProceedAnyway => {
                        warn!(file = name, %recorded, requested = %field, "checking against a different field than recorded");
                    }
                }
            }
        }

        let mut prev: Option<Record> = None;
        for index in 1..file.block_count()? {
            let block = file.read_block(index)?;
            for slot in 0..block.filled()? {
                let record = block.record(slot)?;
                if let Some(prev) = &prev {
                    if record.less_than(prev, field) {
                        debug!(file = name, block = index, slot, "order violation");
                        return Ok(SortCheck::NotSorted { block: index, slot });
                    }
                }
                prev = Some(record);
            }
        }

        file.close()?;
        Ok(SortCheck::Sorted)
    }
}
