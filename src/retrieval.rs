//! Retrieval Engine
//!
//! Full scans and equality search over sorted files.
//!
//! ## Equality Search
//! 1. Binary search over data blocks, probing each block's first record
//! 2. If the first record is smaller than the target, scan the rest of
//!    that block: a match stops the search, a larger record proves the
//!    value is absent
//! 3. From a match, expand backward and forward (crossing block
//!    boundaries) while records stay equal

use tracing::debug;

use crate::block::Block;
use crate::error::{BlockSortError, Result};
use crate::heap::HeapFile;
use crate::record::{Field, FieldValue, Record, SearchKey};
use std::cmp::Ordering;

/// Records returned by a retrieval plus its I/O cost
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Retrieval {
    /// Matching records in storage order
    pub records: Vec<Record>,
    /// Records decoded while answering
    pub records_read: usize,
}

impl Retrieval {
    pub fn matches(&self) -> usize {
        self.records.len()
    }
}

/// Scan or search a sorted file
///
/// - `value == None`: every record, in order
/// - `value == Some(v)`: records whose `field` equals `v`; `field` is then
///   required
///
/// The file must be sorted, and sorted by `field` when one is given.
pub fn get_all_entries(
    file: &HeapFile<'_>,
    field: Option<Field>,
    value: Option<&FieldValue>,
) -> Result<Retrieval> {
    match (field, value) {
        (_, None) => scan_all(file, field),
        (Some(field), Some(value)) => {
            let key = SearchKey::new(field, value.clone())?;
            find_equal(file, &key)
        }
        (None, Some(_)) => Err(BlockSortError::InvalidArgument(
            "a search value needs a field".to_string(),
        )),
    }
}

/// Every record of a sorted file
pub fn scan_all(file: &HeapFile<'_>, field: Option<Field>) -> Result<Retrieval> {
    require_sorted(file, field)?;

    let mut result = Retrieval::default();
    for index in 1..file.block_count()? {
        let block = file.read_block(index)?;
        for slot in 0..block.filled()? {
            result.records.push(block.record(slot)?);
            result.records_read += 1;
        }
    }
    Ok(result)
}

/// Every record equal to `key`, found by binary search
pub fn find_equal(file: &HeapFile<'_>, key: &SearchKey) -> Result<Retrieval> {
    require_sorted(file, Some(key.field()))?;

    let mut records_read = 0;
    let mut lo = 1;
    let mut hi = file.block_count()?;

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let block = file.read_block(mid)?;
        let filled = block.filled()?;
        if filled == 0 {
            return Err(BlockSortError::Corruption(format!(
                "empty data block {} in sorted file '{}'",
                mid,
                file.name()
            )));
        }

        records_read += 1;
        match block.record(0)?.compare_key(key) {
            Ordering::Equal => {
                return expand(file, key, BlockCursor::seeded(file, mid, block), 0, records_read)
            }
            Ordering::Greater => hi = mid,
            Ordering::Less => {
                for slot in 1..filled {
                    records_read += 1;
                    match block.record(slot)?.compare_key(key) {
                        Ordering::Equal => {
                            let cursor = BlockCursor::seeded(file, mid, block);
                            return expand(file, key, cursor, slot, records_read);
                        }
                        Ordering::Greater => {
                            debug!(file = file.name(), block = mid, "value absent");
                            return Ok(Retrieval {
                                records: Vec::new(),
                                records_read,
                            });
                        }
                        Ordering::Less => {}
                    }
                }
                lo = mid + 1;
            }
        }
    }

    Ok(Retrieval {
        records: Vec::new(),
        records_read,
    })
}

fn require_sorted(file: &HeapFile<'_>, field: Option<Field>) -> Result<()> {
    let recorded = file
        .sorted_by()
        .ok_or_else(|| BlockSortError::NotSorted(file.name().to_string()))?;
    match field {
        Some(requested) if requested != recorded => Err(BlockSortError::SortFieldMismatch {
            file: file.name().to_string(),
            recorded,
            requested,
        }),
        _ => Ok(()),
    }
}

/// Collect all records equal to `key` around the match at `(cursor block, slot)`
fn expand(
    file: &HeapFile<'_>,
    key: &SearchKey,
    mut cursor: BlockCursor<'_, '_>,
    slot: usize,
    mut records_read: usize,
) -> Result<Retrieval> {
    let start_block = cursor.index();
    let found = cursor.block(start_block)?.record(slot)?;

    // Backward, crossing into previous blocks' last slots
    let mut records = Vec::new();
    let (mut b, mut s) = (start_block, slot);
    loop {
        if s == 0 {
            if b <= 1 {
                break;
            }
            b -= 1;
            s = cursor.block(b)?.filled()?;
            if s == 0 {
                break;
            }
        }
        s -= 1;
        let record = cursor.block(b)?.record(s)?;
        records_read += 1;
        if !record.equals_key(key) {
            break;
        }
        records.push(record);
    }
    records.reverse();
    records.push(found);

    // Forward, crossing into next blocks' first slots
    let last_block = file.block_count()? - 1;
    let (mut b, mut s) = (start_block, slot + 1);
    loop {
        if s >= cursor.block(b)?.filled()? {
            if b >= last_block {
                break;
            }
            b += 1;
            s = 0;
            continue;
        }
        let record = cursor.block(b)?.record(s)?;
        records_read += 1;
        if !record.equals_key(key) {
            break;
        }
        records.push(record);
        s += 1;
    }

    debug!(file = file.name(), matches = records.len(), records_read, "equality search");
    Ok(Retrieval {
        records,
        records_read,
    })
}

/// Keeps the last block read so walking within a block costs no I/O
struct BlockCursor<'a, 's> {
    file: &'a HeapFile<'s>,
    index: u32,
    block: Block,
}

impl<'a, 's> BlockCursor<'a, 's> {
    fn seeded(file: &'a HeapFile<'s>, index: u32, block: Block) -> Self {
        Self { file, index, block }
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn block(&mut self, index: u32) -> Result<&Block> {
        if index != self.index {
            self.block = self.file.read_block(index)?;
            self.index = index;
        }
        Ok(&self.block)
    }
}
