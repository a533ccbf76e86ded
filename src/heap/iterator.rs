//! Heap file iterator
//!
//! Sequential iteration over all records, one block in memory at a time.

use crate::error::Result;
use crate::record::Record;

use super::HeapFile;

/// Iterator over a file's records in storage order
pub struct RecordIter<'a, 's> {
    file: &'a HeapFile<'s>,
    /// Next block to load
    next_block: u32,
    /// Records of the current block
    records: std::vec::IntoIter<Record>,
    /// Set after an error or the last block
    done: bool,
}

impl<'a, 's> RecordIter<'a, 's> {
    pub(super) fn new(file: &'a HeapFile<'s>) -> Self {
        Self {
            file,
            // Block 0 holds metadata only
            next_block: 1,
            records: Vec::new().into_iter(),
            done: false,
        }
    }

    fn load_next_block(&mut self) -> Result<bool> {
        if self.next_block >= self.file.block_count()? {
            return Ok(false);
        }
        let block = self.file.read_block(self.next_block)?;
        self.records = block.records()?.into_iter();
        self.next_block += 1;
        Ok(true)
    }
}

impl Iterator for RecordIter<'_, '_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if let Some(record) = self.records.next() {
                return Some(Ok(record));
            }
            match self.load_next_block() {
                Ok(true) => continue,
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
