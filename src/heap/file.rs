//! Heap file
//!
//! Create, open and append to heap files.

use tracing::debug;

use crate::block::{Block, BlockStore, FileMeta, Pager};
use crate::error::{BlockSortError, Result};
use crate::record::{Field, Record};

use super::RecordIter;

/// An open heap (or sorted) file
pub struct HeapFile<'s> {
    /// Open block file, closed on drop
    pager: Pager<'s>,
    /// Metadata read from block 0 at open time
    meta: FileMeta,
}

impl<'s> HeapFile<'s> {
    /// Create an unsorted heap file
    ///
    /// Writes block 0 with type=HEAP and sorted=NOT_SORTED.
    pub fn create(store: &'s dyn BlockStore, name: &str) -> Result<()> {
        Self::create_with_meta(store, name, FileMeta::heap())
    }

    /// Create an empty file already marked sorted by `field`
    pub fn create_sorted(store: &'s dyn BlockStore, name: &str, field: Field) -> Result<()> {
        Self::create_with_meta(store, name, FileMeta::sorted(field))
    }

    fn create_with_meta(store: &'s dyn BlockStore, name: &str, meta: FileMeta) -> Result<()> {
        let pager = Pager::create(store, name)?;
        let index = pager.allocate_block()?;

        let mut block = pager.read_block(index)?;
        block.set_file_meta(&meta);
        pager.write_block(index, &block)?;

        debug!(file = name, sort = ?meta.sort, "created file");
        pager.close()
    }

    /// Open an existing file and read its metadata block
    pub fn open(store: &'s dyn BlockStore, name: &str) -> Result<Self> {
        let pager = Pager::open(store, name)?;
        if pager.block_count()? == 0 {
            return Err(BlockSortError::EmptyFile(name.to_string()));
        }
        let meta = pager.read_block(0)?.file_meta()?;
        Ok(Self { pager, meta })
    }

    /// Close the file
    pub fn close(self) -> Result<()> {
        self.pager.close()
    }

    pub fn name(&self) -> &str {
        self.pager.name()
    }

    pub fn meta(&self) -> &FileMeta {
        &self.meta
    }

    /// Field the file is recorded as sorted by, if any
    pub fn sorted_by(&self) -> Option<Field> {
        self.meta.sorted_by()
    }

    /// Total blocks including the metadata block
    pub fn block_count(&self) -> Result<u32> {
        self.pager.block_count()
    }

    /// Blocks that can hold records (all but block 0)
    pub fn data_block_count(&self) -> Result<u32> {
        Ok(self.block_count()?.saturating_sub(1))
    }

    pub fn read_block(&self, index: u32) -> Result<Block> {
        self.pager.read_block(index)
    }

    /// Append a record
    ///
    /// Sorted files are read-only to callers; only the sort engine
    /// fills them.
    pub fn insert_entry(&mut self, record: &Record) -> Result<()> {
        if self.meta.sorted_by().is_some() {
            return Err(BlockSortError::ReadOnly(self.name().to_string()));
        }
        self.append(record)
    }

    /// Append without the read-only check
    ///
    /// Steps:
    /// 1. Take the last block (counter - 1)
    /// 2. If only block 0 exists, allocate the first data block
    /// 3. If the last block is full, allocate a new one
    /// 4. Write at slot `filled`, bump the count, persist
    pub(crate) fn append(&mut self, record: &Record) -> Result<()> {
        let mut index = self.pager.block_count()?.saturating_sub(1);
        if index == 0 {
            index = self.pager.allocate_block()?;
        }

        let mut block = self.pager.read_block(index)?;
        if block.is_full()? {
            index = self.pager.allocate_block()?;
            block = self.pager.read_block(index)?;
        }

        block.push_record(record)?;
        self.pager.write_block(index, &block)
    }

    /// Iterate over every record in storage order
    pub fn scan(&self) -> RecordIter<'_, 's> {
        RecordIter::new(self)
    }

    /// Count records by reading every data block's fill count
    pub fn record_count(&self) -> Result<usize> {
        let mut total = 0;
        for index in 1..self.block_count()? {
            total += self.pager.read_block(index)?.filled()?;
        }
        Ok(total)
    }
}
