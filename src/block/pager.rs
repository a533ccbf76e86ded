//! Pager
//!
//! One open file of the block store. Every allocate/read/write failure is
//! reported as a storage fault naming the file and block; the file is
//! closed when the pager is dropped.

use tracing::warn;

use crate::error::{BlockSortError, Result};

use super::{Block, BlockStore, FileId};

/// Scoped handle to an open block file
pub struct Pager<'s> {
    store: &'s dyn BlockStore,
    file: FileId,
    name: String,
    closed: bool,
}

impl<'s> Pager<'s> {
    /// Open an existing file
    pub fn open(store: &'s dyn BlockStore, name: &str) -> Result<Self> {
        let file = store
            .open_file(name)
            .map_err(|e| BlockSortError::storage(name, None, "open", e))?;
        Ok(Self {
            store,
            file,
            name: name.to_string(),
            closed: false,
        })
    }

    /// Create an empty file and open it
    pub fn create(store: &'s dyn BlockStore, name: &str) -> Result<Self> {
        store
            .create_file(name)
            .map_err(|e| BlockSortError::storage(name, None, "create", e))?;
        Self::open(store, name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_id(&self) -> FileId {
        self.file
    }

    pub fn block_count(&self) -> Result<u32> {
        self.store
            .block_count(self.file)
            .map_err(|e| BlockSortError::storage(&self.name, None, "block count", e))
    }

    /// Grow the file by one block and return the new block's index
    pub fn allocate_block(&self) -> Result<u32> {
        self.store
            .allocate_block(self.file)
            .map_err(|e| BlockSortError::storage(&self.name, None, "allocate", e))?;
        let count = self.block_count()?;
        Ok(count - 1)
    }

    pub fn read_block(&self, index: u32) -> Result<Block> {
        self.store
            .read_block(self.file, index)
            .map_err(|e| BlockSortError::storage(&self.name, Some(index), "read", e))
    }

    pub fn write_block(&self, index: u32, block: &Block) -> Result<()> {
        self.store
            .write_block(self.file, index, block)
            .map_err(|e| BlockSortError::storage(&self.name, Some(index), "write", e))
    }

    /// Close the file, reporting any error the drop path would swallow
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.store
            .close_file(self.file)
            .map_err(|e| BlockSortError::storage(&self.name, None, "close", e))
    }
}

impl Drop for Pager<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.store.close_file(self.file) {
            warn!(file = %self.name, error = %e, "failed to close block file");
        }
    }
}
