//! Temporary runs
//!
//! Scratch directory lifecycle plus buffered cursors over run files.

use tracing::{debug, warn};

use crate::block::{Block, BlockStore, Pager, MAX_RECORDS};
use crate::error::Result;
use crate::record::Record;

// =============================================================================
// Scratch Directory
// =============================================================================

/// Owns every run file of one sort; deletes what is left on drop
pub(super) struct ScratchDir<'s> {
    store: &'s dyn BlockStore,
    dir: String,
    /// Run files created and not yet removed
    live: Vec<String>,
}

impl<'s> ScratchDir<'s> {
    /// Start from an empty scratch directory, dropping leftovers of an
    /// interrupted sort
    pub(super) fn create(store: &'s dyn BlockStore, dir: &str) -> Result<Self> {
        store.remove_dir(dir)?;
        Ok(Self {
            store,
            dir: dir.to_string(),
            live: Vec::new(),
        })
    }

    /// `<dir>/<pass>_<n>`
    fn run_name(&self, pass: usize, n: usize) -> String {
        format!("{}/{}_{}", self.dir, pass, n)
    }

    /// Where the sorted output is built before it is moved into place;
    /// removed with the directory if the sort fails
    pub(super) fn staging_name(&self) -> String {
        format!("{}/sorted", self.dir)
    }

    /// Create `count` empty run files for `pass`
    pub(super) fn create_runs(&mut self, pass: usize, count: usize) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(count);
        for n in 0..count {
            let name = self.run_name(pass, n);
            self.store.create_file(&name)?;
            self.live.push(name.clone());
            names.push(name);
        }
        debug!(pass, count, "created run files");
        Ok(names)
    }

    /// Delete the given runs (a finished pass's inputs)
    pub(super) fn remove_runs(&mut self, names: &[String]) -> Result<()> {
        for name in names {
            self.store.remove_file(name)?;
            self.live.retain(|live| live != name);
        }
        Ok(())
    }

    /// Delete all remaining runs and the directory, reporting errors
    pub(super) fn close(mut self) -> Result<()> {
        let live = std::mem::take(&mut self.live);
        self.remove_runs(&live)?;
        self.store.remove_dir(&self.dir)
    }
}

impl Drop for ScratchDir<'_> {
    fn drop(&mut self) {
        for name in self.live.drain(..) {
            if let Err(e) = self.store.remove_file(&name) {
                warn!(run = %name, error = %e, "failed to remove run file");
            }
        }
        if let Err(e) = self.store.remove_dir(&self.dir) {
            warn!(dir = %self.dir, error = %e, "failed to remove scratch directory");
        }
    }
}

// =============================================================================
// Run Cursors
// =============================================================================

/// Write `records` (at most one block's worth) as the only block of a run
pub(super) fn write_block_run(store: &dyn BlockStore, name: &str, records: &[Record]) -> Result<()> {
    let pager = Pager::open(store, name)?;
    let mut block = Block::new();
    for record in records {
        block.push_record(record)?;
    }
    let index = pager.allocate_block()?;
    pager.write_block(index, &block)?;
    pager.close()
}

/// Output cursor: buffers one block of records, flushes to a new block
pub(super) struct RunWriter<'s> {
    pager: Pager<'s>,
    buffer: Vec<Record>,
    written: usize,
}

impl<'s> RunWriter<'s> {
    pub(super) fn open(store: &'s dyn BlockStore, name: &str) -> Result<Self> {
        Ok(Self {
            pager: Pager::open(store, name)?,
            buffer: Vec::with_capacity(MAX_RECORDS),
            written: 0,
        })
    }

    pub(super) fn push(&mut self, record: Record) -> Result<()> {
        self.buffer.push(record);
        if self.buffer.len() == MAX_RECORDS {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let index = self.pager.allocate_block()?;
        let mut block = Block::new();
        for record in self.buffer.drain(..) {
            block.push_record(&record)?;
            self.written += 1;
        }
        self.pager.write_block(index, &block)
    }

    /// Flush the partial last block and close; returns records written
    pub(super) fn finish(mut self) -> Result<usize> {
        self.flush()?;
        let written = self.written;
        self.pager.close()?;
        Ok(written)
    }
}

/// Input cursor: streams a run one block at a time
pub(super) struct RunReader<'s> {
    pager: Pager<'s>,
    blocks: u32,
    next_block: u32,
    buffer: Vec<Record>,
    pos: usize,
}

impl<'s> RunReader<'s> {
    pub(super) fn open(store: &'s dyn BlockStore, name: &str) -> Result<Self> {
        let pager = Pager::open(store, name)?;
        let blocks = pager.block_count()?;
        let mut reader = Self {
            pager,
            blocks,
            next_block: 0,
            buffer: Vec::with_capacity(MAX_RECORDS),
            pos: 0,
        };
        reader.refill()?;
        Ok(reader)
    }

    pub(super) fn name(&self) -> &str {
        self.pager.name()
    }

    /// Current record, `None` once the run is exhausted
    pub(super) fn peek(&self) -> Option<&Record> {
        self.buffer.get(self.pos)
    }

    /// Take the current record and move on
    pub(super) fn take(&mut self) -> Result<Option<Record>> {
        let record = match self.buffer.get(self.pos) {
            Some(record) => record.clone(),
            None => return Ok(None),
        };
        self.pos += 1;
        self.refill()?;
        Ok(Some(record))
    }

    /// Load blocks until a record is available or the run ends
    fn refill(&mut self) -> Result<()> {
        while self.pos >= self.buffer.len() && self.next_block < self.blocks {
            let block = self.pager.read_block(self.next_block)?;
            self.buffer.clear();
            for slot in 0..block.filled()? {
                self.buffer.push(block.record(slot)?);
            }
            self.next_block += 1;
            self.pos = 0;
        }
        Ok(())
    }
}
