//! External sorter
//!
//! Drives run generation, merge passes and materialization.

use tracing::{debug, info, warn};

use crate::block::{BlockStore, MAX_RECORDS};
use crate::config::{Config, MismatchPolicy};
use crate::error::{BlockSortError, Result};
use crate::heap::{sorted_file_name, HeapFile};
use crate::record::{Field, Record};

use super::memory::merge_sort;
use super::merge::{merge_runs, run_is_sorted};
use super::run::{write_block_run, RunReader, ScratchDir};

/// Result of a successful `sort_file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    /// Source was already sorted by the requested field; nothing written
    AlreadySorted { file: String },

    /// A new sorted file was written
    Sorted(SortReport),
}

/// Statistics of one sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortReport {
    /// Name of the sorted file
    pub output: String,
    /// Records copied into the sorted file
    pub records: usize,
    /// Runs produced by pass 0 (after padding)
    pub initial_runs: usize,
    /// Merge passes performed
    pub merge_passes: usize,
}

/// External merge sort over a block store
pub struct ExternalSorter<'s> {
    store: &'s dyn BlockStore,
    /// Scratch directory for run files (relative to the store root)
    scratch_dir: String,
    /// Policy when the source is sorted by another field
    on_mismatch: MismatchPolicy,
    /// Verify the first input run of every merge
    verify_runs: bool,
}

impl<'s> ExternalSorter<'s> {
    pub fn new(store: &'s dyn BlockStore, config: &Config) -> Self {
        Self {
            store,
            scratch_dir: config.scratch_dir.clone(),
            on_mismatch: config.on_mismatch,
            verify_runs: config.verify_runs,
        }
    }

    /// Override the configured mismatch policy
    pub fn on_mismatch(mut self, policy: MismatchPolicy) -> Self {
        self.on_mismatch = policy;
        self
    }

    /// Sort heap file `name` by `field` into `<name>_Sorted_<field>`
    ///
    /// Steps:
    /// 1. Check the source is a heap file and not already sorted by `field`
    /// 2. Pass 0: one sorted run per data block, padded to an even count
    /// 3. Merge runs pairwise until one is left
    /// 4. Copy the final run into a staged sorted file, then move it over
    ///    `<name>_Sorted_<field>`
    pub fn sort_file(&self, name: &str, field: Field) -> Result<SortOutcome> {
        let source = HeapFile::open(self.store, name)?;

        if !source.meta().is_heap() {
            return Err(BlockSortError::NotHeapFile(name.to_string()));
        }
        match source.sorted_by() {
            Some(recorded) if recorded == field => {
                info!(file = name, %field, "already sorted, nothing to do");
                return Ok(SortOutcome::AlreadySorted {
                    file: name.to_string(),
                });
            }
            Some(recorded) => match self.on_mismatch {
                MismatchPolicy::Abort => {
                    return Err(BlockSortError::SortFieldMismatch {
                        file: name.to_string(),
                        recorded,
                        requested: field,
                    })
                }
                MismatchPolicy::ProceedAnyway => {
                    warn!(file = name, %recorded, requested = %field, "re-sorting by another field");
                }
            },
            None => {}
        }

        let output = sorted_file_name(name, field);
        let data_blocks = source.data_block_count()? as usize;
        info!(file = name, %field, data_blocks, "sorting");

        let mut scratch = ScratchDir::create(self.store, &self.scratch_dir)?;
        let staged = scratch.staging_name();

        if data_blocks == 0 {
            source.close()?;
            HeapFile::create_sorted(self.store, &staged, field)?;
            self.publish(&staged, &output)?;
            scratch.close()?;
            return Ok(SortOutcome::Sorted(SortReport {
                output,
                records: 0,
                initial_runs: 0,
                merge_passes: 0,
            }));
        }

        // Pass 0: one run per data block
        let initial_runs = data_blocks + data_blocks % 2;
        let mut runs = scratch.create_runs(0, initial_runs)?;
        let mut buffer: Vec<Record> = Vec::with_capacity(MAX_RECORDS);
        for (i, run) in runs.iter().enumerate().take(data_blocks) {
            let block = source.read_block(i as u32 + 1)?;
            buffer.clear();
            for slot in 0..block.filled()? {
                buffer.push(block.record(slot)?);
            }
            merge_sort(&mut buffer, field);
            write_block_run(self.store, run, &buffer)?;
        }
        source.close()?;
        debug!(runs = initial_runs, "generated initial runs");

        // Merge passes
        let mut pass = 0;
        while runs.len() > 1 {
            let pairs = runs.len() / 2;
            let outputs_needed = if pairs > 1 && pairs % 2 == 1 {
                pairs + 1
            } else {
                pairs
            };
            let outputs = scratch.create_runs(pass + 1, outputs_needed)?;

            for (pair, out) in runs.chunks(2).zip(&outputs) {
                let merged = merge_runs(self.store, &pair[0], &pair[1], out, field)?;
                debug!(pass = pass + 1, run = %out, records = merged, "merged runs");

                if self.verify_runs && !run_is_sorted(self.store, &pair[0], field)? {
                    return Err(BlockSortError::CorruptRun(pair[0].clone()));
                }
            }

            scratch.remove_runs(&runs)?;
            runs = outputs;
            pass += 1;
        }

        let records = self.materialize(&runs[0], &staged, field)?;
        self.publish(&staged, &output)?;
        scratch.close()?;

        info!(file = %output, records, passes = pass, "sort finished");
        Ok(SortOutcome::Sorted(SortReport {
            output,
            records,
            initial_runs,
            merge_passes: pass,
        }))
    }

    /// Move a complete staged file over `output`
    ///
    /// A previous output is untouched until the rename.
    fn publish(&self, staged: &str, output: &str) -> Result<()> {
        if self.store.exists(output) {
            warn!(file = output, "replacing previous sort output");
        }
        self.store.rename_file(staged, output)
    }

    /// Create the sorted file and append the final run in order
    fn materialize(&self, run: &str, output: &str, field: Field) -> Result<usize> {
        HeapFile::create_sorted(self.store, output, field)?;
        let mut file = HeapFile::open(self.store, output)?;
        let mut reader = RunReader::open(self.store, run)?;

        let mut records = 0;
        while let Some(record) = reader.take()? {
            file.append(&record)?;
            records += 1;
        }
        file.close()?;
        Ok(records)
    }
}
