//! Two-way run merge
//!
//! Streams two sorted runs into one using three block-sized buffers.

use tracing::debug;

use crate::block::BlockStore;
use crate::error::Result;
use crate::record::Field;

use super::run::{RunReader, RunWriter};

/// Merge runs `input1` and `input2` into the (empty) run `output`
///
/// A record from `input1` is emitted when it is less than or equal to the
/// current record of `input2`, so ties keep `input1` first. Returns the
/// number of records written.
pub(super) fn merge_runs(
    store: &dyn BlockStore,
    input1: &str,
    input2: &str,
    output: &str,
    field: Field,
) -> Result<usize> {
    let mut left = RunReader::open(store, input1)?;
    let mut right = RunReader::open(store, input2)?;
    let mut out = RunWriter::open(store, output)?;

    // Padding run: nothing to merge against
    if right.peek().is_none() {
        debug!(run = input1, "second input empty, copying through");
        copy_through(&mut left, &mut out)?;
        return out.finish();
    }

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => !r.less_than(l, field),
            _ => break,
        };
        let source = if take_left { &mut left } else { &mut right };
        if let Some(record) = source.take()? {
            out.push(record)?;
        }
    }

    // One side is exhausted; drain the other
    copy_through(&mut left, &mut out)?;
    copy_through(&mut right, &mut out)?;

    out.finish()
}

fn copy_through(input: &mut RunReader<'_>, out: &mut RunWriter<'_>) -> Result<()> {
    while let Some(record) = input.take()? {
        out.push(record)?;
    }
    Ok(())
}

/// Check a run is in non-decreasing order by `field`
pub(super) fn run_is_sorted(store: &dyn BlockStore, name: &str, field: Field) -> Result<bool> {
    let mut run = RunReader::open(store, name)?;
    let mut prev = match run.take()? {
        Some(record) => record,
        None => return Ok(true),
    };
    while let Some(record) = run.take()? {
        if record.less_than(&prev, field) {
            debug!(run = run.name(), "run out of order");
            return Ok(false);
        }
        prev = record;
    }
    Ok(true)
}
