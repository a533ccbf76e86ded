//! CSV ingestion
//!
//! Loads `id,"name","surname","city"` lines into a heap file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{BlockSortError, Result};
use crate::heap::HeapFile;
use crate::record::Record;

/// Parse one CSV line; surrounding quotes and a trailing CR are optional
pub fn parse_record_line(line: &str) -> Result<Record> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
    if fields.len() != 4 {
        return Err(BlockSortError::InvalidArgument(format!(
            "expected 4 fields, got {}: {}",
            fields.len(),
            line
        )));
    }

    let id = fields[0].parse::<i32>().map_err(|_| {
        BlockSortError::InvalidArgument(format!("'{}' is not a valid id", fields[0]))
    })?;

    Record::new(
        id,
        unquote(fields[1]),
        unquote(fields[2]),
        unquote(fields[3]),
    )
}

fn unquote(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

/// Append every record of the CSV file at `path`; returns how many
///
/// Blank lines are skipped. The first malformed line aborts the load with
/// its line number.
pub fn load_csv(file: &mut HeapFile<'_>, path: &Path) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut count = 0;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_record_line(&line).map_err(|e| {
            BlockSortError::InvalidArgument(format!("{}:{}: {}", path.display(), number + 1, e))
        })?;
        file.insert_entry(&record)?;
        count += 1;
    }

    debug!(file = file.name(), path = %path.display(), "csv consumed");
    info!(file = file.name(), records = count, "loaded records");
    Ok(count)
}
