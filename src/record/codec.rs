//! Record codec
//!
//! Encode/decode a record at a slot of a raw block buffer.

use crate::block::MAX_RECORDS;
use crate::error::{BlockSortError, Result};

use super::{Record, CITY_CAPACITY, NAME_CAPACITY, SURNAME_CAPACITY};

/// Encoded record size: id (4) + name (15) + surname (20) + city (25)
pub const RECORD_SIZE: usize = 4 + NAME_CAPACITY + SURNAME_CAPACITY + CITY_CAPACITY;

const NAME_OFFSET: usize = 4;
const SURNAME_OFFSET: usize = NAME_OFFSET + NAME_CAPACITY;
const CITY_OFFSET: usize = SURNAME_OFFSET + SURNAME_CAPACITY;

/// Write `record` into slot `slot` of `buf`
pub fn encode(record: &Record, slot: usize, buf: &mut [u8]) -> Result<()> {
    let start = slot_start(slot, buf.len())?;
    let out = &mut buf[start..start + RECORD_SIZE];

    out[0..4].copy_from_slice(&record.id.to_le_bytes());
    put_text(&mut out[NAME_OFFSET..SURNAME_OFFSET], record.name());
    put_text(&mut out[SURNAME_OFFSET..CITY_OFFSET], record.surname());
    put_text(&mut out[CITY_OFFSET..RECORD_SIZE], record.city());
    Ok(())
}

/// Read the record stored in slot `slot` of `buf`
pub fn decode(slot: usize, buf: &[u8]) -> Result<Record> {
    let start = slot_start(slot, buf.len())?;
    let raw = &buf[start..start + RECORD_SIZE];

    let id = i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
    let name = get_text(&raw[NAME_OFFSET..SURNAME_OFFSET], slot)?;
    let surname = get_text(&raw[SURNAME_OFFSET..CITY_OFFSET], slot)?;
    let city = get_text(&raw[CITY_OFFSET..RECORD_SIZE], slot)?;

    Record::new(id, name, surname, city)
}

fn slot_start(slot: usize, buf_len: usize) -> Result<usize> {
    if slot >= MAX_RECORDS {
        return Err(BlockSortError::SlotOutOfRange(slot));
    }
    let start = slot * RECORD_SIZE;
    if start + RECORD_SIZE > buf_len {
        return Err(BlockSortError::SlotOutOfRange(slot));
    }
    Ok(start)
}

/// NUL-padded copy; `Record::new` already guarantees the terminator fits
fn put_text(dst: &mut [u8], text: &str) {
    dst.fill(0);
    dst[..text.len()].copy_from_slice(text.as_bytes());
}

fn get_text(src: &[u8], slot: usize) -> Result<String> {
    let end = src.iter().position(|&b| b == 0).ok_or_else(|| {
        BlockSortError::Corruption(format!("unterminated text field in slot {}", slot))
    })?;
    String::from_utf8(src[..end].to_vec()).map_err(|_| {
        BlockSortError::Corruption(format!("non UTF-8 text field in slot {}", slot))
    })
}
