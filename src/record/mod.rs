//! Record Module
//!
//! Fixed-schema records and field-indexed ordering.
//!
//! ## Responsibilities
//! - Hold one row: id, name, surname, city
//! - Compare two records (or a record and a search value) by one field
//! - Encode/decode a record to/from a block slot (see `codec`)
//!
//! ## Slot Layout (64 bytes)
//! ```text
//! ┌──────────┬───────────────┬───────────────┬───────────────┐
//! │ id (4)   │ name (15)     │ surname (20)  │ city (25)     │
//! │ i32 LE   │ NUL-padded    │ NUL-padded    │ NUL-padded    │
//! └──────────┴───────────────┴───────────────┴───────────────┘
//! ```

pub mod codec;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{BlockSortError, Result};

pub use codec::{decode, encode, RECORD_SIZE};

/// Capacity of the name buffer, including the NUL terminator
pub const NAME_CAPACITY: usize = 15;

/// Capacity of the surname buffer, including the NUL terminator
pub const SURNAME_CAPACITY: usize = 20;

/// Capacity of the city buffer, including the NUL terminator
pub const CITY_CAPACITY: usize = 25;

// =============================================================================
// Field Selector
// =============================================================================

/// Field a file is sorted or searched by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id = 0,
    Name = 1,
    Surname = 2,
    City = 3,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Id, Field::Name, Field::Surname, Field::City];

    /// On-disk field number (0..=3)
    pub fn number(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Surname => "surname",
            Field::City => "city",
        }
    }
}

impl TryFrom<i32> for Field {
    type Error = BlockSortError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Field::Id),
            1 => Ok(Field::Name),
            2 => Ok(Field::Surname),
            3 => Ok(Field::City),
            other => Err(BlockSortError::InvalidField(other as i64)),
        }
    }
}

impl FromStr for Field {
    type Err = BlockSortError;

    /// Accepts either the field number or its name
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return i32::try_from(n)
                .map_err(|_| BlockSortError::InvalidField(n))
                .and_then(Field::try_from);
        }
        Field::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| BlockSortError::InvalidArgument(format!("unknown field '{}'", s)))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Record
// =============================================================================

/// One fixed-schema row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub id: i32,
    name: String,
    surname: String,
    city: String,
}

impl Record {
    /// Build a record, rejecting strings that do not fit their slot
    pub fn new(
        id: i32,
        name: impl Into<String>,
        surname: impl Into<String>,
        city: impl Into<String>,
    ) -> Result<Self> {
        let name = checked_text("name", name.into(), NAME_CAPACITY)?;
        let surname = checked_text("surname", surname.into(), SURNAME_CAPACITY)?;
        let city = checked_text("city", city.into(), CITY_CAPACITY)?;
        Ok(Self {
            id,
            name,
            surname,
            city,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Order two records by `field` (numeric for id, byte-wise for text)
    pub fn compare(&self, other: &Record, field: Field) -> Ordering {
        match field {
            Field::Id => self.id.cmp(&other.id),
            _ => self.text(field).cmp(other.text(field)),
        }
    }

    pub fn less_than(&self, other: &Record, field: Field) -> bool {
        self.compare(other, field) == Ordering::Less
    }

    pub fn equal(&self, other: &Record, field: Field) -> bool {
        self.compare(other, field) == Ordering::Equal
    }

    /// Order this record against a search key's value
    pub fn compare_key(&self, key: &SearchKey) -> Ordering {
        match &key.value {
            FieldValue::Id(id) => self.id.cmp(id),
            FieldValue::Text(text) => self.text(key.field).cmp(text.as_bytes()),
        }
    }

    pub fn less_than_key(&self, key: &SearchKey) -> bool {
        self.compare_key(key) == Ordering::Less
    }

    pub fn equals_key(&self, key: &SearchKey) -> bool {
        self.compare_key(key) == Ordering::Equal
    }

    fn text(&self, field: Field) -> &[u8] {
        match field {
            Field::Name => self.name.as_bytes(),
            Field::Surname => self.surname.as_bytes(),
            Field::City => self.city.as_bytes(),
            Field::Id => &[],
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id: {}, name: {}, surname: {}, city: {}}}",
            self.id, self.name, self.surname, self.city
        )
    }
}

fn checked_text(what: &str, value: String, capacity: usize) -> Result<String> {
    if value.len() >= capacity {
        return Err(BlockSortError::InvalidArgument(format!(
            "{} '{}' is {} bytes, limit is {}",
            what,
            value,
            value.len(),
            capacity - 1
        )));
    }
    if value.as_bytes().contains(&0) {
        return Err(BlockSortError::InvalidArgument(format!(
            "{} contains a NUL byte",
            what
        )));
    }
    Ok(value)
}

// =============================================================================
// Search Keys
// =============================================================================

/// A raw value to compare records against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Id(i32),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Id(id) => write!(f, "{}", id),
            FieldValue::Text(text) => write!(f, "'{}'", text),
        }
    }
}

/// A field paired with a value of the matching type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey {
    field: Field,
    value: FieldValue,
}

impl SearchKey {
    /// Pair a field with a value; the value's type must match the field
    pub fn new(field: Field, value: FieldValue) -> Result<Self> {
        match (field, &value) {
            (Field::Id, FieldValue::Id(_)) => {}
            (Field::Id, FieldValue::Text(_)) => {
                return Err(BlockSortError::InvalidArgument(
                    "id is searched by an integer value".to_string(),
                ))
            }
            (_, FieldValue::Id(_)) => {
                return Err(BlockSortError::InvalidArgument(format!(
                    "{} is searched by a text value",
                    field
                )))
            }
            (_, FieldValue::Text(_)) => {}
        }
        Ok(Self { field, value })
    }

    /// Parse `raw` as the value type `field` expects
    pub fn parse(field: Field, raw: &str) -> Result<Self> {
        let value = match field {
            Field::Id => FieldValue::Id(raw.trim().parse().map_err(|_| {
                BlockSortError::InvalidArgument(format!("'{}' is not a valid id", raw))
            })?),
            _ => FieldValue::Text(raw.to_string()),
        };
        Self::new(field, value)
    }

    pub fn id(id: i32) -> Self {
        Self {
            field: Field::Id,
            value: FieldValue::Id(id),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}
