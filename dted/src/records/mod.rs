//! Fixed-size DTED header records.
//!
//! A DTED file opens with three records of fixed length, each starting with a
//! literal sentinel:
//!
//! | Record | Size | Sentinel |
//! |--------|------|----------|
//! | [`UserHeaderLabel`] | 80 | `UHL1` |
//! | [`DataSetIdentification`] | 648 | `DSI` |
//! | [`AccuracyDescription`] | 2700 | `ACC` |
//!
//! All sub-fields are ASCII text at fixed byte offsets.

pub mod acc;
pub mod dsi;
pub mod uhl;

use std::str::FromStr;

use crate::bytes::{parse_field, slice};
use crate::error::{FormatError, RecordKind};

pub use acc::AccuracyDescription;
pub use dsi::DataSetIdentification;
pub use uhl::UserHeaderLabel;

/// Grid dimensions: longitude lines (columns) by latitude lines (rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shape {
    pub columns: usize,
    pub rows: usize,
}

impl Shape {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    /// Total number of elevation samples.
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Post spacing in arc-seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interval {
    pub longitude: f64,
    pub latitude: f64,
}

/// Fails unless `bytes` holds at least `size` bytes starting with `sentinel`.
pub(crate) fn check_header(
    bytes: &[u8],
    kind: RecordKind,
    size: usize,
    sentinel: &[u8],
) -> Result<(), FormatError> {
    if bytes.len() < size {
        return Err(FormatError::TruncatedRecord(kind));
    }
    if !bytes.starts_with(sentinel) {
        return Err(FormatError::MissingSentinel(kind));
    }
    Ok(())
}

/// Reads and parses a numeric field at `[start, start + len)`.
pub(crate) fn numeric<T: FromStr>(
    bytes: &[u8],
    kind: RecordKind,
    field: &'static str,
    start: usize,
    len: usize,
) -> Result<T, FormatError> {
    let raw = slice(bytes, start, start + len)?;
    parse_field(raw).ok_or(FormatError::InvalidNumericField(kind, field))
}

/// Reads a numeric field that may legitimately be blank or `NA`.
pub(crate) fn optional_numeric<T: FromStr>(
    bytes: &[u8],
    start: usize,
    len: usize,
) -> Result<Option<T>, FormatError> {
    Ok(parse_field(slice(bytes, start, start + len)?))
}

/// Reads an interval stored in tenths of arc-seconds.
pub(crate) fn interval_field(
    bytes: &[u8],
    kind: RecordKind,
    field: &'static str,
    start: usize,
) -> Result<f64, FormatError> {
    let tenths: u32 = numeric(bytes, kind, field, start, 4)?;
    Ok(tenths as f64 / 10.0)
}
