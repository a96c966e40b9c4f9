//! Accuracy Description (`ACC`) record.

use crate::error::{FormatError, RecordKind};

use super::{check_header, optional_numeric};

/// Size of the Accuracy Description record in bytes.
pub const ACC_SIZE: usize = 2700;

const SENTINEL: &[u8] = b"ACC";

const ABSOLUTE_HORIZONTAL: usize = 3;
const ABSOLUTE_VERTICAL: usize = 7;
const RELATIVE_HORIZONTAL: usize = 11;
const RELATIVE_VERTICAL: usize = 15;

/// Accuracy figures in meters (90% linear/circular error).
///
/// Each figure is `None` when the file marks it as not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccuracyDescription {
    pub absolute_horizontal: Option<i32>,
    pub absolute_vertical: Option<i32>,
    pub relative_horizontal: Option<i32>,
    pub relative_vertical: Option<i32>,
}

impl AccuracyDescription {
    /// Decode an Accuracy Description record.
    ///
    /// Only the four leading accuracy figures are decoded; the remainder of
    /// the 2700-byte record (accuracy sub-region outlines) is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        check_header(bytes, RecordKind::Acc, ACC_SIZE, SENTINEL)?;

        Ok(Self {
            absolute_horizontal: optional_numeric(bytes, ABSOLUTE_HORIZONTAL, 4)?,
            absolute_vertical: optional_numeric(bytes, ABSOLUTE_VERTICAL, 4)?,
            relative_horizontal: optional_numeric(bytes, RELATIVE_HORIZONTAL, 4)?,
            relative_vertical: optional_numeric(bytes, RELATIVE_VERTICAL, 4)?,
        })
    }
}
