//! User Header Label (`UHL1`) record.

use crate::bytes::text_field;
use crate::dms::LatitudeLongitude;
use crate::error::{FormatError, RecordKind};

use super::{check_header, interval_field, numeric, optional_numeric, Interval, Shape};

/// Size of the User Header Label in bytes.
pub const UHL_SIZE: usize = 80;

const SENTINEL: &[u8] = b"UHL1";

const LON_ORIGIN: usize = 4;
const LAT_ORIGIN: usize = 12;
const LON_INTERVAL: usize = 20;
const LAT_INTERVAL: usize = 24;
const VERTICAL_ACCURACY: usize = 28;
const SECURITY_CODE: usize = 32;
const REFERENCE: usize = 35;
const COLUMNS: usize = 47;
const ROWS: usize = 51;
const MULTIPLE_ACCURACY: usize = 55;

/// The 80-byte label at the start of every DTED file.
#[derive(Debug, Clone, PartialEq)]
pub struct UserHeaderLabel {
    /// South-west corner of the grid.
    pub origin: LatitudeLongitude,
    /// Post spacing in arc-seconds.
    pub interval: Interval,
    /// Absolute vertical accuracy in meters, absent when the field reads `NA`.
    pub vertical_accuracy: Option<i32>,
    pub security_code: String,
    pub reference: String,
    pub shape: Shape,
    pub multiple_accuracy: bool,
}

impl UserHeaderLabel {
    /// Decode a User Header Label from the first [`UHL_SIZE`] bytes of `bytes`.
    ///
    /// # Errors
    ///
    /// - [`FormatError::TruncatedRecord`] if fewer than 80 bytes are available
    /// - [`FormatError::MissingSentinel`] if the record does not start with `UHL1`
    /// - [`FormatError::InvalidNumericField`] / [`FormatError::InvalidCoordinateFormat`]
    ///   for malformed sub-fields
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        const KIND: RecordKind = RecordKind::Uhl;
        check_header(bytes, KIND, UHL_SIZE, SENTINEL)?;

        let origin = LatitudeLongitude::from_dms(
            &text_field(bytes, LAT_ORIGIN, 8)?,
            &text_field(bytes, LON_ORIGIN, 8)?,
        )?;

        let interval = Interval {
            longitude: interval_field(bytes, KIND, "longitude_interval", LON_INTERVAL)?,
            latitude: interval_field(bytes, KIND, "latitude_interval", LAT_INTERVAL)?,
        };

        let shape = Shape {
            columns: numeric(bytes, KIND, "columns", COLUMNS, 4)?,
            rows: numeric(bytes, KIND, "rows", ROWS, 4)?,
        };

        Ok(Self {
            origin,
            interval,
            vertical_accuracy: optional_numeric(bytes, VERTICAL_ACCURACY, 4)?,
            security_code: text_field(bytes, SECURITY_CODE, 3)?,
            reference: text_field(bytes, REFERENCE, 12)?,
            shape,
            multiple_accuracy: text_field(bytes, MULTIPLE_ACCURACY, 1)? != "0",
        })
    }
}
