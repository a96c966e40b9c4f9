//! Data Set Identification (`DSI`) record.
//!
//! The record is split into a descriptive part (security, product and datum
//! text fields, decoded as-is) and the geographic block starting at
//! [`GEO_BLOCK`], which carries the origin, the four corners, the post
//! spacing and the grid shape.

use crate::bytes::text_field;
use crate::dms::{dms_to_decimal, LatitudeLongitude};
use crate::error::{FormatError, RecordKind};
use crate::geodata::DtedLevel;

use super::{check_header, interval_field, numeric, Interval, Shape};

/// Size of the Data Set Identification record in bytes.
pub const DSI_SIZE: usize = 648;

const SENTINEL: &[u8] = b"DSI";
const KIND: RecordKind = RecordKind::Dsi;

const SECURITY_CODE: usize = 3;
const RELEASE_MARKINGS: usize = 4;
const HANDLING_DESCRIPTION: usize = 6;
const PRODUCT_LEVEL: usize = 59;
const REFERENCE: usize = 64;
const EDITION: usize = 107;
const MERGE_VERSION: usize = 109;
const MAINTENANCE_DATE: usize = 110;
const MERGE_DATE: usize = 114;
const MAINTENANCE_CODE: usize = 118;
const PRODUCER_CODE: usize = 122;
const PRODUCT_SPECIFICATION: usize = 169;
const SPECIFICATION_DATE: usize = 180;
const VERTICAL_DATUM: usize = 184;
const HORIZONTAL_DATUM: usize = 187;
const COLLECTION_SYSTEM: usize = 192;
const COMPILATION_DATE: usize = 202;

/// Start of the geographic block.
pub const GEO_BLOCK: usize = 185;

const ORIGIN_LAT: usize = GEO_BLOCK;
const ORIGIN_LON: usize = GEO_BLOCK + 9;
const SW_LAT: usize = GEO_BLOCK + 19;
const SW_LON: usize = GEO_BLOCK + 26;
const NW_LAT: usize = GEO_BLOCK + 34;
const NW_LON: usize = GEO_BLOCK + 41;
const NE_LAT: usize = GEO_BLOCK + 49;
const NE_LON: usize = GEO_BLOCK + 56;
const SE_LAT: usize = GEO_BLOCK + 64;
const SE_LON: usize = GEO_BLOCK + 71;
const ORIENTATION: usize = GEO_BLOCK + 79;
const LAT_INTERVAL: usize = GEO_BLOCK + 88;
const LON_INTERVAL: usize = GEO_BLOCK + 92;
const ROWS: usize = GEO_BLOCK + 96;
const COLUMNS: usize = GEO_BLOCK + 100;
const COVERAGE: usize = GEO_BLOCK + 104;

/// The 648-byte data set description following the User Header Label.
///
/// Date fields hold the raw `YYMM` text; they are not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSetIdentification {
    pub security_code: String,
    pub release_markings: String,
    pub handling_description: String,
    /// Series designator, e.g. `DTED1`.
    pub product_level: String,
    pub reference: String,
    pub edition: String,
    pub merge_version: String,
    pub maintenance_date: String,
    pub merge_date: String,
    pub maintenance_code: String,
    pub producer_code: String,
    pub product_specification: String,
    pub specification_date: String,
    pub vertical_datum: String,
    pub horizontal_datum: String,
    pub collection_system: String,
    pub compilation_date: String,
    pub origin: LatitudeLongitude,
    pub south_west: LatitudeLongitude,
    pub north_west: LatitudeLongitude,
    pub north_east: LatitudeLongitude,
    pub south_east: LatitudeLongitude,
    /// Clockwise orientation angle in decimal degrees.
    pub orientation: f64,
    pub interval: Interval,
    pub shape: Shape,
    /// Fraction of the cell covered by data, in `(0, 1]`.
    pub coverage: f64,
}

impl DataSetIdentification {
    /// Decode a Data Set Identification record.
    ///
    /// # Errors
    ///
    /// - [`FormatError::TruncatedRecord`] if fewer than 648 bytes are available
    /// - [`FormatError::MissingSentinel`] if the record does not start with `DSI`
    /// - [`FormatError::InvalidNumericField`] / [`FormatError::InvalidCoordinateFormat`]
    ///   for malformed geographic fields
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        check_header(bytes, KIND, DSI_SIZE, SENTINEL)?;

        let corner = |lat: usize, lon: usize| -> Result<LatitudeLongitude, FormatError> {
            LatitudeLongitude::from_dms(&text_field(bytes, lat, 7)?, &text_field(bytes, lon, 8)?)
        };

        let origin = LatitudeLongitude::from_dms(
            &text_field(bytes, ORIGIN_LAT, 9)?,
            &text_field(bytes, ORIGIN_LON, 10)?,
        )?;

        let orientation = dms_to_decimal(&text_field(bytes, ORIENTATION, 9)?)
            .map_err(|_| FormatError::InvalidNumericField(KIND, "orientation"))?;

        // The later offsets hold the longitude values.
        let interval = Interval {
            longitude: interval_field(bytes, KIND, "longitude_interval", LON_INTERVAL)?,
            latitude: interval_field(bytes, KIND, "latitude_interval", LAT_INTERVAL)?,
        };
        let shape = Shape {
            columns: numeric(bytes, KIND, "columns", COLUMNS, 4)?,
            rows: numeric(bytes, KIND, "rows", ROWS, 4)?,
        };

        let coverage_percent: u32 = numeric(bytes, KIND, "coverage", COVERAGE, 2)?;
        let coverage = if coverage_percent == 0 {
            1.0
        } else {
            coverage_percent as f64 / 100.0
        };

        Ok(Self {
            security_code: text_field(bytes, SECURITY_CODE, 1)?,
            release_markings: text_field(bytes, RELEASE_MARKINGS, 2)?,
            handling_description: text_field(bytes, HANDLING_DESCRIPTION, 27)?,
            product_level: text_field(bytes, PRODUCT_LEVEL, 5)?,
            reference: text_field(bytes, REFERENCE, 15)?,
            edition: text_field(bytes, EDITION, 2)?,
            merge_version: text_field(bytes, MERGE_VERSION, 1)?,
            maintenance_date: text_field(bytes, MAINTENANCE_DATE, 4)?,
            merge_date: text_field(bytes, MERGE_DATE, 4)?,
            maintenance_code: text_field(bytes, MAINTENANCE_CODE, 4)?,
            producer_code: text_field(bytes, PRODUCER_CODE, 8)?,
            product_specification: text_field(bytes, PRODUCT_SPECIFICATION, 11)?,
            specification_date: text_field(bytes, SPECIFICATION_DATE, 4)?,
            vertical_datum: text_field(bytes, VERTICAL_DATUM, 3)?,
            horizontal_datum: text_field(bytes, HORIZONTAL_DATUM, 5)?,
            collection_system: text_field(bytes, COLLECTION_SYSTEM, 10)?,
            compilation_date: text_field(bytes, COMPILATION_DATE, 4)?,
            origin,
            south_west: corner(SW_LAT, SW_LON)?,
            north_west: corner(NW_LAT, NW_LON)?,
            north_east: corner(NE_LAT, NE_LON)?,
            south_east: corner(SE_LAT, SE_LON)?,
            orientation,
            interval,
            shape,
            coverage,
        })
    }

    /// The DTED level named by the product level field, if recognised.
    pub fn level(&self) -> Option<DtedLevel> {
        DtedLevel::from_product_level(&self.product_level)
    }

    /// Named corners in header order: south-west, north-west, north-east, south-east.
    pub fn corners(&self) -> [(&'static str, LatitudeLongitude); 4] {
        [
            ("south_west", self.south_west),
            ("north_west", self.north_west),
            ("north_east", self.north_east),
            ("south_east", self.south_east),
        ]
    }
}
