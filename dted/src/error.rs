//! Error types for the DTED library.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::dms::LatitudeLongitude;

/// The fixed-size header records that precede the elevation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// User Header Label (`UHL1`, 80 bytes).
    Uhl,
    /// Data Set Identification (`DSI`, 648 bytes).
    Dsi,
    /// Accuracy Description (`ACC`, 2700 bytes).
    Acc,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Uhl => "User Header Label",
            RecordKind::Dsi => "Data Set Identification",
            RecordKind::Acc => "Accuracy Description",
        };
        f.write_str(name)
    }
}

/// Errors raised while decoding a header record or a coordinate string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The record does not start with its literal sentinel.
    #[error("{0}: missing sentinel")]
    MissingSentinel(RecordKind),

    /// Fewer bytes than the record's fixed size were available.
    #[error("{0}: record truncated")]
    TruncatedRecord(RecordKind),

    /// An ASCII numeric sub-field could not be parsed.
    #[error("{0}: invalid numeric field `{1}`")]
    InvalidNumericField(RecordKind, &'static str),

    /// A degree/minute/second string is malformed.
    #[error("invalid coordinate format: {0:?}")]
    InvalidCoordinateFormat(String),

    /// A byte range reached past the end of the buffer or was inverted.
    #[error("byte range {start}..{end} out of range for buffer of {len} bytes")]
    OutOfRange { start: usize, end: usize, len: usize },
}

/// Errors raised while decoding an elevation data block.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBlockError {
    /// The block's first byte is not `0xAA`.
    #[error("data block {0}: bad sentinel")]
    BadSentinel(usize),

    /// The file ended before the block was complete.
    #[error("data block {0}: truncated")]
    Truncated(usize),
}

/// Errors returned by [`crate::load`] and [`crate::GeoData::from_bytes`].
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file is missing, unreadable or empty.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// One of the header records is malformed.
    #[error("corrupt header: {0}")]
    Corrupt(#[from] FormatError),

    /// One of the elevation data blocks is malformed.
    #[error("invalid elevation data: {0}")]
    InvalidData(#[from] DataBlockError),
}

/// Non-fatal findings recorded while loading a file.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The void value (-32767) appears somewhere in the grid.
    VoidDataDetected(PathBuf),

    /// A header coordinate lies outside ±90° latitude / ±180° longitude.
    CoordinateOutOfRange {
        field: &'static str,
        coordinate: LatitudeLongitude,
    },

    /// A data block's stored checksum disagrees with its contents.
    ChecksumMismatch {
        block: usize,
        expected: u32,
        actual: u32,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::VoidDataDetected(path) => {
                write!(f, "void data detected in {}", path.display())
            }
            Warning::CoordinateOutOfRange { field, coordinate } => write!(
                f,
                "{} out of range: lat={}, lon={}",
                field, coordinate.latitude, coordinate.longitude
            ),
            Warning::ChecksumMismatch {
                block,
                expected,
                actual,
            } => write!(
                f,
                "data block {}: checksum mismatch (stored {}, computed {})",
                block, expected, actual
            ),
        }
    }
}

/// Errors that can occur when working with a directory of DTED tiles.
#[derive(Error, Debug)]
pub enum DtedError {
    /// A tile failed to load.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// IO error outside of tile decoding (archive extraction, env lookup).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Coordinates are outside the geographic range.
    #[error("Coordinates out of bounds: lat={lat}, lon={lon} (valid: lat ±90°, lon ±180°)")]
    OutOfBounds { lat: f64, lon: f64 },

    /// No tile file exists for the requested cell.
    #[error("DTED file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A coordinate supplied by the caller is malformed.
    #[error("Invalid coordinate: {message}")]
    InvalidCoordinate { message: String },

    /// A load that failed while other callers were waiting on the same tile.
    #[error(transparent)]
    Cache(Arc<DtedError>),
}

impl DtedError {
    /// Returns `true` if the error means "no tile on disk for this cell".
    pub fn is_not_found(&self) -> bool {
        match self {
            DtedError::FileNotFound { .. } => true,
            DtedError::Cache(inner) => inner.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias using [`DtedError`].
pub type Result<T> = std::result::Result<T, DtedError>;
