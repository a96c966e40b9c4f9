//! Degree/minute/second coordinate decoding.
//!
//! DTED headers store coordinates as fixed-width ASCII strings of the form
//! `[D]DDMMSS[.S]<hemisphere>`, for example `0351230N` or `1383045.5E`.
//! The hemisphere letter is the final character; `S` and `W` negate the
//! decoded value.

use crate::error::FormatError;

/// Shortest accepted body: one degree digit, two minute digits, two second digits.
const MIN_WIDTH: usize = 5;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatitudeLongitude {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatitudeLongitude {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Decode a latitude/longitude pair from two hemisphere-suffixed DMS strings.
    pub fn from_dms(latitude: &str, longitude: &str) -> Result<Self, FormatError> {
        Ok(Self {
            latitude: parse_coordinate(latitude)?,
            longitude: parse_coordinate(longitude)?,
        })
    }

    /// `true` if latitude is within ±90° and longitude within ±180°.
    ///
    /// Out-of-range positions are still usable; callers treat this as a
    /// warning rather than a failure.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// An unsigned degree/minute/second value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DmsCoordinate {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl DmsCoordinate {
    /// Parse a `[D]DDMMSS[.S]` string (no hemisphere letter).
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidCoordinateFormat(text.to_string());

        let text_trimmed = text.trim();
        if !text_trimmed.is_ascii() || text_trimmed.len() < MIN_WIDTH {
            return Err(invalid());
        }
        let bytes = text_trimmed.as_bytes();
        let len = bytes.len();

        // `SS.S` when a fractional second is present, `SS` otherwise
        let seconds_width = if bytes[len - 2] == b'.' { 4 } else { 2 };
        if len < seconds_width + 3 {
            return Err(invalid());
        }

        let seconds_start = len - seconds_width;
        let minutes_start = seconds_start - 2;

        let degrees = digits(&text_trimmed[..minutes_start]).ok_or_else(invalid)?;
        let minutes = digits(&text_trimmed[minutes_start..seconds_start]).ok_or_else(invalid)?;
        let seconds_text = &text_trimmed[seconds_start..];
        if !seconds_text
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'.')
        {
            return Err(invalid());
        }
        let seconds: f64 = seconds_text.parse().map_err(|_| invalid())?;

        Ok(Self {
            degrees,
            minutes,
            seconds,
        })
    }

    pub fn to_decimal(self) -> f64 {
        self.degrees as f64 + (self.minutes as f64 + self.seconds / 60.0) / 60.0
    }
}

/// Parses an all-digit field; rejects signs and blanks.
fn digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Convert a `[D]DDMMSS[.S]` string without hemisphere into decimal degrees.
///
/// # Examples
///
/// ```
/// use dted::dms::dms_to_decimal;
///
/// let value = dms_to_decimal("0051245").unwrap();
/// assert!((value - 5.2125).abs() < 1e-9);
/// ```
pub fn dms_to_decimal(text: &str) -> Result<f64, FormatError> {
    DmsCoordinate::parse(text).map(DmsCoordinate::to_decimal)
}

/// Convert a hemisphere-suffixed DMS string into signed decimal degrees.
///
/// `S` and `W` negate the value; `N`, `E` or no hemisphere letter leave it
/// positive.
///
/// # Examples
///
/// ```
/// use dted::dms::parse_coordinate;
///
/// assert!((parse_coordinate("0353000N").unwrap() - 35.5).abs() < 1e-9);
/// assert!((parse_coordinate("1383000W").unwrap() + 138.5).abs() < 1e-9);
/// ```
pub fn parse_coordinate(text: &str) -> Result<f64, FormatError> {
    let trimmed = text.trim();
    let (body, sign) = match trimmed.chars().last() {
        Some('N' | 'n' | 'E' | 'e') => (&trimmed[..trimmed.len() - 1], 1.0),
        Some('S' | 's' | 'W' | 'w') => (&trimmed[..trimmed.len() - 1], -1.0),
        _ => (trimmed, 1.0),
    };

    let value = dms_to_decimal(body)
        .map_err(|_| FormatError::InvalidCoordinateFormat(text.to_string()))?;
    Ok(sign * value)
}
