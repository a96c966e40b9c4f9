//! Bounds-checked access to regions of a raw byte buffer.
//!
//! Every record parser reads its fields through these helpers so that
//! truncated input surfaces as an error instead of an indexing panic.

use std::str::FromStr;

use crate::error::FormatError;

/// Returns the byte range `[start, end)` of `buffer`.
///
/// # Errors
///
/// Returns [`FormatError::OutOfRange`] if `end > buffer.len()` or `start > end`.
///
/// # Examples
///
/// ```
/// use dted::bytes::slice;
///
/// let data = b"UHL1abcd";
/// assert_eq!(slice(data, 0, 4).unwrap(), b"UHL1");
/// assert!(slice(data, 4, 9).is_err());
/// ```
pub fn slice(buffer: &[u8], start: usize, end: usize) -> Result<&[u8], FormatError> {
    if start > end || end > buffer.len() {
        return Err(FormatError::OutOfRange {
            start,
            end,
            len: buffer.len(),
        });
    }
    Ok(&buffer[start..end])
}

/// Returns up to `len` bytes starting at `start`, clamped to the buffer.
///
/// A short (or empty) result is not an error here; the caller decides
/// whether the available bytes are enough.
pub fn region(buffer: &[u8], start: usize, len: usize) -> &[u8] {
    let start = start.min(buffer.len());
    let end = start.saturating_add(len).min(buffer.len());
    &buffer[start..end]
}

/// Decodes a fixed-width field as text, replacing any non-ASCII bytes.
pub fn ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

/// Reads `[start, start + len)` as text.
pub fn text_field(buffer: &[u8], start: usize, len: usize) -> Result<String, FormatError> {
    slice(buffer, start, start + len).map(ascii)
}

/// Parses a fixed-width ASCII numeric field, ignoring surrounding blanks.
///
/// Returns `None` when the field does not hold a valid number of type `T`.
pub fn parse_field<T: FromStr>(bytes: &[u8]) -> Option<T> {
    std::str::from_utf8(bytes).ok()?.trim().parse().ok()
}
