//! Elevation data block decoding.
//!
//! Each longitude line (grid column) is stored as one fixed-length block:
//!
//! | Offset | Size | Content |
//! |--------|------|---------|
//! | 0 | 1 | sentinel `0xAA` |
//! | 1 | 3 | block sequence number |
//! | 4 | 2 | longitude count |
//! | 6 | 2 | latitude count |
//! | 8 | 2 × rows | elevations, south to north |
//! | 8 + 2 × rows | 4 | checksum |
//!
//! Elevations are big-endian 16-bit sign-magnitude integers: the top bit is
//! the sign and the remaining 15 bits the magnitude.

use crate::bytes::slice;
use crate::error::DataBlockError;

/// First byte of every data block.
pub const BLOCK_SENTINEL: u8 = 0xAA;

/// Elevation value meaning "no data" (typically open water).
pub const VOID_VALUE: i16 = -32767;

const HEADER_LEN: usize = 8;
const CHECKSUM_LEN: usize = 4;

/// Length in bytes of one data block holding `rows` samples.
pub fn block_length(rows: usize) -> usize {
    HEADER_LEN + 2 * rows + CHECKSUM_LEN
}

/// Convert a sign-magnitude sample read as a native `i16` into its value.
///
/// Values read as negative have the sign bit set; `-32768 - v` strips the
/// sign bit and negates the magnitude. Non-negative values are unchanged.
///
/// # Examples
///
/// ```
/// use dted::block::sign_magnitude_to_i16;
///
/// assert_eq!(sign_magnitude_to_i16(1234), 1234);
/// // 0x8001 is "-1" in sign-magnitude
/// assert_eq!(sign_magnitude_to_i16(-32767), -1);
/// // 0xFFFF is the void value
/// assert_eq!(sign_magnitude_to_i16(-1), -32767);
/// ```
pub fn sign_magnitude_to_i16(v: i16) -> i16 {
    if v < 0 {
        (-32768i32 - v as i32) as i16
    } else {
        v
    }
}

/// One decoded grid column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    /// Block sequence number as stored in the header.
    pub sequence: u32,
    pub longitude_count: u16,
    pub latitude_count: u16,
    /// Elevations in meters, south to north.
    pub elevations: Vec<i16>,
    /// Checksum stored in the block trailer.
    pub checksum: u32,
    computed_checksum: u32,
}

impl DataBlock {
    /// Decode the block at position `index` holding `rows` samples.
    ///
    /// Only the first [`block_length`]`(rows)` bytes of `bytes` are read.
    ///
    /// # Errors
    ///
    /// - [`DataBlockError::Truncated`] if fewer bytes than the block length remain
    /// - [`DataBlockError::BadSentinel`] if the first byte is not `0xAA`
    pub fn from_bytes(bytes: &[u8], index: usize, rows: usize) -> Result<Self, DataBlockError> {
        let len = block_length(rows);
        let block = slice(bytes, 0, len).map_err(|_| DataBlockError::Truncated(index))?;

        if block[0] != BLOCK_SENTINEL {
            return Err(DataBlockError::BadSentinel(index));
        }

        let sequence = u32::from_be_bytes([0, block[1], block[2], block[3]]);
        let longitude_count = u16::from_be_bytes([block[4], block[5]]);
        let latitude_count = u16::from_be_bytes([block[6], block[7]]);

        let payload = slice(block, HEADER_LEN, len - CHECKSUM_LEN)
            .map_err(|_| DataBlockError::Truncated(index))?;
        let elevations = payload
            .chunks_exact(2)
            .map(|pair| sign_magnitude_to_i16(i16::from_be_bytes([pair[0], pair[1]])))
            .collect();

        let trailer = &block[len - CHECKSUM_LEN..];
        let checksum = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);

        Ok(Self {
            sequence,
            longitude_count,
            latitude_count,
            elevations,
            checksum,
            computed_checksum: checksum_of(&block[..len - CHECKSUM_LEN]),
        })
    }

    /// Sum of all bytes preceding the trailer.
    pub fn computed_checksum(&self) -> u32 {
        self.computed_checksum
    }

    /// `true` if the stored checksum matches the block contents.
    pub fn checksum_ok(&self) -> bool {
        self.checksum == self.computed_checksum
    }

    /// `true` if any sample carries [`VOID_VALUE`].
    pub fn has_void(&self) -> bool {
        self.elevations.contains(&VOID_VALUE)
    }
}

/// Wrapping byte sum used by the block trailer.
pub(crate) fn checksum_of(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |sum, &b| sum.wrapping_add(b as u32))
}
