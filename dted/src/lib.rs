//! # DTED - Digital Terrain Elevation Data decoder
//!
//! Library for reading elevation from DTED Level 0, 1 and 2 files and for
//! serving nearest-neighbor elevation queries over a directory of tiles.
//!
//! ## Features
//!
//! - **Strict decoding**: every header sentinel, record length and data block
//!   is checked; corrupted files are rejected with a typed error
//! - **Warnings, not failures**: void samples, out-of-range header coordinates
//!   and checksum mismatches are reported on the decoded tile
//! - **Tile service**: on-demand loading with an LRU cache, shared across threads
//! - **Offline**: works with local files, including zipped tiles
//!
//! ## Quick Start
//!
//! ```ignore
//! use dted::GeoData;
//!
//! let tile = GeoData::load("/data/dted/e138/n35.dt1")?;
//! if tile.contains(35.36, 138.73) {
//!     println!("Elevation: {:?}m", tile.get_elevation(35.36, 138.73));
//! }
//! for warning in tile.warnings() {
//!     eprintln!("warning: {}", warning);
//! }
//! ```
//!
//! ## DTED File Layout
//!
//! | Part | Size |
//! |------|------|
//! | User Header Label (`UHL1`) | 80 |
//! | Data Set Identification (`DSI`) | 648 |
//! | Accuracy Description (`ACC`) | 2700 |
//! | Data blocks, one per column | 12 + 2 × rows each |
//!
//! Each sample is a big-endian 16-bit sign-magnitude integer in meters.
//! The value -32767 marks void data.

pub mod block;
pub mod bytes;
pub mod dms;
pub mod error;
pub mod filename;
pub mod geodata;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod records;
pub mod service;

#[cfg(test)]
mod test_support;

// Re-export main types at crate root for convenience
pub use block::{DataBlock, VOID_VALUE};
pub use dms::LatitudeLongitude;
pub use error::{
    DataBlockError, DtedError, FormatError, LoadError, RecordKind, Result, Warning,
};
pub use geodata::{load, DtedLevel, ElevationStats, GeoData};
pub use records::{AccuracyDescription, DataSetIdentification, Interval, Shape, UserHeaderLabel};
pub use service::{BoundingBox, CacheStats, DtedService, DtedServiceBuilder, PreloadStats};
