//! DTED file loading and elevation extraction.
//!
//! This module provides [`GeoData`], the decoded contents of one DTED file:
//! the three header records plus the elevation grid, and the point query
//! operations over it.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::block::{block_length, DataBlock, VOID_VALUE};
use crate::bytes::region;
use crate::error::{LoadError, Warning};
use crate::records::acc::ACC_SIZE;
use crate::records::dsi::DSI_SIZE;
use crate::records::uhl::UHL_SIZE;
use crate::records::{AccuracyDescription, DataSetIdentification, Shape, UserHeaderLabel};

/// Combined size of the three header records preceding the data blocks.
pub const HEADER_SIZE: usize = UHL_SIZE + DSI_SIZE + ACC_SIZE;

/// DTED product level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DtedLevel {
    /// Level 0: 30 arc-second (~900m) post spacing
    Level0,
    /// Level 1: 3 arc-second (~90m) post spacing
    Level1,
    /// Level 2: 1 arc-second (~30m) post spacing
    Level2,
}

impl DtedLevel {
    /// All levels, finest first.
    pub const FINEST_FIRST: [DtedLevel; 3] =
        [DtedLevel::Level2, DtedLevel::Level1, DtedLevel::Level0];

    /// Returns the latitude post spacing in arc-seconds.
    pub fn post_spacing_arcsec(&self) -> f64 {
        match self {
            DtedLevel::Level0 => 30.0,
            DtedLevel::Level1 => 3.0,
            DtedLevel::Level2 => 1.0,
        }
    }

    /// Returns the approximate resolution in meters.
    pub fn meters(&self) -> f64 {
        match self {
            DtedLevel::Level0 => 900.0,
            DtedLevel::Level1 => 90.0,
            DtedLevel::Level2 => 30.0,
        }
    }

    /// File extension used for this level (`dt0`, `dt1`, `dt2`).
    pub fn extension(&self) -> &'static str {
        match self {
            DtedLevel::Level0 => "dt0",
            DtedLevel::Level1 => "dt1",
            DtedLevel::Level2 => "dt2",
        }
    }

    /// Parse a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "dt0" => Some(DtedLevel::Level0),
            "dt1" => Some(DtedLevel::Level1),
            "dt2" => Some(DtedLevel::Level2),
            _ => None,
        }
    }

    /// Parse a DSI product level designator such as `DTED1`.
    pub fn from_product_level(text: &str) -> Option<Self> {
        match text.trim() {
            "DTED0" => Some(DtedLevel::Level0),
            "DTED1" => Some(DtedLevel::Level1),
            "DTED2" => Some(DtedLevel::Level2),
            _ => None,
        }
    }

    /// Parse a bare level number (`0`, `1` or `2`).
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            0 => Some(DtedLevel::Level0),
            1 => Some(DtedLevel::Level1),
            2 => Some(DtedLevel::Level2),
            _ => None,
        }
    }
}

impl fmt::Display for DtedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            DtedLevel::Level0 => 0,
            DtedLevel::Level1 => 1,
            DtedLevel::Level2 => 2,
        };
        write!(f, "DTED{}", level)
    }
}

/// Summary statistics over a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElevationStats {
    /// Lowest non-void sample, if any.
    pub min: Option<i16>,
    /// Highest non-void sample, if any.
    pub max: Option<i16>,
    /// Number of samples equal to [`VOID_VALUE`].
    pub void_count: usize,
    /// Total number of samples.
    pub total: usize,
}

/// A fully decoded DTED file.
///
/// Instances are only obtainable through [`GeoData::load`] (or
/// [`GeoData::from_bytes`]), so every accessor sees validated data. The grid
/// is immutable once loaded; a `GeoData` can be shared across threads and
/// queried concurrently.
///
/// # Example
///
/// ```ignore
/// use dted::GeoData;
///
/// let data = GeoData::load("e138/n35.dt1")?;
/// if let Some(elevation) = data.get_elevation(35.5, 138.5) {
///     println!("Elevation: {}m", elevation);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GeoData {
    uhl: UserHeaderLabel,
    dsi: DataSetIdentification,
    acc: AccuracyDescription,
    /// Indexed `[column][row]`, i.e. `[longitude_index][latitude_index]`.
    elevation_grid: Vec<Vec<i16>>,
    source_path: PathBuf,
    warnings: Vec<Warning>,
}

/// Load a DTED file. Shorthand for [`GeoData::load`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<GeoData, LoadError> {
    GeoData::load(path)
}

impl GeoData {
    /// Load and decode a DTED file.
    ///
    /// # Errors
    ///
    /// - [`LoadError::Io`] if the file cannot be opened or read, or is empty
    /// - [`LoadError::Corrupt`] if a header record is malformed or truncated
    /// - [`LoadError::InvalidData`] if an elevation block is malformed or truncated
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path)?;

        if file.metadata()?.len() == 0 {
            return Err(empty_file(path).into());
        }

        // SAFETY: Memory mapping is safe as long as the file is not modified
        // while mapped. The file is opened read-only and the mapping is
        // dropped before this function returns.
        let mmap = unsafe { Mmap::map(&file)? };

        Self::from_bytes(&mmap, path)
    }

    /// Decode a DTED file already held in memory.
    ///
    /// `source` is recorded as [`GeoData::source_path`] and used in warnings.
    pub fn from_bytes<P: Into<PathBuf>>(bytes: &[u8], source: P) -> Result<Self, LoadError> {
        let source_path = source.into();
        if bytes.is_empty() {
            return Err(empty_file(&source_path).into());
        }

        let uhl = UserHeaderLabel::from_bytes(region(bytes, 0, UHL_SIZE))?;
        let dsi = DataSetIdentification::from_bytes(region(bytes, UHL_SIZE, DSI_SIZE))?;
        let acc = AccuracyDescription::from_bytes(region(bytes, UHL_SIZE + DSI_SIZE, ACC_SIZE))?;

        let shape = dsi.shape;
        let block_len = block_length(shape.rows);
        let data = region(bytes, HEADER_SIZE, bytes.len());

        tracing::debug!(
            path = %source_path.display(),
            columns = shape.columns,
            rows = shape.rows,
            level = ?dsi.level(),
            "Decoding DTED data blocks"
        );

        let mut warnings = Vec::new();
        let mut elevation_grid = Vec::with_capacity(shape.columns);
        let mut has_void = false;

        for index in 0..shape.columns {
            let start = index * block_len;
            let block = DataBlock::from_bytes(region(data, start, block_len), index, shape.rows)?;

            if !block.checksum_ok() {
                warnings.push(Warning::ChecksumMismatch {
                    block: index,
                    expected: block.checksum,
                    actual: block.computed_checksum(),
                });
            }
            has_void |= block.has_void();
            elevation_grid.push(block.elevations);
        }

        let coordinates = std::iter::once(("uhl_origin", uhl.origin))
            .chain(std::iter::once(("dsi_origin", dsi.origin)))
            .chain(dsi.corners());
        for (field, coordinate) in coordinates {
            if !coordinate.is_valid() {
                warnings.push(Warning::CoordinateOutOfRange { field, coordinate });
            }
        }

        if has_void {
            warnings.push(Warning::VoidDataDetected(source_path.clone()));
        }

        for warning in &warnings {
            tracing::warn!(path = %source_path.display(), "{}", warning);
        }

        Ok(Self {
            uhl,
            dsi,
            acc,
            elevation_grid,
            source_path,
            warnings,
        })
    }

    /// Returns `true` if the point lies within the south-west / north-east
    /// bounding box. Both bounds are inclusive on both axes.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let sw = self.dsi.south_west;
        let ne = self.dsi.north_east;
        (sw.latitude..=ne.latitude).contains(&lat) && (sw.longitude..=ne.longitude).contains(&lon)
    }

    /// Get the elevation at the specified coordinates.
    ///
    /// This is a nearest-sample lookup: the query is snapped to the closest
    /// grid post and that post's value is returned unmodified. No
    /// interpolation between posts is performed.
    ///
    /// # Arguments
    ///
    /// * `lat` - Latitude in decimal degrees
    /// * `lon` - Longitude in decimal degrees
    ///
    /// # Returns
    ///
    /// The elevation in meters (which may be [`VOID_VALUE`]), or `None` if the
    /// point is outside this file's coverage.
    pub fn get_elevation(&self, lat: f64, lon: f64) -> Option<i32> {
        if !self.contains(lat, lon) {
            return None;
        }

        let shape = self.dsi.shape;
        if shape.is_empty() {
            return None;
        }

        let origin = self.dsi.origin;
        let lon_index = ((lon - origin.longitude) * (shape.columns - 1) as f64).round();
        let lat_index = ((lat - origin.latitude) * (shape.rows - 1) as f64).round();
        if lon_index < 0.0 || lat_index < 0.0 {
            return None;
        }

        self.get_elevation_at(lon_index as usize, lat_index as usize)
            .map(i32::from)
    }

    /// Get the sample at a grid position.
    ///
    /// # Arguments
    ///
    /// * `column` - Longitude index (0 = west edge)
    /// * `row` - Latitude index (0 = south edge)
    pub fn get_elevation_at(&self, column: usize, row: usize) -> Option<i16> {
        self.elevation_grid.get(column)?.get(row).copied()
    }

    /// Min/max over non-void samples and the void count.
    pub fn elevation_stats(&self) -> ElevationStats {
        let mut stats = ElevationStats::default();
        for &sample in self.elevation_grid.iter().flatten() {
            stats.total += 1;
            if sample == VOID_VALUE {
                stats.void_count += 1;
                continue;
            }
            stats.min = Some(stats.min.map_or(sample, |m| m.min(sample)));
            stats.max = Some(stats.max.map_or(sample, |m| m.max(sample)));
        }
        stats
    }

    /// Returns the User Header Label.
    pub fn uhl(&self) -> &UserHeaderLabel {
        &self.uhl
    }

    /// Returns the Data Set Identification record.
    pub fn dsi(&self) -> &DataSetIdentification {
        &self.dsi
    }

    /// Returns the Accuracy Description record.
    pub fn acc(&self) -> &AccuracyDescription {
        &self.acc
    }

    /// Returns the grid, indexed `[column][row]`.
    pub fn elevation_grid(&self) -> &[Vec<i16>] {
        &self.elevation_grid
    }

    /// Returns the grid shape.
    pub fn shape(&self) -> Shape {
        self.dsi.shape
    }

    /// Returns the DTED level named in the header, if recognised.
    pub fn level(&self) -> Option<DtedLevel> {
        self.dsi.level()
    }

    /// Returns the path (or label) this data was loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Non-fatal findings recorded during loading.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns `true` if any sample is [`VOID_VALUE`].
    pub fn has_void_data(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, Warning::VoidDataDetected(_)))
    }
}

fn empty_file(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("{} is empty", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DataBlockError, FormatError, RecordKind};
    use crate::dms::LatitudeLongitude;
    use crate::records::dsi::GEO_BLOCK;
    use crate::test_support::{dted_bytes, put, write_dted_file};
    use tempfile::NamedTempFile;

    /// 2×2 grid over the cell at (0, 0): one post per corner.
    fn unit_grid() -> Vec<Vec<i16>> {
        // [column][row]
        vec![vec![10, 20], vec![30, 40]]
    }

    #[test]
    fn test_load_from_file() {
        let file = NamedTempFile::new().unwrap();
        write_dted_file(file.path(), 35, 138, &unit_grid());

        let data = GeoData::load(file.path()).unwrap();
        assert_eq!(data.shape(), Shape::new(2, 2));
        assert_eq!(data.elevation_grid(), unit_grid().as_slice());
        assert_eq!(data.source_path(), file.path());
        assert_eq!(data.level(), Some(DtedLevel::Level1));
        assert!(data.warnings().is_empty());
    }

    #[test]
    fn test_grid_matches_shape() {
        let grid = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9], vec![0, 0, 0]];
        let data = GeoData::from_bytes(&dted_bytes(10, 20, &grid), "mem").unwrap();

        let shape = data.dsi().shape;
        assert_eq!(data.elevation_grid().len(), shape.columns);
        for column in data.elevation_grid() {
            assert_eq!(column.len(), shape.rows);
        }
        assert_eq!(data.uhl().shape, shape);
    }

    #[test]
    fn test_corner_queries_return_exact_samples() {
        let data = GeoData::from_bytes(&dted_bytes(0, 0, &unit_grid()), "mem").unwrap();

        assert_eq!(data.get_elevation(0.0, 0.0), Some(10));
        assert_eq!(data.get_elevation(1.0, 0.0), Some(20));
        assert_eq!(data.get_elevation(0.0, 1.0), Some(30));
        assert_eq!(data.get_elevation(1.0, 1.0), Some(40));
    }

    #[test]
    fn test_interior_queries_snap_to_nearest() {
        let data = GeoData::from_bytes(&dted_bytes(0, 0, &unit_grid()), "mem").unwrap();

        // Never interpolated: each result is one of the stored samples
        assert_eq!(data.get_elevation(0.4, 0.6), Some(30));
        assert_eq!(data.get_elevation(0.6, 0.4), Some(20));
        assert_eq!(data.get_elevation(0.49, 0.49), Some(10));
        assert_eq!(data.get_elevation(0.51, 0.51), Some(40));
    }

    #[test]
    fn test_containment_inclusive_at_corners() {
        let data = GeoData::from_bytes(&dted_bytes(35, 138, &unit_grid()), "mem").unwrap();

        assert!(data.contains(35.0, 138.0)); // south-west
        assert!(data.contains(36.0, 139.0)); // north-east
        assert!(data.contains(35.0, 139.0));
        assert!(data.contains(36.0, 138.0));
        assert!(data.contains(35.5, 138.5));

        assert!(!data.contains(34.9999, 138.5));
        assert!(!data.contains(36.0001, 138.5));
        assert!(!data.contains(35.5, 137.9999));
        assert!(!data.contains(35.5, 139.0001));
    }

    #[test]
    fn test_outside_coverage_returns_none() {
        let data = GeoData::from_bytes(&dted_bytes(35, 138, &unit_grid()), "mem").unwrap();
        assert_eq!(data.get_elevation(40.0, 138.5), None);
        assert_eq!(data.get_elevation(35.5, -138.5), None);
    }

    #[test]
    fn test_negative_samples() {
        let grid = vec![vec![-100, -1], vec![0, 8848]];
        let data = GeoData::from_bytes(&dted_bytes(0, 0, &grid), "mem").unwrap();
        assert_eq!(data.get_elevation(0.0, 0.0), Some(-100));
        assert_eq!(data.get_elevation(1.0, 0.0), Some(-1));
        assert_eq!(data.get_elevation(1.0, 1.0), Some(8848));
    }

    #[test]
    fn test_void_value_loads_with_single_warning() {
        let grid = vec![vec![VOID_VALUE, 5], vec![VOID_VALUE, VOID_VALUE]];
        let data = GeoData::from_bytes(&dted_bytes(0, 0, &grid), "void.dt1").unwrap();

        let void_warnings: Vec<_> = data
            .warnings()
            .iter()
            .filter(|w| matches!(w, Warning::VoidDataDetected(_)))
            .collect();
        assert_eq!(void_warnings.len(), 1);
        assert_eq!(
            void_warnings[0],
            &Warning::VoidDataDetected(PathBuf::from("void.dt1"))
        );
        assert!(data.has_void_data());
        assert_eq!(data.get_elevation(0.0, 0.0), Some(VOID_VALUE as i32));
    }

    #[test]
    fn test_truncated_in_accuracy_description() {
        let bytes = dted_bytes(0, 0, &unit_grid());
        let cut = UHL_SIZE + DSI_SIZE + 100;

        let err = GeoData::from_bytes(&bytes[..cut], "short").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Corrupt(FormatError::TruncatedRecord(RecordKind::Acc))
        ));
    }

    #[test]
    fn test_truncated_in_each_header() {
        let bytes = dted_bytes(0, 0, &unit_grid());

        let err = GeoData::from_bytes(&bytes[..50], "short").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Corrupt(FormatError::TruncatedRecord(RecordKind::Uhl))
        ));

        let err = GeoData::from_bytes(&bytes[..UHL_SIZE + 10], "short").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Corrupt(FormatError::TruncatedRecord(RecordKind::Dsi))
        ));
    }

    #[test]
    fn test_bad_block_sentinel_reports_index() {
        let grid = vec![vec![1, 2], vec![3, 4], vec![5, 6]];
        let mut bytes = dted_bytes(0, 0, &grid);
        let second_block = HEADER_SIZE + block_length(2);
        bytes[second_block] = 0x00;

        let err = GeoData::from_bytes(&bytes, "bad").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidData(DataBlockError::BadSentinel(1))
        ));
    }

    #[test]
    fn test_missing_block_is_truncated() {
        let grid = vec![vec![1, 2], vec![3, 4]];
        let bytes = dted_bytes(0, 0, &grid);
        let cut = bytes.len() - block_length(2);

        let err = GeoData::from_bytes(&bytes[..cut], "short").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidData(DataBlockError::Truncated(1))
        ));
    }

    #[test]
    fn test_checksum_mismatch_is_warning() {
        let mut bytes = dted_bytes(0, 0, &unit_grid());
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let data = GeoData::from_bytes(&bytes, "mem").unwrap();
        assert!(matches!(
            data.warnings(),
            [Warning::ChecksumMismatch { block: 1, .. }]
        ));
    }

    #[test]
    fn test_corner_out_of_range_is_warning() {
        // North-west corner latitude of 95°
        let mut bytes = dted_bytes(0, 0, &unit_grid());
        put(&mut bytes, UHL_SIZE + GEO_BLOCK + 34, "950000N");

        let data = GeoData::from_bytes(&bytes, "mem").unwrap();
        match data.warnings() {
            [warning @ Warning::CoordinateOutOfRange { field, coordinate }] => {
                assert_eq!(*field, "north_west");
                assert_eq!(*coordinate, LatitudeLongitude::new(95.0, 0.0));
                assert_eq!(warning.to_string(), "north_west out of range: lat=95, lon=0");
            }
            other => panic!("unexpected warnings: {:?}", other),
        }

        // Queries are bounded by the south-west and north-east corners
        assert!(data.contains(0.5, 0.5));
        assert_eq!(data.get_elevation(1.0, 1.0), Some(40));
        assert_eq!(data.get_elevation(0.0, 0.0), Some(10));
    }

    #[test]
    fn test_header_sentinel_failure() {
        let mut bytes = dted_bytes(0, 0, &unit_grid());
        bytes[UHL_SIZE] = b'X';
        let err = GeoData::from_bytes(&bytes, "mem").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Corrupt(FormatError::MissingSentinel(RecordKind::Dsi))
        ));
    }

    #[test]
    fn test_empty_file_is_io_error() {
        let file = NamedTempFile::new().unwrap();
        let err = GeoData::load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load("/nonexistent/e000/n00.dt1").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_elevation_stats() {
        let grid = vec![vec![VOID_VALUE, -5], vec![120, 40]];
        let data = GeoData::from_bytes(&dted_bytes(0, 0, &grid), "mem").unwrap();
        let stats = data.elevation_stats();
        assert_eq!(stats.min, Some(-5));
        assert_eq!(stats.max, Some(120));
        assert_eq!(stats.void_count, 1);
        assert_eq!(stats.total, 4);
    }

    #[test]
    fn test_level_info() {
        assert_eq!(DtedLevel::Level0.post_spacing_arcsec(), 30.0);
        assert_eq!(DtedLevel::Level1.post_spacing_arcsec(), 3.0);
        assert_eq!(DtedLevel::Level2.post_spacing_arcsec(), 1.0);
        assert_eq!(DtedLevel::Level2.meters(), 30.0);
        assert_eq!(DtedLevel::from_extension("DT1"), Some(DtedLevel::Level1));
        assert_eq!(DtedLevel::from_extension("hgt"), None);
        assert_eq!(DtedLevel::from_product_level("DTED2"), Some(DtedLevel::Level2));
        assert_eq!(DtedLevel::Level0.to_string(), "DTED0");
    }

    #[test]
    fn test_geodata_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeoData>();
    }
}
