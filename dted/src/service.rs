//! DTED elevation service with LRU caching.
//!
//! This module provides [`DtedService`], a high-level interface for querying
//! elevation over a directory of DTED tiles, with automatic tile loading and
//! caching.
//!
//! Tiles are looked up in the standard nested layout (`e138/n35.dt1`). When a
//! tile is missing but a sibling archive (`e138/n35.dt1.zip`) exists, the
//! archive is extracted in place before loading.
//!
//! ```ignore
//! use dted::DtedServiceBuilder;
//!
//! let service = DtedServiceBuilder::new("/data/dted")
//!     .cache_size(50)
//!     .build();
//!
//! let elevation = service.get_elevation(35.5, 138.5)?;
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use moka::sync::Cache;

use crate::block::VOID_VALUE;
use crate::error::{DtedError, Result};
use crate::filename::{coords_to_path, is_valid_dted_coord, path_level, path_to_lat_lon};
use crate::geodata::{DtedLevel, GeoData};

const DEFAULT_CACHE_SIZE: u64 = 100;

/// Statistics about cache usage.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of tiles currently in the cache.
    pub entry_count: u64,
    /// Number of cache hits (requests served from cache).
    pub hit_count: u64,
    /// Number of cache misses.
    pub miss_count: u64,
    /// Number of tiles decoded from disk.
    pub load_count: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0).
    ///
    /// Returns 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

/// A geographic bounding box for filtering tiles during preload.
///
/// Coordinates are in decimal degrees.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    /// Minimum latitude (southern boundary).
    pub min_lat: f64,
    /// Minimum longitude (western boundary).
    pub min_lon: f64,
    /// Maximum latitude (northern boundary).
    pub max_lat: f64,
    /// Maximum longitude (eastern boundary).
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Check if this bounding box overlaps with a 1°×1° tile.
    ///
    /// A tile at `(tile_lat, tile_lon)` covers the area
    /// `[tile_lat, tile_lat+1) × [tile_lon, tile_lon+1)`.
    pub fn overlaps_tile(&self, tile_lat: i32, tile_lon: i32) -> bool {
        let tile_max_lat = tile_lat + 1;
        let tile_max_lon = tile_lon + 1;

        self.min_lat < tile_max_lat as f64
            && self.max_lat > tile_lat as f64
            && self.min_lon < tile_max_lon as f64
            && self.max_lon > tile_lon as f64
    }
}

/// Statistics from a preload operation.
#[derive(Debug, Clone, Default)]
pub struct PreloadStats {
    /// Number of tiles successfully loaded into cache.
    pub tiles_loaded: u64,
    /// Number of tiles that were already in cache.
    pub tiles_already_cached: u64,
    /// Number of tiles that failed to load.
    pub tiles_failed: u64,
    /// Number of tiles that matched the bounding box filter.
    pub tiles_matched: u64,
    /// Total elapsed time in milliseconds.
    pub elapsed_ms: u64,
}

/// High-level DTED elevation service with automatic tile caching.
///
/// Each query is routed to the tile containing it; tiles are decoded
/// on first use and kept in an LRU cache. Concurrent queries for a tile that
/// is not yet cached share one load.
///
/// # Example
///
/// ```ignore
/// use dted::DtedService;
///
/// let service = DtedService::new("/path/to/dted", 100);
///
/// let elevation = service.get_elevation(35.3606, 138.7274)?;
/// let stats = service.cache_stats();
/// println!("Cache hit rate: {:.1}%", stats.hit_rate() * 100.0);
/// ```
pub struct DtedService {
    /// Root of the tile tree.
    data_dir: PathBuf,
    /// Levels to try, in order, when resolving a tile path.
    levels: Vec<DtedLevel>,
    /// LRU cache of loaded tiles, keyed by (floor_lat, floor_lon).
    tile_cache: Cache<(i32, i32), Arc<GeoData>>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    load_count: AtomicU64,
}

impl DtedService {
    /// Create a new DTED service that prefers the finest level available.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Root directory of the tile tree
    /// * `cache_size` - Maximum number of tiles to keep in memory
    pub fn new<P: AsRef<Path>>(data_dir: P, cache_size: u64) -> Self {
        DtedServiceBuilder::new(data_dir)
            .cache_size(cache_size)
            .build()
    }

    /// Create a builder for more configuration options.
    pub fn builder<P: AsRef<Path>>(data_dir: P) -> DtedServiceBuilder {
        DtedServiceBuilder::new(data_dir)
    }

    /// Get elevation for the given coordinates using nearest-neighbor lookup.
    ///
    /// A point is routed to the tile whose south-west corner is
    /// `(floor(lat), floor(lon))`. Points on a tile's north or east edge also
    /// belong to the neighbouring tile; when the floored tile is missing, the
    /// south and west neighbours are tried.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(elevation))` - elevation in meters
    /// - `Ok(None)` - void data, missing tile, or point outside the tile's coverage
    /// - `Err(...)` - coordinates out of range, corrupted file, or I/O error
    pub fn get_elevation(&self, lat: f64, lon: f64) -> Result<Option<i32>> {
        if !is_valid_dted_coord(lat, lon) {
            return Err(DtedError::OutOfBounds { lat, lon });
        }

        for key in tile_keys(lat, lon) {
            match self.load_tile(key) {
                Ok(tile) => {
                    return Ok(tile
                        .get_elevation(lat, lon)
                        .filter(|&v| v != i32::from(VOID_VALUE)))
                }
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    /// Get elevations for a batch of coordinates.
    ///
    /// Coordinates are grouped by tile so that each unique tile is loaded only
    /// once, regardless of how many coordinates fall within it.
    ///
    /// Returns one value per input coordinate, using `default` for void data,
    /// missing tiles, or errors.
    ///
    /// # Arguments
    ///
    /// * `coords` - Slice of (latitude, longitude) pairs
    /// * `default` - Default value for void/missing/error results
    pub fn get_elevations_batch(&self, coords: &[(f64, f64)], default: i32) -> Vec<i32> {
        let mut results = vec![default; coords.len()];

        let mut groups: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
        for (i, &(lat, lon)) in coords.iter().enumerate() {
            if !is_valid_dted_coord(lat, lon) {
                continue;
            }
            let key = (lat.floor() as i32, lon.floor() as i32);
            groups.entry(key).or_default().push(i);
        }

        for (key, indices) in &groups {
            let tile = match self.load_tile(*key) {
                Ok(t) => t,
                Err(e) => {
                    // Edge points may still be served by a neighbour
                    if e.is_not_found() {
                        for &i in indices {
                            let (lat, lon) = coords[i];
                            if tile_keys(lat, lon).len() > 1 {
                                if let Ok(Some(v)) = self.get_elevation(lat, lon) {
                                    results[i] = v;
                                }
                            }
                        }
                    }
                    continue;
                }
            };

            for &i in indices {
                let (lat, lon) = coords[i];
                if let Some(v) = tile.get_elevation(lat, lon) {
                    if v != i32::from(VOID_VALUE) {
                        results[i] = v;
                    }
                }
            }
        }

        results
    }

    /// Load a tile from cache or disk.
    pub fn load_tile(&self, key: (i32, i32)) -> Result<Arc<GeoData>> {
        if let Some(tile) = self.tile_cache.get(&key) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            return Ok(tile);
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);

        // Concurrent misses on the same key wait for a single read
        self.tile_cache
            .try_get_with(key, || self.read_tile(key))
            .map_err(|e| Arc::try_unwrap(e).unwrap_or_else(DtedError::Cache))
    }

    fn read_tile(&self, key: (i32, i32)) -> Result<Arc<GeoData>> {
        let path = self.resolve_tile_path(key)?;
        tracing::debug!(path = %path.display(), "Loading DTED tile");

        let tile = GeoData::load(&path)?;
        self.load_count.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::new(tile))
    }

    /// Find the tile file for `key`, extracting it from a `.zip` if needed.
    fn resolve_tile_path(&self, key: (i32, i32)) -> Result<PathBuf> {
        for &level in &self.levels {
            let path = self.data_dir.join(coords_to_path(key.0, key.1, level));
            if path.exists() {
                return Ok(path);
            }

            let zip_path = zip_sibling(&path);
            if zip_path.exists() {
                extract_tile_from_zip(&zip_path, &path)?;
                return Ok(path);
            }
        }

        let level = self.levels.first().copied().unwrap_or(DtedLevel::Level1);
        Err(DtedError::FileNotFound {
            path: self.data_dir.join(coords_to_path(key.0, key.1, level)),
        })
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.tile_cache.entry_count(),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            load_count: self.load_count.load(Ordering::Relaxed),
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Levels tried, in order, when resolving a tile.
    pub fn levels(&self) -> &[DtedLevel] {
        &self.levels
    }

    /// Get the maximum cache size.
    pub fn cache_capacity(&self) -> u64 {
        self.tile_cache.policy().max_capacity().unwrap_or(0)
    }

    /// Invalidate (remove) a specific tile from the cache.
    ///
    /// Accepts a tile path (e.g., `e138/n35.dt1`) and parses the coordinates
    /// to find the cache entry.
    pub fn invalidate_tile<P: AsRef<Path>>(&self, path: P) {
        if let Some(key) = path_to_lat_lon(path) {
            self.tile_cache.invalidate(&key);
        }
    }

    /// Clear all tiles from the cache.
    pub fn clear_cache(&self) {
        self.tile_cache.invalidate_all();
    }

    /// Scan the data directory for tiles in the nested layout.
    ///
    /// Returns a sorted, deduplicated list of tile paths relative to the data
    /// directory (e.g., `["e138/n35.dt1"]`). Archived tiles (`.dt1.zip`) are
    /// listed under their extracted name.
    pub fn scan_tile_files(&self) -> Vec<PathBuf> {
        let mut paths = HashSet::new();

        let dirs = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        for dir in dirs.flatten() {
            let dir_name = dir.file_name();
            if !dir.path().is_dir() {
                continue;
            }
            let Ok(files) = fs::read_dir(dir.path()) else {
                continue;
            };

            for file in files.flatten() {
                let name = file.file_name();
                let name = name.to_string_lossy();
                let name = name.strip_suffix(".zip").unwrap_or(&name);

                let relative = Path::new(&dir_name).join(name);
                if path_level(&relative).is_some() && path_to_lat_lon(&relative).is_some() {
                    paths.insert(relative);
                }
            }
        }

        let mut result: Vec<PathBuf> = paths.into_iter().collect();
        result.sort();
        result
    }

    /// Preload tiles into the LRU cache.
    ///
    /// Scans the data directory and loads the discovered tiles, optionally
    /// only those overlapping at least one of `bounds`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use dted::{DtedService, BoundingBox};
    ///
    /// let service = DtedService::new("/data/dted", 100);
    /// let alps = BoundingBox::new(45.0, 5.0, 48.0, 11.0);
    /// let stats = service.preload(Some(&[alps]));
    /// ```
    pub fn preload(&self, bounds: Option<&[BoundingBox]>) -> PreloadStats {
        let start = Instant::now();
        let mut stats = PreloadStats::default();

        let mut keys: Vec<(i32, i32)> = self
            .scan_tile_files()
            .iter()
            .filter_map(path_to_lat_lon)
            .collect();
        // Several levels of one cell share a cache entry
        keys.dedup();

        for key in keys {
            if let Some(boxes) = bounds {
                if !boxes.iter().any(|b| b.overlaps_tile(key.0, key.1)) {
                    continue;
                }
            }

            stats.tiles_matched += 1;

            if self.tile_cache.contains_key(&key) {
                stats.tiles_already_cached += 1;
                continue;
            }

            match self.load_tile(key) {
                Ok(_) => stats.tiles_loaded += 1,
                Err(e) => {
                    tracing::warn!(lat = key.0, lon = key.1, error = %e, "Failed to preload tile");
                    stats.tiles_failed += 1;
                }
            }
        }

        stats.elapsed_ms = start.elapsed().as_millis() as u64;
        stats
    }
}

/// Tiles that may hold `(lat, lon)`, floored tile first.
///
/// Integral coordinates sit on a shared edge, so the tile to the south
/// and/or west is listed as well.
fn tile_keys(lat: f64, lon: f64) -> Vec<(i32, i32)> {
    let key = (lat.floor() as i32, lon.floor() as i32);
    let lats = if lat.fract() == 0.0 && key.0 > -90 {
        vec![key.0, key.0 - 1]
    } else {
        vec![key.0]
    };
    let lons = if lon.fract() == 0.0 && key.1 > -180 {
        vec![key.1, key.1 - 1]
    } else {
        vec![key.1]
    };

    lats.iter()
        .flat_map(|&la| lons.iter().map(move |&lo| (la, lo)))
        .collect()
}

/// `e138/n35.dt1` → `e138/n35.dt1.zip`
fn zip_sibling(path: &Path) -> PathBuf {
    let mut zip = path.as_os_str().to_owned();
    zip.push(".zip");
    PathBuf::from(zip)
}

/// Extract the tile file from a local archive next to where it belongs.
fn extract_tile_from_zip(zip_path: &Path, out_path: &Path) -> Result<()> {
    let invalid = |e: zip::result::ZipError| {
        DtedError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    };

    let file = fs::File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(invalid)?;

    let wanted_ext = out_path.extension().and_then(|e| e.to_str());

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(invalid)?;
        let entry_ext = Path::new(entry.name())
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        if entry.is_file() && entry_ext.as_deref() == wanted_ext {
            // Only a fully verified copy reaches `out_path`
            let dir = out_path.parent().unwrap_or_else(|| Path::new("."));
            let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
            std::io::copy(&mut entry, &mut tmp)?;
            tmp.persist(out_path).map_err(|e| e.error)?;
            tracing::debug!(
                archive = %zip_path.display(),
                path = %out_path.display(),
                "Extracted DTED tile"
            );
            return Ok(());
        }
    }

    Err(DtedError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("No DTED file found in {}", zip_path.display()),
    )))
}

/// Builder for creating [`DtedService`] with custom configuration.
///
/// # Example
///
/// ```ignore
/// use dted::{DtedLevel, DtedServiceBuilder};
///
/// let service = DtedServiceBuilder::new("/data/dted")
///     .cache_size(100)
///     .level(DtedLevel::Level1)
///     .build();
/// ```
pub struct DtedServiceBuilder {
    data_dir: PathBuf,
    cache_size: u64,
    levels: Vec<DtedLevel>,
}

impl DtedServiceBuilder {
    /// Create a new builder with the specified data directory.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            cache_size: DEFAULT_CACHE_SIZE,
            levels: DtedLevel::FINEST_FIRST.to_vec(),
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `DTED_DATA_DIR` | Root of the tile tree | Required |
    /// | `DTED_CACHE_SIZE` | Maximum tiles in cache | 100 |
    /// | `DTED_LEVEL` | Only use this level (`0`, `1` or `2`) | finest available |
    ///
    /// # Errors
    ///
    /// Returns an error if `DTED_DATA_DIR` is not set.
    pub fn from_env() -> Result<Self> {
        let data_dir = std::env::var("DTED_DATA_DIR").map_err(|_| {
            DtedError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "DTED_DATA_DIR environment variable not set",
            ))
        })?;

        let cache_size: u64 = std::env::var("DTED_CACHE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CACHE_SIZE);

        let mut builder = Self::new(data_dir).cache_size(cache_size);

        if let Some(level) = std::env::var("DTED_LEVEL")
            .ok()
            .and_then(|s| s.trim().parse::<u8>().ok())
            .and_then(DtedLevel::from_number)
        {
            builder = builder.level(level);
        }

        Ok(builder)
    }

    /// Set the data directory.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set the maximum number of tiles to cache.
    pub fn cache_size(mut self, size: u64) -> Self {
        self.cache_size = size;
        self
    }

    /// Only resolve tiles of the given level.
    pub fn level(mut self, level: DtedLevel) -> Self {
        self.levels = vec![level];
        self
    }

    /// Build the [`DtedService`].
    pub fn build(self) -> DtedService {
        DtedService {
            data_dir: self.data_dir,
            levels: self.levels,
            tile_cache: Cache::builder().max_capacity(self.cache_size).build(),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            load_count: AtomicU64::new(0),
        }
    }
}
