//! DTED tile path utilities.
//!
//! This module provides functions for converting between coordinates and
//! DTED tile paths.
//!
//! # Layout
//!
//! DTED distributions store one file per 1° × 1° cell, grouped into one
//! directory per longitude:
//!
//! ```text
//! <root>/e138/n35.dt1
//! <root>/w078/s13.dt2
//! ```
//!
//! - Longitude directory: `e`/`w` followed by 3 digits
//! - Latitude file: `n`/`s` followed by 2 digits, extension `dt0`, `dt1` or `dt2`
//!
//! Flat names such as `n35_e138_1arc_v3.dt2` are also recognised when
//! parsing. The path names the **south-west corner** of the cell.

use std::path::{Path, PathBuf};

use crate::geodata::DtedLevel;

/// Convert latitude and longitude to the relative path of the containing tile.
///
/// # Arguments
///
/// * `lat` - Latitude in decimal degrees (-90 to 90)
/// * `lon` - Longitude in decimal degrees (-180 to 180)
/// * `level` - DTED level, which selects the file extension
///
/// # Examples
///
/// ```
/// use dted::filename::lat_lon_to_path;
/// use dted::DtedLevel;
/// use std::path::PathBuf;
///
/// assert_eq!(lat_lon_to_path(35.5, 138.7, DtedLevel::Level1), PathBuf::from("e138/n35.dt1"));
/// assert_eq!(lat_lon_to_path(-12.3, -77.1, DtedLevel::Level2), PathBuf::from("w078/s13.dt2"));
/// ```
pub fn lat_lon_to_path(lat: f64, lon: f64, level: DtedLevel) -> PathBuf {
    coords_to_path(lat.floor() as i32, lon.floor() as i32, level)
}

/// Relative path of the tile whose south-west corner is `(lat, lon)`.
pub fn coords_to_path(lat: i32, lon: i32, level: DtedLevel) -> PathBuf {
    let lat_prefix = if lat >= 0 { 'n' } else { 's' };
    let lon_prefix = if lon >= 0 { 'e' } else { 'w' };

    PathBuf::from(format!("{}{:03}", lon_prefix, lon.abs())).join(format!(
        "{}{:02}.{}",
        lat_prefix,
        lat.abs(),
        level.extension()
    ))
}

/// Parse a tile path to extract the south-west corner coordinates.
///
/// # Returns
///
/// The (latitude, longitude) of the south-west corner, or `None` if the path
/// does not follow either the nested or the flat naming convention.
///
/// # Examples
///
/// ```
/// use dted::filename::path_to_lat_lon;
///
/// assert_eq!(path_to_lat_lon("e138/n35.dt1"), Some((35, 138)));
/// assert_eq!(path_to_lat_lon("/data/dted/w078/s13.dt2"), Some((-13, -78)));
/// assert_eq!(path_to_lat_lon("n35_e138_1arc_v3.dt2"), Some((35, 138)));
/// assert_eq!(path_to_lat_lon("invalid"), None);
/// ```
pub fn path_to_lat_lon<P: AsRef<Path>>(path: P) -> Option<(i32, i32)> {
    let path = path.as_ref();
    let stem = path.file_stem()?.to_str()?.to_ascii_lowercase();

    // Flat form: n35_e138[_...]
    let mut parts = stem.split('_');
    if let (Some(first), Some(second)) = (parts.next(), parts.next()) {
        if let (Some(lat), Some(lon)) = (parse_lat(first), parse_lon(second)) {
            return Some((lat, lon));
        }
    }

    // Nested form: e138/n35
    let lat = parse_lat(&stem)?;
    let dir = path.parent()?.file_name()?.to_str()?.to_ascii_lowercase();
    let lon = parse_lon(&dir)?;
    Some((lat, lon))
}

/// The DTED level implied by a path's extension.
pub fn path_level<P: AsRef<Path>>(path: P) -> Option<DtedLevel> {
    DtedLevel::from_extension(path.as_ref().extension()?.to_str()?)
}

fn parse_lat(token: &str) -> Option<i32> {
    let sign = match token.as_bytes().first()? {
        b'n' => 1,
        b's' => -1,
        _ => return None,
    };
    let digits = &token[1..];
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(sign * digits.parse::<i32>().ok()?)
}

fn parse_lon(token: &str) -> Option<i32> {
    let sign = match token.as_bytes().first()? {
        b'e' => 1,
        b'w' => -1,
        _ => return None,
    };
    let digits = &token[1..];
    if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(sign * digits.parse::<i32>().ok()?)
}

/// Validate that coordinates are within geographic range.
///
/// # Returns
///
/// `true` if latitude is within ±90° and longitude within ±180°.
pub fn is_valid_dted_coord(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}
