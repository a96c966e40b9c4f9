//! Synthetic DTED files for unit tests.

use std::fs;
use std::path::{Path, PathBuf};

use crate::block::{checksum_of, sign_magnitude_to_i16, BLOCK_SENTINEL};
use crate::filename::coords_to_path;
use crate::geodata::DtedLevel;
use crate::records::acc::ACC_SIZE;
use crate::records::dsi::{DSI_SIZE, GEO_BLOCK};
use crate::records::uhl::UHL_SIZE;

/// Write `text` into `bytes` at `offset`.
pub(crate) fn put(bytes: &mut [u8], offset: usize, text: &str) {
    bytes[offset..offset + text.len()].copy_from_slice(text.as_bytes());
}

fn hemisphere(value: i32, positive: char, negative: char) -> char {
    if value >= 0 {
        positive
    } else {
        negative
    }
}

/// `DDMMSSH`
fn lat_7(lat: i32) -> String {
    format!("{:02}0000{}", lat.abs(), hemisphere(lat, 'N', 'S'))
}

/// `DDDMMSSH`
fn lon_8(lon: i32) -> String {
    format!("{:03}0000{}", lon.abs(), hemisphere(lon, 'E', 'W'))
}

pub(crate) fn uhl_bytes(lon: &str, lat: &str, columns: usize, rows: usize) -> Vec<u8> {
    let mut bytes = vec![b' '; UHL_SIZE];
    put(&mut bytes, 0, "UHL1");
    put(&mut bytes, 4, lon);
    put(&mut bytes, 12, lat);
    put(&mut bytes, 20, "0300");
    put(&mut bytes, 24, "0030");
    put(&mut bytes, 28, "0025");
    put(&mut bytes, 32, "U  ");
    put(&mut bytes, 35, "REF0001     ");
    put(&mut bytes, 47, &format!("{:04}", columns));
    put(&mut bytes, 51, &format!("{:04}", rows));
    put(&mut bytes, 55, "0");
    bytes
}

/// DSI for the 1°×1° cell whose south-west corner is `(lat, lon)`.
pub(crate) fn dsi_bytes(lat: i32, lon: i32, columns: usize, rows: usize) -> Vec<u8> {
    let mut bytes = vec![b' '; DSI_SIZE];
    put(&mut bytes, 0, "DSI");
    put(&mut bytes, 3, "U");
    put(&mut bytes, 59, "DTED1");
    put(&mut bytes, 64, "REF000000000001");
    put(&mut bytes, 107, "01");
    put(&mut bytes, 109, "A");
    put(&mut bytes, 110, "0000");
    put(&mut bytes, 114, "0000");
    put(&mut bytes, 118, "0000");
    put(&mut bytes, 122, "USCNIMA ");
    put(&mut bytes, 169, "PRF89020B  ");
    put(&mut bytes, 180, "0005");

    let base = GEO_BLOCK;
    put(
        &mut bytes,
        base,
        &format!("{:02}0000.0{}", lat.abs(), hemisphere(lat, 'N', 'S')),
    );
    put(
        &mut bytes,
        base + 9,
        &format!("{:03}0000.0{}", lon.abs(), hemisphere(lon, 'E', 'W')),
    );
    let corners = [(lat, lon), (lat + 1, lon), (lat + 1, lon + 1), (lat, lon + 1)];
    for (i, (corner_lat, corner_lon)) in corners.into_iter().enumerate() {
        let offset = base + 19 + i * 15;
        put(&mut bytes, offset, &lat_7(corner_lat));
        put(&mut bytes, offset + 7, &lon_8(corner_lon));
    }
    put(&mut bytes, base + 79, "0000000.0");
    put(&mut bytes, base + 88, "0030");
    put(&mut bytes, base + 92, "0030");
    put(&mut bytes, base + 96, &format!("{:04}", rows));
    put(&mut bytes, base + 100, &format!("{:04}", columns));
    put(&mut bytes, base + 104, "00");
    bytes
}

pub(crate) fn acc_bytes() -> Vec<u8> {
    let mut bytes = vec![b' '; ACC_SIZE];
    put(&mut bytes, 0, "ACC");
    put(&mut bytes, 3, "0050");
    put(&mut bytes, 7, "0030");
    put(&mut bytes, 11, "0020");
    put(&mut bytes, 15, "0012");
    bytes
}

/// One data block with a valid checksum; `values` are plain elevations.
pub(crate) fn block_bytes(column: usize, values: &[i16]) -> Vec<u8> {
    let mut block = vec![BLOCK_SENTINEL];
    block.extend_from_slice(&(column as u32).to_be_bytes()[1..]);
    block.extend_from_slice(&(column as u16).to_be_bytes());
    block.extend_from_slice(&0u16.to_be_bytes());
    for &value in values {
        // The transform is its own inverse on values below zero
        block.extend_from_slice(&sign_magnitude_to_i16(value).to_be_bytes());
    }
    let checksum = checksum_of(&block);
    block.extend_from_slice(&checksum.to_be_bytes());
    block
}

/// A complete file for the cell at `(lat, lon)`; `grid` is `[column][row]`.
pub(crate) fn dted_bytes(lat: i32, lon: i32, grid: &[Vec<i16>]) -> Vec<u8> {
    let columns = grid.len();
    let rows = grid.first().map_or(0, Vec::len);

    let mut bytes = uhl_bytes(&lon_8(lon), &format!("0{}", lat_7(lat)), columns, rows);
    bytes.extend(dsi_bytes(lat, lon, columns, rows));
    bytes.extend(acc_bytes());
    for (index, column) in grid.iter().enumerate() {
        bytes.extend(block_bytes(index, column));
    }
    bytes
}

pub(crate) fn write_dted_file(path: &Path, lat: i32, lon: i32, grid: &[Vec<i16>]) {
    fs::write(path, dted_bytes(lat, lon, grid)).unwrap();
}

/// Write a tile into `dir` using the nested `e138/n35.dt1` layout.
pub(crate) fn write_tile(
    dir: &Path,
    lat: i32,
    lon: i32,
    level: DtedLevel,
    grid: &[Vec<i16>],
) -> PathBuf {
    let path = dir.join(coords_to_path(lat, lon, level));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    write_dted_file(&path, lat, lon, grid);
    path
}

/// A `size`×`size` grid of zeros with `center` at the middle post.
pub(crate) fn center_grid(size: usize, center: i16) -> Vec<Vec<i16>> {
    let mut grid = vec![vec![0i16; size]; size];
    grid[size / 2][size / 2] = center;
    grid
}
