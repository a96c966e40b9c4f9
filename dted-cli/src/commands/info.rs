use anyhow::{bail, Context, Result};
use dted::{DtedLevel, GeoData, LatitudeLongitude};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::format_size;

#[derive(Serialize)]
struct Point {
    lat: f64,
    lon: f64,
}

impl From<LatitudeLongitude> for Point {
    fn from(c: LatitudeLongitude) -> Self {
        Self {
            lat: c.latitude,
            lon: c.longitude,
        }
    }
}

#[derive(Serialize)]
struct TileInfo {
    path: String,
    file_size: u64,
    level: Option<String>,
    resolution_m: Option<f64>,
    product_level: String,
    origin: Point,
    corners: Vec<(&'static str, Point)>,
    columns: usize,
    rows: usize,
    lon_interval_arcsec: f64,
    lat_interval_arcsec: f64,
    orientation: f64,
    coverage: f64,
    security_code: String,
    reference: String,
    edition: String,
    producer_code: String,
    vertical_datum: String,
    horizontal_datum: String,
    compilation_date: String,
    vertical_accuracy: Option<i32>,
    absolute_horizontal_accuracy: Option<i32>,
    absolute_vertical_accuracy: Option<i32>,
    relative_horizontal_accuracy: Option<i32>,
    relative_vertical_accuracy: Option<i32>,
    min_elevation: Option<i16>,
    max_elevation: Option<i16>,
    void_count: usize,
    total_samples: usize,
    warnings: Vec<String>,
}

impl TileInfo {
    fn new(path: &Path, file_size: u64, tile: &GeoData) -> Self {
        let uhl = tile.uhl();
        let dsi = tile.dsi();
        let acc = tile.acc();
        let stats = tile.elevation_stats();

        Self {
            path: path.display().to_string(),
            file_size,
            level: tile.level().map(|l| l.to_string()),
            resolution_m: tile.level().map(|l| l.meters()),
            product_level: dsi.product_level.clone(),
            origin: dsi.origin.into(),
            corners: dsi
                .corners()
                .into_iter()
                .map(|(name, c)| (name, c.into()))
                .collect(),
            columns: dsi.shape.columns,
            rows: dsi.shape.rows,
            lon_interval_arcsec: dsi.interval.longitude,
            lat_interval_arcsec: dsi.interval.latitude,
            orientation: dsi.orientation,
            coverage: dsi.coverage,
            security_code: dsi.security_code.clone(),
            reference: dsi.reference.clone(),
            edition: dsi.edition.clone(),
            producer_code: dsi.producer_code.clone(),
            vertical_datum: dsi.vertical_datum.clone(),
            horizontal_datum: dsi.horizontal_datum.clone(),
            compilation_date: dsi.compilation_date.clone(),
            vertical_accuracy: uhl.vertical_accuracy,
            absolute_horizontal_accuracy: acc.absolute_horizontal,
            absolute_vertical_accuracy: acc.absolute_vertical,
            relative_horizontal_accuracy: acc.relative_horizontal,
            relative_vertical_accuracy: acc.relative_vertical,
            min_elevation: stats.min,
            max_elevation: stats.max,
            void_count: stats.void_count,
            total_samples: stats.total,
            warnings: tile.warnings().iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// `Level: DTED1 (~90m)`
fn level_line(level: Option<DtedLevel>, product_level: &str) -> String {
    match level {
        Some(level) => format!("Level: {} (~{}m)", level, level.meters()),
        None => format!("Level: unknown ({})", product_level.trim()),
    }
}

fn or_na(value: Option<i32>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{}m", v))
}

pub fn run(file: PathBuf, json: bool) -> Result<()> {
    if !file.exists() {
        bail!("Tile not found: {}", file.display());
    }

    let tile = GeoData::load(&file)
        .with_context(|| format!("Failed to load tile {}", file.display()))?;
    let file_size = std::fs::metadata(&file)?.len();
    let info = TileInfo::new(&file, file_size, &tile);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File: {}", info.path);
    println!("File size: {}", format_size(info.file_size));
    println!();
    println!("{}", level_line(tile.level(), &info.product_level));
    println!("Origin: {:.6}, {:.6}", info.origin.lat, info.origin.lon);
    for (name, corner) in &info.corners {
        println!("  {:<11} {:.6}, {:.6}", name, corner.lat, corner.lon);
    }
    println!(
        "Grid: {} columns x {} rows ({}\" x {}\")",
        info.columns, info.rows, info.lon_interval_arcsec, info.lat_interval_arcsec
    );
    println!("Orientation: {}", info.orientation);
    println!("Coverage: {:.0}%", info.coverage * 100.0);
    println!();
    println!("Security: {}", info.security_code);
    println!("Reference: {}", info.reference);
    println!("Edition: {}", info.edition);
    println!("Producer: {}", info.producer_code);
    println!("Datums: {} / {}", info.vertical_datum, info.horizontal_datum);
    println!("Compiled: {}", info.compilation_date);
    println!();
    println!("Vertical accuracy: {}", or_na(info.vertical_accuracy));
    println!(
        "Absolute accuracy: {} horizontal, {} vertical",
        or_na(info.absolute_horizontal_accuracy),
        or_na(info.absolute_vertical_accuracy)
    );
    println!(
        "Relative accuracy: {} horizontal, {} vertical",
        or_na(info.relative_horizontal_accuracy),
        or_na(info.relative_vertical_accuracy)
    );
    println!();

    if let (Some(min), Some(max)) = (info.min_elevation, info.max_elevation) {
        println!("Min elevation: {}m", min);
        println!("Max elevation: {}m", max);
    }

    if info.void_count > 0 && info.total_samples > 0 {
        let void_pct = (info.void_count as f64 / info.total_samples as f64) * 100.0;
        println!("Void samples: {} ({:.1}%)", info.void_count, void_pct);
    }

    for warning in &info.warnings {
        println!("Warning: {}", warning);
    }

    Ok(())
}
