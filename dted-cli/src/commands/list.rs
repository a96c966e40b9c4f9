use anyhow::{bail, Result};
use dted::filename::{path_level, path_to_lat_lon};
use std::collections::BTreeMap;
use std::fs;

use super::{format_coverage, format_size, ServiceConfig};

pub fn run(config: &ServiceConfig) -> Result<()> {
    let service = config.build_service()?;
    let dir = service.data_dir();

    if !dir.exists() {
        bail!("Data directory does not exist: {}", dir.display());
    }

    let tiles = service.scan_tile_files();

    if tiles.is_empty() {
        println!("No DTED tiles found in: {}", dir.display());
        return Ok(());
    }

    let mut level_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_size: u64 = 0;

    println!("{:<16} {:>6} {:>28}", "TILE", "LEVEL", "COVERAGE");
    println!("{}", "-".repeat(52));

    for tile in &tiles {
        // Archived tiles are listed under their extracted name
        let full = dir.join(tile);
        let size = fs::metadata(&full)
            .or_else(|_| fs::metadata(full.with_extension(zip_extension(tile))))
            .map(|m| m.len())
            .unwrap_or(0);
        total_size += size;

        let level = path_level(tile);
        *level_counts
            .entry(level.map_or_else(|| "???".to_string(), |l| l.to_string()))
            .or_default() += 1;

        let coverage = match path_to_lat_lon(tile) {
            Some((lat, lon)) => format_coverage(lat, lon),
            None => "Unknown".to_string(),
        };

        println!(
            "{:<16} {:>6} {:>28}",
            tile.display(),
            level.map_or("???", |l| l.extension()),
            coverage
        );
    }

    println!();
    println!("Summary:");
    println!("  Total tiles: {}", tiles.len());
    for (level, count) in &level_counts {
        println!("  {}: {}", level, count);
    }
    println!("  Total size: {}", format_size(total_size));
    println!("  Data directory: {}", dir.display());

    Ok(())
}

/// `e138/n35.dt1` → `dt1.zip`
fn zip_extension(tile: &std::path::Path) -> String {
    let ext = tile.extension().and_then(|e| e.to_str()).unwrap_or_default();
    format!("{}.zip", ext)
}
