//! Basic example demonstrating dted library usage.
//!
//! Run with: cargo run --example basic -- /path/to/dted [file.dt1]

use dted::{DtedError, DtedService, GeoData};
use std::env;

fn main() -> Result<(), DtedError> {
    let mut args = env::args().skip(1);
    let data_dir = args.next().unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/dted [file.dt1]");
        std::process::exit(1);
    });

    // Decode a single file and show its headers
    if let Some(file) = args.next() {
        let tile = GeoData::load(&file)?;
        let dsi = tile.dsi();
        println!("{}", file);
        println!("  Level:  {:?}", tile.level());
        println!("  Origin: {:.4}, {:.4}", dsi.origin.latitude, dsi.origin.longitude);
        println!("  Shape:  {} x {}", tile.shape().columns, tile.shape().rows);
        for warning in tile.warnings() {
            println!("  Warning: {}", warning);
        }
        println!();
    }

    let service = DtedService::new(&data_dir, 10);

    let locations = [
        ("Mount Fuji, Japan", 35.3606, 138.7274),
        ("Mount Everest, Nepal", 27.9881, 86.9250),
        ("Denali, Alaska", 63.0695, -151.0074),
    ];

    println!("Elevation queries (nearest-neighbor):");
    println!("{:-<50}", "");

    for (name, lat, lon) in &locations {
        match service.get_elevation(*lat, *lon) {
            Ok(Some(elevation)) => println!("{}: {}m", name, elevation),
            Ok(None) => println!("{}: no data", name),
            Err(e) => println!("{}: error - {}", name, e),
        }
    }

    let stats = service.cache_stats();
    println!("\nCache statistics:");
    println!("  Cached tiles: {}", stats.entry_count);
    println!("  Tiles loaded: {}", stats.load_count);
    println!("  Hit rate: {:.1}%", stats.hit_rate() * 100.0);

    Ok(())
}
