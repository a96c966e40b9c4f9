pub mod batch;
pub mod info;
pub mod list;
pub mod query;

use anyhow::{Context, Result};
use dted::{DtedLevel, DtedService, DtedServiceBuilder};
use std::path::PathBuf;

/// Service options shared by every subcommand.
pub struct ServiceConfig {
    pub data_dir: Option<PathBuf>,
    pub cache_size: u64,
    pub level: Option<u8>,
}

impl ServiceConfig {
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::var("DTED_DATA_DIR").map(PathBuf::from).context(
                "DTED_DATA_DIR environment variable not set. Use --data-dir or set DTED_DATA_DIR",
            ),
        }
    }

    pub fn build_service(&self) -> Result<DtedService> {
        let mut builder = DtedServiceBuilder::new(self.data_dir()?).cache_size(self.cache_size);

        if let Some(n) = self.level {
            let level = DtedLevel::from_number(n)
                .with_context(|| format!("Unsupported DTED level: {}", n))?;
            builder = builder.level(level);
        }

        Ok(builder.build())
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// `N35 to N36, E138 to E139`
pub fn format_coverage(lat: i32, lon: i32) -> String {
    let ns = |v: i32| if v >= 0 { 'N' } else { 'S' };
    let ew = |v: i32| if v >= 0 { 'E' } else { 'W' };
    format!(
        "{}{:02} to {}{:02}, {}{:03} to {}{:03}",
        ns(lat),
        lat.abs(),
        ns(lat + 1),
        (lat + 1).abs(),
        ew(lon),
        lon.abs(),
        ew(lon + 1),
        (lon + 1).abs()
    )
}
