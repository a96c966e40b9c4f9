use anyhow::{Context, Result};
use serde::Serialize;

use super::ServiceConfig;

#[derive(Serialize)]
struct ElevationResponse {
    lat: f64,
    lon: f64,
    elevation: Option<i32>,
}

pub fn run(config: &ServiceConfig, lat: f64, lon: f64, json: bool) -> Result<()> {
    let service = config.build_service()?;

    let elevation = service
        .get_elevation(lat, lon)
        .context("Failed to get elevation")?;

    if json {
        let response = ElevationResponse {
            lat,
            lon,
            elevation,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        match elevation {
            Some(elev) => println!("{}", elev),
            None => println!("void"),
        }
    }

    Ok(())
}
