//! GeoJSON elevation enrichment.
//!
//! Adds a Z value to every position of a GeoJSON geometry using a
//! [`DtedService`]. Enable the `geojson` feature to use this module.
//!
//! Positions that land on void data or on a cell with no tile keep their
//! original values, so a partially covered line is still returned whole.
//!
//! # Example
//!
//! ```ignore
//! use dted::DtedService;
//! use dted::geojson::add_elevations_to_geometry;
//! use geojson::Geometry;
//!
//! let service = DtedService::new("/path/to/dted", 100);
//!
//! let geometry: Geometry = r#"{"type": "Point", "coordinates": [138.7274, 35.3606]}"#
//!     .parse()
//!     .unwrap();
//!
//! let enriched = add_elevations_to_geometry(&service, geometry)?;
//! // {"type": "Point", "coordinates": [138.7274, 35.3606, 3776.0]}
//! ```

use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};

use crate::error::{DtedError, Result};
use crate::DtedService;

/// Add elevations to all positions in a GeoJSON geometry.
///
/// Input positions are in GeoJSON order: `[longitude, latitude]` or
/// `[longitude, latitude, altitude]`. Every geometry type is supported,
/// including nested `GeometryCollection`s.
///
/// # Errors
///
/// Returns an error if:
/// - A position has fewer than 2 elements
/// - A position is outside ±90° latitude or ±180° longitude
/// - A tile exists but cannot be decoded
pub fn add_elevations_to_geometry(service: &DtedService, geometry: Geometry) -> Result<Geometry> {
    let new_value = match geometry.value {
        GeoJsonValue::Point(coord) => GeoJsonValue::Point(add_elevation_to_coord(service, &coord)?),
        GeoJsonValue::MultiPoint(coords) => {
            GeoJsonValue::MultiPoint(add_elevation_to_coords(service, &coords)?)
        }
        GeoJsonValue::LineString(coords) => {
            GeoJsonValue::LineString(add_elevation_to_coords(service, &coords)?)
        }
        GeoJsonValue::MultiLineString(lines) => GeoJsonValue::MultiLineString(
            lines
                .iter()
                .map(|line| add_elevation_to_coords(service, line))
                .collect::<Result<_>>()?,
        ),
        GeoJsonValue::Polygon(rings) => GeoJsonValue::Polygon(
            rings
                .iter()
                .map(|ring| add_elevation_to_coords(service, ring))
                .collect::<Result<_>>()?,
        ),
        GeoJsonValue::MultiPolygon(polygons) => GeoJsonValue::MultiPolygon(
            polygons
                .iter()
                .map(|polygon| {
                    polygon
                        .iter()
                        .map(|ring| add_elevation_to_coords(service, ring))
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<_>>()?,
        ),
        GeoJsonValue::GeometryCollection(geometries) => GeoJsonValue::GeometryCollection(
            geometries
                .into_iter()
                .map(|g| add_elevations_to_geometry(service, g))
                .collect::<Result<_>>()?,
        ),
    };

    let mut enriched = Geometry::new(new_value);
    enriched.bbox = geometry.bbox;
    enriched.foreign_members = geometry.foreign_members;
    Ok(enriched)
}

/// Add elevations to the geometry of every feature in a collection.
///
/// Features without geometry are passed through unchanged.
pub fn add_elevations_to_features(
    service: &DtedService,
    collection: FeatureCollection,
) -> Result<FeatureCollection> {
    let features = collection
        .features
        .into_iter()
        .map(|feature| {
            let geometry = feature
                .geometry
                .map(|g| add_elevations_to_geometry(service, g))
                .transpose()?;
            Ok(Feature {
                geometry,
                ..feature
            })
        })
        .collect::<Result<_>>()?;

    Ok(FeatureCollection {
        features,
        ..collection
    })
}

/// Add elevation to a single GeoJSON position.
///
/// Returns `[lon, lat, elevation]`, or the input unchanged when there is no
/// elevation for the position.
pub fn add_elevation_to_coord(service: &DtedService, coord: &[f64]) -> Result<Vec<f64>> {
    if coord.len() < 2 {
        return Err(DtedError::InvalidCoordinate {
            message: "Coordinate must have at least 2 elements (lon, lat)".to_string(),
        });
    }

    let lon = coord[0];
    let lat = coord[1];

    match service.get_elevation(lat, lon)? {
        Some(elevation) => Ok(vec![lon, lat, elevation as f64]),
        None => Ok(coord.to_vec()),
    }
}

/// Add elevations to a list of GeoJSON positions.
pub fn add_elevation_to_coords(
    service: &DtedService,
    coords: &[Vec<f64>],
) -> Result<Vec<Vec<f64>>> {
    coords
        .iter()
        .map(|coord| add_elevation_to_coord(service, coord))
        .collect()
}
