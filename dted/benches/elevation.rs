use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dted::{DtedService, GeoData};
use tempfile::TempDir;

/// DTED Level 1 posts per side.
const LEVEL1_POSTS: usize = 1201;

fn put(bytes: &mut [u8], offset: usize, text: &str) {
    bytes[offset..offset + text.len()].copy_from_slice(text.as_bytes());
}

/// Encode a Level 1 tile for the cell at `(lat, lon)` with a simple gradient.
fn tile_bytes(lat: i32, lon: i32) -> Vec<u8> {
    let n = LEVEL1_POSTS;
    let lat_text = format!("{:02}0000", lat.abs());
    let lon_text = format!("{:03}0000", lon.abs());
    let ns = if lat >= 0 { 'N' } else { 'S' };
    let ew = if lon >= 0 { 'E' } else { 'W' };

    let mut uhl = vec![b' '; 80];
    put(&mut uhl, 0, "UHL1");
    put(&mut uhl, 4, &format!("{}{}", lon_text, ew));
    put(&mut uhl, 12, &format!("0{}{}", lat_text, ns));
    put(&mut uhl, 20, "0030");
    put(&mut uhl, 24, "0030");
    put(&mut uhl, 28, "0020");
    put(&mut uhl, 47, &format!("{:04}", n));
    put(&mut uhl, 51, &format!("{:04}", n));
    put(&mut uhl, 55, "0");

    let mut dsi = vec![b' '; 648];
    put(&mut dsi, 0, "DSI");
    put(&mut dsi, 59, "DTED1");
    put(&mut dsi, 185, &format!("{}.0{}", lat_text, ns));
    put(&mut dsi, 194, &format!("{}.0{}", lon_text, ew));
    let corners = [(lat, lon), (lat + 1, lon), (lat + 1, lon + 1), (lat, lon + 1)];
    for (i, (clat, clon)) in corners.into_iter().enumerate() {
        let offset = 204 + i * 15;
        put(&mut dsi, offset, &format!("{:02}0000{}", clat.abs(), ns));
        put(&mut dsi, offset + 7, &format!("{:03}0000{}", clon.abs(), ew));
    }
    put(&mut dsi, 264, "0000000.0");
    put(&mut dsi, 273, "0030");
    put(&mut dsi, 277, "0030");
    put(&mut dsi, 281, &format!("{:04}", n));
    put(&mut dsi, 285, &format!("{:04}", n));
    put(&mut dsi, 289, "00");

    let mut acc = vec![b' '; 2700];
    put(&mut acc, 0, "ACC");

    let mut bytes = uhl;
    bytes.extend(dsi);
    bytes.extend(acc);

    for column in 0..n {
        let mut block = vec![0xAA];
        block.extend_from_slice(&(column as u32).to_be_bytes()[1..]);
        block.extend_from_slice(&(column as u16).to_be_bytes());
        block.extend_from_slice(&0u16.to_be_bytes());
        for row in 0..n {
            let elev = ((row + column) % 4000) as i16;
            block.extend_from_slice(&elev.to_be_bytes());
        }
        let checksum = block.iter().fold(0u32, |sum, &b| sum.wrapping_add(b as u32));
        block.extend_from_slice(&checksum.to_be_bytes());
        bytes.extend(block);
    }
    bytes
}

fn write_tile(dir: &Path, lat: i32, lon: i32) {
    let path = dir.join(dted::filename::coords_to_path(lat, lon, dted::DtedLevel::Level1));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, tile_bytes(lat, lon)).unwrap();
}

fn bench_decode(c: &mut Criterion) {
    let bytes = tile_bytes(35, 138);

    c.bench_function("decode_level1_tile", |b| {
        b.iter(|| {
            black_box(GeoData::from_bytes(black_box(&bytes), "bench.dt1").unwrap());
        });
    });
}

fn bench_single_nearest(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    write_tile(tmp.path(), 35, 138);
    let service = DtedService::new(tmp.path(), 10);

    // Warm the cache
    let _ = service.get_elevation(35.5, 138.5);

    c.bench_function("single_nearest_cached", |b| {
        b.iter(|| {
            black_box(
                service
                    .get_elevation(black_box(35.3606), black_box(138.7274))
                    .unwrap(),
            );
        });
    });
}

fn bench_batch_same_tile(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    write_tile(tmp.path(), 35, 138);
    let service = DtedService::new(tmp.path(), 10);

    let coords: Vec<(f64, f64)> = (0..1000)
        .map(|i| {
            let frac = i as f64 / 1000.0;
            (35.0 + frac * 0.99, 138.0 + frac * 0.99)
        })
        .collect();

    // Warm the cache
    let _ = service.get_elevation(35.5, 138.5);

    c.bench_function("batch_1000_same_tile", |b| {
        b.iter(|| {
            black_box(service.get_elevations_batch(black_box(&coords), 0));
        });
    });
}

fn bench_batch_multi_tile(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    write_tile(tmp.path(), 35, 138);
    write_tile(tmp.path(), 36, 138);
    write_tile(tmp.path(), 35, 139);
    let service = DtedService::new(tmp.path(), 10);

    let coords: Vec<(f64, f64)> = (0..1000)
        .map(|i| match i % 3 {
            0 => (35.0 + (i as f64 / 3000.0) * 0.99, 138.5),
            1 => (36.0 + (i as f64 / 3000.0) * 0.99, 138.5),
            _ => (35.0 + (i as f64 / 3000.0) * 0.99, 139.5),
        })
        .collect();

    let _ = service.preload(None);

    c.bench_function("batch_1000_multi_tile", |b| {
        b.iter(|| {
            black_box(service.get_elevations_batch(black_box(&coords), 0));
        });
    });
}

criterion_group!(
    benches,
    bench_decode,
    bench_single_nearest,
    bench_batch_same_tile,
    bench_batch_multi_tile,
);
criterion_main!(benches);
