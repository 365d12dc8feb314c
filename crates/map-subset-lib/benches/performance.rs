//! Performance benchmarks for map-subset-lib
//!
//! Run with: cargo bench --package map-subset-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::Coord;
use map_subset_lib::{Bounds, PolylineCollection, clip_polygons, subset, subset_parallel};

/// Generate a track that wanders in and out of a region around (`base_lon`, `base_lat`)
fn generate_track(num_points: usize, base_lon: f64, base_lat: f64) -> Vec<Coord<f64>> {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            Coord {
                x: base_lon + t * 2.0 + (t * 30.0).cos() * 0.05,
                y: base_lat + (t * 50.0).sin() * 0.6,
            }
        })
        .collect()
}

/// Generate many tracks spread across an area
fn generate_tracks(num_tracks: usize, points_per_track: usize) -> PolylineCollection<f64> {
    PolylineCollection::from_polylines((0..num_tracks).map(|i| {
        let lat_offset = (i % 10) as f64 * 0.1;
        let lon_offset = (i / 10) as f64 * 0.1;
        generate_track(points_per_track, -1.0 + lon_offset, 51.0 + lat_offset)
    }))
}

/// Generate wavy rings centred around the region
fn generate_rings(num_rings: usize, points_per_ring: usize) -> PolylineCollection<f64> {
    PolylineCollection::from_polylines((0..num_rings).map(|i| {
        let cx = -0.5 + (i % 10) as f64 * 0.15;
        let cy = 51.0 + (i / 10) as f64 * 0.15;
        (0..points_per_ring)
            .map(|k| {
                let angle = k as f64 / points_per_ring as f64 * std::f64::consts::TAU;
                let r = 0.4 + (angle * 7.0).sin() * 0.1;
                Coord {
                    x: cx + r * angle.cos(),
                    y: cy + r * angle.sin(),
                }
            })
            .collect::<Vec<_>>()
    }))
}

fn bench_bounds() -> Bounds<f64> {
    Bounds::new(-0.5, 50.8, 1.0, 51.9).unwrap()
}

// ============================================================================
// Core Benchmarks - Key performance indicators
// ============================================================================

fn bench_subset(c: &mut Criterion) {
    let mut group = c.benchmark_group("subset");

    // Single track with 50k points - representative workload
    let track = generate_tracks(1, 50_000);
    let bounds = bench_bounds();

    group.throughput(Throughput::Elements(track.vertex_count() as u64));
    for resolution in [0.0, 0.001, 0.01] {
        group.bench_with_input(
            BenchmarkId::new("single_50k", resolution),
            &resolution,
            |b, &resolution| {
                b.iter(|| subset(&bounds, resolution, &track).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_subset_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("subset_parallel");
    group.sample_size(20);

    // 1000 tracks with 1000 points each
    let tracks = generate_tracks(1_000, 1_000);
    let bounds = bench_bounds();

    group.throughput(Throughput::Elements(tracks.vertex_count() as u64));
    group.bench_function("sequential_1000x1k", |b| {
        b.iter(|| subset(&bounds, 0.0, &tracks).unwrap());
    });
    for chunks in [2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("chunks", chunks), &chunks, |b, &chunks| {
            b.iter(|| subset_parallel(&bounds, 0.0, &tracks, chunks).unwrap());
        });
    }

    group.finish();
}

fn bench_clip_polygons(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip_polygons");
    group.sample_size(20);

    // 100 rings with 2000 vertices each
    let rings = generate_rings(100, 2_000);
    let bounds = bench_bounds();

    group.throughput(Throughput::Elements(rings.vertex_count() as u64));
    group.bench_function("discard_degenerates", |b| {
        b.iter(|| clip_polygons(&bounds, &rings, true).unwrap());
    });
    group.bench_function("keep_degenerates", |b| {
        b.iter(|| clip_polygons(&bounds, &rings, false).unwrap());
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_subset,
    bench_subset_parallel,
    bench_clip_polygons,
);

criterion_main!(benches);
