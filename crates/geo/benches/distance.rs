//! Benchmarks for distance, bearing, and bounding-box calculations.

use courier_geo::{
    DistanceUnit, calculate_bearing, calculate_distance, distance_bounds, haversine_distance,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_haversine(c: &mut Criterion) {
    c.bench_function("haversine_single", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(52.5200),
                black_box(13.4050),
                black_box(48.8566),
                black_box(2.3522),
                DistanceUnit::Kilometers,
            )
        })
    });

    c.bench_function("calculate_distance_equal_points", |b| {
        b.iter(|| {
            calculate_distance(
                black_box(52.5200),
                black_box(13.4050),
                black_box(52.5200),
                black_box(13.4050),
                DistanceUnit::Kilometers,
            )
        })
    });
}

fn bench_bearing(c: &mut Criterion) {
    c.bench_function("bearing_single", |b| {
        b.iter(|| {
            calculate_bearing(
                black_box(52.5200),
                black_box(13.4050),
                black_box(48.8566),
                black_box(2.3522),
            )
        })
    });
}

fn bench_bounds(c: &mut Criterion) {
    c.bench_function("distance_bounds", |b| {
        b.iter(|| {
            distance_bounds(
                black_box(52.5200),
                black_box(13.4050),
                black_box(25.0),
                DistanceUnit::Kilometers,
            )
        })
    });
}

criterion_group!(benches, bench_haversine, bench_bearing, bench_bounds);
criterion_main!(benches);
