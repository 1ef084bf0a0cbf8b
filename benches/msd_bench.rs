//! Benchmarks for the MSD pipeline (single-threaded)
//!
//! Run with:
//!   cargo bench --bench msd_bench
//!   cargo bench msd_bench -- msd_pipeline/single_trajectory
//!   cargo bench msd_bench -- msd_pipeline/imsd_200_probes

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use microrheo::trajectories::synthetic::{random_walk, random_walk_set};
use microrheo::{emsd, imsd, msd, MotionParams, Positions, Statistic, TrajectorySet};

/// Deterministic single-probe fixture: a 2000-frame random walk with a 10% gap rate.
/// Note: keep fixture construction outside the hot loops.
fn make_gappy_walk() -> Positions {
    let mut rng = StdRng::seed_from_u64(42);
    let dense = random_walk(2000, 1.0, (0.0, 0.0), (0.0, 0.0), &mut rng).expect("walk fixture");
    dense
        .into_iter()
        .filter(|obs| obs.frame % 10 != 3)
        .collect()
}

/// Deterministic multi-probe fixture: 200 probes × 300 frames.
fn make_population() -> TrajectorySet {
    let mut rng = StdRng::seed_from_u64(7);
    random_walk_set(200, 300, 1.0, &mut rng).expect("set fixture")
}

fn bench_msd_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("msd_pipeline");

    let walk = make_gappy_walk();
    let population = make_population();
    let params = MotionParams::default();

    group.bench_function("single_trajectory", |b| {
        b.iter(|| {
            let table = msd(black_box(&walk), &params, true).expect("msd");
            black_box(&table);
        })
    });

    group.bench_function("imsd_200_probes", |b| {
        b.iter(|| {
            let table = imsd(black_box(&population), &params, Statistic::Msd).expect("imsd");
            black_box(&table);
        })
    });

    group.bench_function("emsd_200_probes", |b| {
        b.iter(|| {
            let series = emsd(black_box(&population), &params).expect("emsd");
            black_box(&series);
        })
    });

    group.finish();
}

criterion_group!(msd_benches, bench_msd_pipeline);
criterion_main!(msd_benches);
