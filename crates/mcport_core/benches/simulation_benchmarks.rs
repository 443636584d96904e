//! Criterion benchmarks for mcport_core simulation
//!
//! Run with: cargo bench -p mcport_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mcport_core::aggregate::percentile_table;
use mcport_core::config::ProjectionSettings;
use mcport_core::linalg::Matrix;
use mcport_core::model::Weights;
use mcport_core::simulation::{
    DiscreteSimulation, LogGbmSimulation, simulate_discrete, simulate_log_gbm,
};

fn create_discrete_config(assets: usize, num_paths: usize) -> DiscreteSimulation {
    let mut cov = Matrix::identity(assets);
    for i in 0..assets {
        for j in 0..assets {
            let v = if i == j { 1.0e-4 } else { 0.3e-4 };
            cov.set(i, j, v);
        }
    }
    DiscreteSimulation {
        mean_returns: vec![0.0004; assets],
        covariance: cov,
        weights: Weights::equal(assets).unwrap(),
        horizon: 365,
        num_paths,
        initial_value: 100_000.0,
        seed: 42,
    }
}

fn bench_discrete(c: &mut Criterion) {
    let mut group = c.benchmark_group("discrete");

    for paths in [100, 1000, 10_000].iter() {
        let config = create_discrete_config(5, *paths);
        group.bench_with_input(BenchmarkId::new("paths", paths), paths, |b, _| {
            b.iter(|| simulate_discrete(black_box(&config)))
        });
    }

    group.finish();
}

fn bench_discrete_assets(c: &mut Criterion) {
    let mut group = c.benchmark_group("discrete_assets");

    for assets in [2, 8, 16].iter() {
        let config = create_discrete_config(*assets, 1000);
        group.bench_with_input(BenchmarkId::new("assets", assets), assets, |b, _| {
            b.iter(|| simulate_discrete(black_box(&config)))
        });
    }

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let settings = ProjectionSettings::default();
    let config = LogGbmSimulation::from_settings(0.07, 0.15, &settings);

    c.bench_function("log_gbm_20yr_projection", |b| {
        b.iter(|| {
            let ensemble = simulate_log_gbm(black_box(&config)).unwrap();
            percentile_table(&ensemble, &settings.markers(), &settings.percentiles)
        })
    });
}

criterion_group!(
    benches,
    bench_discrete,
    bench_discrete_assets,
    bench_projection
);
criterion_main!(benches);
