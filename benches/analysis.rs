//! Benchmarks for the valuation models and the combined analysis run.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use valuator::analysis::{run_all_analyses_with, AnalysisConfig};
use valuator::prelude::*;

// Two features with a linear price: y = 0.05 * area + 30 * score + 10
fn synthetic(size: usize) -> (Matrix<f64>, Vector<f64>) {
    let rows: Vec<Vec<f64>> = (0..size)
        .map(|i| {
            let area = 500.0 + (i * 37 % 2500) as f64;
            let score = (i % 10) as f64 / 10.0;
            vec![area, score]
        })
        .collect();
    let y: Vec<f64> = rows
        .iter()
        .map(|r| 0.05 * r[0] + 30.0 * r[1] + 10.0)
        .collect();
    (Matrix::from_rows(&rows).unwrap(), Vector::from_vec(y))
}

fn bench_linear_regression_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_regression_fit");

    for size in [10, 50, 100, 500].iter() {
        let (x, y) = synthetic(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut model = LinearRegressionModel::new();
                model.fit(black_box(&x), black_box(&y)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_kmeans_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_fit");

    for size in [10, 50, 100, 500].iter() {
        let (x, _) = synthetic(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut kmeans = KMeansClusterer::new(3).with_random_state(42);
                kmeans.fit(black_box(&x)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_random_forest_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_forest_fit");
    group.sample_size(20);

    for size in [10, 50, 100].iter() {
        let (x, y) = synthetic(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut forest = RandomForestRegressor::new(10).with_random_state(42);
                forest.fit(black_box(&x), black_box(&y)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_full_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_report");
    let parallel = AnalysisConfig::default().with_seed(42);
    let sequential = parallel.clone().with_parallel(false);

    group.bench_function("parallel", |b| {
        b.iter(|| run_all_analyses_with(black_box(&parallel)).unwrap());
    });
    group.bench_function("sequential", |b| {
        b.iter(|| run_all_analyses_with(black_box(&sequential)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_linear_regression_fit,
    bench_kmeans_fit,
    bench_random_forest_fit,
    bench_full_report
);
criterion_main!(benches);
