//! Benchmark for similarity fitting/scoring and the full flight preprocessor
//!
//! Run with: cargo bench --bench similarity_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use fareprep::pipeline::{
    flight_preprocessor, FeatureConfig, RbfPercentileSimilarity, SimilarityConfig,
};

const AIRLINES: [&str; 5] = ["Indigo", "Air India", "Jet Airways", "Spicejet", "Vistara"];
const CITIES: [&str; 6] = ["Banglore", "Kolkata", "Delhi", "Chennai", "Mumbai", "Cochin"];

/// Numeric-only frame with `n_features` skewed duration-like columns
fn generate_numeric_dataframe(n_rows: usize, n_features: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let columns: Vec<Column> = (0..n_features)
        .map(|i| {
            let values: Vec<f64> = (0..n_rows)
                .map(|_| {
                    let v = rng.gen::<f64>();
                    60.0 + v * v * 1500.0
                })
                .collect();
            Column::new(format!("duration_{}", i).into(), values)
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

/// Synthetic raw bookings with the full flight schema
fn generate_flight_dataframe(n_rows: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let pick = |rng: &mut StdRng, options: &[&str]| options[rng.gen_range(0..options.len())].to_string();

    let airline: Vec<String> = (0..n_rows).map(|_| pick(&mut rng, &AIRLINES[..])).collect();
    let date: Vec<String> = (0..n_rows)
        .map(|_| format!("2019-{:02}-{:02}", rng.gen_range(3..7), rng.gen_range(1..29)))
        .collect();
    let source: Vec<String> = (0..n_rows).map(|_| pick(&mut rng, &CITIES[..])).collect();
    let destination: Vec<String> = (0..n_rows).map(|_| pick(&mut rng, &CITIES[..])).collect();
    let clock = |rng: &mut StdRng| format!("{:02}:{:02}:00", rng.gen_range(0..24), rng.gen_range(0..60));
    let dep: Vec<String> = (0..n_rows).map(|_| clock(&mut rng)).collect();
    let arr: Vec<String> = (0..n_rows).map(|_| clock(&mut rng)).collect();
    let duration: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(60..1800)).collect();
    let stops: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(0..4)).collect();
    let info: Vec<&str> = (0..n_rows)
        .map(|_| if rng.gen_bool(0.8) { "No Info" } else { "1 Long Layover" })
        .collect();

    df! {
        "airline" => airline,
        "date_of_journey" => date,
        "source" => source,
        "destination" => destination,
        "dep_time" => dep,
        "arrival_time" => arr,
        "duration" => duration,
        "total_stops" => stops,
        "additional_info" => info,
    }
    .unwrap()
}

fn bench_similarity_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_transform");

    for &n_features in &[1usize, 4, 16] {
        let n_rows = 100_000;
        let df = generate_numeric_dataframe(n_rows, n_features, 42);
        let mut rbf = RbfPercentileSimilarity::new(SimilarityConfig::default()).unwrap();
        rbf.fit(&df).unwrap();

        group.throughput(Throughput::Elements((n_rows * n_features) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_features), &df, |b, df| {
            b.iter(|| rbf.transform(black_box(df)).unwrap())
        });
    }

    group.finish();
}

fn bench_similarity_fit(c: &mut Criterion) {
    let df = generate_numeric_dataframe(100_000, 4, 7);
    c.bench_function("similarity_fit_100k_x4", |b| {
        b.iter(|| {
            let mut rbf = RbfPercentileSimilarity::new(SimilarityConfig::default()).unwrap();
            rbf.fit(black_box(&df)).unwrap();
        })
    });
}

fn bench_flight_preprocessor(c: &mut Criterion) {
    let mut group = c.benchmark_group("flight_preprocessor");
    group.sample_size(20);

    for &n_rows in &[1_000usize, 10_000] {
        let df = generate_flight_dataframe(n_rows, 3);
        group.throughput(Throughput::Elements(n_rows as u64));
        group.bench_with_input(BenchmarkId::new("fit_transform", n_rows), &df, |b, df| {
            b.iter(|| {
                let mut pre = flight_preprocessor(&FeatureConfig::default()).unwrap();
                pre.fit_transform(black_box(df)).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_similarity_transform,
    bench_similarity_fit,
    bench_flight_preprocessor
);
criterion_main!(benches);
