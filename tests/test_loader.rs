//! Unit tests for dataset loading and saving

use fareprep::pipeline::{estimated_size_mb, load_dataset, save_dataset};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "airline,duration").unwrap();
    writeln!(file, "Indigo,170").unwrap();
    writeln!(file, "Vistara,445").unwrap();
    drop(file);

    let df = load_dataset(&csv_path, 100).unwrap();

    assert_eq!(df.shape(), (2, 2));
    assert_eq!(df.get_column_names(), &["airline", "duration"]);
    assert!(df.column("duration").unwrap().dtype().is_primitive_numeric());
    assert!(estimated_size_mb(&df) >= 0.0);
}

#[test]
fn test_load_parquet_file() {
    let mut df = create_flight_dataframe();
    let (_temp_dir, parquet_path) = create_temp_parquet(&mut df);

    let loaded = load_dataset(&parquet_path, 100).unwrap();
    assert!(loaded.equals(&df));
}

#[test]
fn test_flight_csv_keeps_times_as_text() {
    let mut df = create_flight_dataframe();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let loaded = load_dataset(&csv_path, 0).unwrap();
    assert_eq!(loaded.shape(), df.shape());
    assert_eq!(loaded.column("dep_time").unwrap().dtype(), &DataType::String);
    assert_eq!(loaded.column("duration").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn test_unsupported_format_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("flights.xlsx");
    std::fs::write(&path, "not a spreadsheet").unwrap();

    let err = load_dataset(&path, 100).unwrap_err();
    assert!(err.to_string().contains("Unsupported file format"));
}

#[test]
fn test_missing_file_is_reported_with_path() {
    let err = load_dataset(std::path::Path::new("/nonexistent/flights.csv"), 100).unwrap_err();
    assert!(format!("{:#}", err).contains("flights.csv"));
}

#[test]
fn test_save_round_trips_csv_and_parquet() {
    let temp_dir = TempDir::new().unwrap();
    let mut df = df! {
        "air__airline_Indigo" => [1.0f64, 0.0],
        "dur__duration_rbf_50" => [0.5f64, 1.0],
    }
    .unwrap();

    for name in ["features.csv", "features.parquet"] {
        let path = temp_dir.path().join(name);
        save_dataset(&mut df, &path).unwrap();
        let loaded = load_dataset(&path, 100).unwrap();
        assert!(loaded.equals(&df), "round trip through {}", name);
    }

    let bad = temp_dir.path().join("features.txt");
    assert!(save_dataset(&mut df, &bad).is_err());
}
