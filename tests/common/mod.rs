//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Small booking table covering every route of the flight preprocessor.
///
/// - durations span all three buckets and the 1000-minute flag
/// - stops cover direct and multi-stop flights
/// - one row has additional info, the rest are "No Info"
pub fn create_flight_dataframe() -> DataFrame {
    df! {
        "airline" => ["Indigo", "Air India", "Jet Airways", "Indigo", "Spicejet", "Vistara", "Air India", "Jet Airways"],
        "date_of_journey" => ["2019-03-24", "2019-05-01", "2019-06-09", "2019-05-12", "2019-03-01", "2019-06-24", "2019-03-12", "2019-05-27"],
        "source" => ["Banglore", "Kolkata", "Delhi", "Kolkata", "Chennai", "Mumbai", "Delhi", "Delhi"],
        "destination" => ["New Delhi", "Banglore", "Cochin", "Banglore", "Kolkata", "Hyderabad", "Cochin", "Cochin"],
        "dep_time" => ["22:20:00", "05:50:00", "09:25:00", "18:05:00", "16:50:00", "07:00:00", "13:15:00", "20:00:00"],
        "arrival_time" => ["01:10:00", "13:15:00", "04:25:00", "23:30:00", "21:35:00", "08:30:00", "19:00:00", "04:25:00"],
        "duration" => [170i64, 445, 1140, 325, 285, 90, 345, 505],
        "total_stops" => [0i64, 2, 2, 1, 1, 0, 1, 1],
        "additional_info" => ["No Info", "No Info", "No Info", "No Info", "In-flight meal not included", "No Info", "No Info", "1 Long Layover"],
        "price" => [3897i64, 7662, 13882, 6218, 13302, 4050, 8907, 11087],
    }
    .unwrap()
}

/// Bookings without the target column, as new data to score would arrive.
pub fn create_new_bookings_dataframe() -> DataFrame {
    df! {
        "airline" => ["Vistara", "Goair"],
        "date_of_journey" => ["2019-04-15", "2019-06-01"],
        "source" => ["Delhi", "Mumbai"],
        "destination" => ["Cochin", "Hyderabad"],
        "dep_time" => ["10:00:00", "03:30:00"],
        "arrival_time" => ["14:00:00", "05:00:00"],
        "duration" => [240i64, 1200],
        "total_stops" => [1i64, 0],
        "additional_info" => ["No Info", "Business Class"],
    }
    .unwrap()
}

/// Create a temporary directory with a CSV file named `name`
pub fn create_temp_csv_named(df: &mut DataFrame, name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join(name);

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    create_temp_csv_named(df, "flights.csv")
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("flights.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_columns: &[&str]) {
    let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_columns {
        assert!(
            names.iter().any(|n| n == col),
            "Expected column '{}' not found in {:?}",
            col,
            names
        );
    }
}

/// Extract a column as f64 values, panicking on nulls
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}
