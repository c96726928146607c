//! Tests for CLI argument parsing and the fareprep binary

use assert_cmd::Command;
use clap::Parser;
use fareprep::cli::{Cli, Commands};
use fareprep::pipeline::{load_dataset, FeatureConfig};
use predicates::prelude::*;
use std::path::PathBuf;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn fit_transform_args(cli: Cli) -> fareprep::cli::FitTransformArgs {
    match cli.command {
        Commands::FitTransform(args) => args,
        other => panic!("expected fit-transform, got {:?}", other),
    }
}

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["fareprep", "fit-transform", "-i", "flights.csv"]);
    assert_eq!(cli.verbose, 0);

    let args = fit_transform_args(cli);
    assert_eq!(args.infer_schema_length, 10000);
    assert!(!args.no_confirm);
    assert!(args.target.is_none());
    assert!(args.apply.is_none());
    assert_eq!(args.features.to_config().unwrap(), FeatureConfig::default());
}

#[test]
fn test_cli_feature_flags_override_defaults() {
    let cli = Cli::parse_from([
        "fareprep",
        "fit-transform",
        "-i",
        "flights.csv",
        "--gamma",
        "0.05",
        "--percentiles",
        "0.1,0.9",
        "--short-duration",
        "120",
        "--medium-duration",
        "300",
        "--long-duration",
        "800",
        "--day-parts",
        "5,11,17,21",
    ]);
    let config = fit_transform_args(cli).features.to_config().unwrap();

    assert_eq!(config.similarity.gamma, 0.05);
    assert_eq!(config.similarity.percentiles, vec![0.1, 0.9]);
    assert_eq!(config.duration.short, 120.0);
    assert_eq!(config.duration.medium, 300.0);
    assert_eq!(config.long_duration.value, 800);
    assert_eq!(config.part_of_day.morning, 5);
    assert_eq!(config.part_of_day.night, 21);
}

#[test]
fn test_cli_rejects_invalid_values() {
    for bad in [
        vec!["fareprep", "fit-transform", "-i", "f.csv", "--gamma", "-1"],
        vec!["fareprep", "fit-transform", "-i", "f.csv", "--percentiles", "0.5,2"],
        vec!["fareprep", "fit-transform"],
    ] {
        assert!(Cli::try_parse_from(bad).is_err());
    }
}

#[test]
fn test_cli_config_file_with_flag_override() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config_path = temp_dir.path().join("features.json");
    std::fs::write(
        &config_path,
        r#"{"similarity": {"gamma": 0.2, "percentiles": [0.5]}, "long_duration": {"value": 600}}"#,
    )
    .unwrap();

    let cli = Cli::parse_from([
        "fareprep",
        "fit-transform",
        "-i",
        "flights.csv",
        "--config",
        config_path.to_str().unwrap(),
        "--gamma",
        "0.3",
    ]);
    let config = fit_transform_args(cli).features.to_config().unwrap();

    assert_eq!(config.similarity.gamma, 0.3, "flag wins over file");
    assert_eq!(config.similarity.percentiles, vec![0.5]);
    assert_eq!(config.long_duration.value, 600);
}

#[test]
fn test_cli_output_path_derivation() {
    let cli = Cli::parse_from(["fareprep", "fit-transform", "-i", "/path/to/flights.csv"]);
    assert_eq!(
        fit_transform_args(cli).output_path(),
        PathBuf::from("/path/to/flights_features.csv")
    );

    let cli = Cli::parse_from([
        "fareprep",
        "fit-transform",
        "-i",
        "/path/to/train.csv",
        "--apply",
        "/other/new.parquet",
    ]);
    assert_eq!(
        fit_transform_args(cli).output_path(),
        PathBuf::from("/other/new_features.parquet")
    );

    let cli = Cli::parse_from([
        "fareprep",
        "fit-transform",
        "-i",
        "train.csv",
        "-o",
        "custom.parquet",
    ]);
    assert_eq!(
        fit_transform_args(cli).output_path(),
        PathBuf::from("custom.parquet")
    );
}

#[test]
fn test_cli_form_subcommand() {
    let cli = Cli::parse_from(["fareprep", "-vv", "form", "--train", "train.csv", "--gamma", "1"]);
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Form(args) => {
            assert_eq!(args.train, PathBuf::from("train.csv"));
            assert_eq!(args.features.gamma, Some(1.0));
        }
        other => panic!("expected form, got {:?}", other),
    }
}

#[test]
fn test_binary_fit_transform_writes_features() {
    let mut df = create_flight_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let refs_path = temp_dir.path().join("refs.json");

    Command::cargo_bin("fareprep")
        .unwrap()
        .args([
            "fit-transform",
            "-i",
            csv_path.to_str().unwrap(),
            "-t",
            "price",
            "--export-references",
            refs_path.to_str().unwrap(),
            "--no-confirm",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("FEATURE SUMMARY"));

    let output = temp_dir.path().join("flights_features.csv");
    let features = load_dataset(&output, 0).unwrap();
    assert_eq!(features.height(), df.height());
    assert_has_columns(&features, &["price", "dur__duration_rbf_50", "info__additional_info"]);

    let refs: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&refs_path).unwrap()).unwrap();
    assert_eq!(refs["similarity"][0]["variable"], "duration");
    assert_eq!(refs["metadata"]["training_rows"], 8);
}

#[test]
fn test_binary_apply_to_new_bookings() {
    let mut train = create_flight_dataframe();
    let (temp_dir, train_path) = create_temp_csv(&mut train);
    let mut new = create_new_bookings_dataframe();
    let (_new_dir, new_path) = create_temp_csv_named(&mut new, "new.csv");
    let output = temp_dir.path().join("scored.parquet");

    Command::cargo_bin("fareprep")
        .unwrap()
        .args([
            "fit-transform",
            "-i",
            train_path.to_str().unwrap(),
            "--apply",
            new_path.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-t",
            "price",
            "--no-confirm",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found"));

    let features = load_dataset(&output, 0).unwrap();
    assert_eq!(features.height(), 2);
    assert!(features.column("price").is_err());
}

#[test]
fn test_binary_reports_missing_columns() {
    let mut df = create_flight_dataframe().drop("duration").unwrap();
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    Command::cargo_bin("fareprep")
        .unwrap()
        .args(["fit-transform", "-i", csv_path.to_str().unwrap(), "--no-confirm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duration"));
}
