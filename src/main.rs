//! fareprep: flight fare feature engineering CLI

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use polars::prelude::DataFrame;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fareprep::cli::{collect_flight_record, confirm_overwrite, Cli, Commands, FitTransformArgs, FormArgs};
use fareprep::pipeline::{
    estimated_size_mb, flight_preprocessor, load_dataset, missing_flight_columns, save_dataset,
    ColumnTransformer, FeatureConfig, RbfPercentileSimilarity, SimilarityConfig, DURATION_COLUMN,
};
use fareprep::report::{display_feature_row, FeatureSummary, ReferenceExport};
use fareprep::utils::{
    print_banner, print_completion, print_config, print_count, print_info, print_step_header,
    print_step_time, print_success, print_warning, run_with_spinner,
};

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::FitTransform(args) => run_fit_transform(&args),
        Commands::Form(args) => run_form(&args),
    }
}

fn run_fit_transform(args: &FitTransformArgs) -> Result<()> {
    let config = args.features.to_config()?;
    let output_path = args.output_path();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &args.input,
        args.apply.as_deref(),
        args.target.as_deref(),
        &output_path,
        &config,
    );

    // Step 1: Load
    print_step_header(1, "Load Data");
    let (train, elapsed) = load_flights(&args.input, args.infer_schema_length)?;
    let mut summary = FeatureSummary::new(&train);
    summary.add_timing("Load", elapsed);

    let apply = match &args.apply {
        Some(path) => {
            let (df, elapsed) = load_flights(path, args.infer_schema_length)?;
            summary.add_timing("Load (apply)", elapsed);
            Some(df)
        }
        None => None,
    };

    // Step 2: Fit
    print_step_header(2, "Fit Preprocessor");
    let (preprocessor, elapsed) = fit_preprocessor(&config, &train)?;
    print_count("Fitted", preprocessor.route_names().len(), "column routes");
    summary.add_timing("Fit", elapsed);
    print_step_time(elapsed);

    // Step 3: Transform
    print_step_header(3, "Engineer Features");
    let source = apply.as_ref().unwrap_or(&train);
    let (mut features, elapsed) =
        run_with_spinner("Transforming rows...", "Features engineered", || {
            preprocessor.transform(source)
        })
        .context("Failed to transform the data")?;
    summary.set_output(&features, &preprocessor.route_names());

    if let Some(target) = &args.target {
        if attach_target(&mut features, source, target)? {
            summary.target = Some(target.clone());
        }
    }
    print_count("Produced", features.width(), "output columns");
    summary.output_columns = features.width();
    summary.add_timing("Transform", elapsed);
    print_step_time(elapsed);

    // Step 4: Save
    print_step_header(4, "Save Results");
    if !confirm_overwrite(&output_path, args.no_confirm)? {
        print_info("Output not written");
        return Ok(());
    }
    let (_, elapsed) = run_with_spinner(
        "Writing output file...",
        &format!("Saved to {}", output_path.display()),
        || save_dataset(&mut features, &output_path),
    )?;
    summary.add_timing("Save", elapsed);
    print_step_time(elapsed);

    if let Some(path) = &args.export_references {
        export_references(path, args, &config, &train, &features)?;
        print_success(&format!("References exported to {}", path.display()));
    }

    summary.display();
    print_completion();
    Ok(())
}

fn run_form(args: &FormArgs) -> Result<()> {
    let config = args.features.to_config()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_step_header(1, "Fit Preprocessor");
    let (train, _) = load_flights(&args.train, args.infer_schema_length)?;
    let (preprocessor, elapsed) = fit_preprocessor(&config, &train)?;
    print_step_time(elapsed);

    print_step_header(2, "Flight Details");
    let record = collect_flight_record()?;
    let row = record.to_dataframe()?;
    let features = preprocessor
        .transform(&row)
        .context("Failed to engineer features for the booking")?;
    info!(columns = features.width(), "booking transformed");

    display_feature_row(&features)?;
    print_completion();
    Ok(())
}

/// Load a flight file behind a spinner and check it carries every raw column.
fn load_flights(path: &Path, infer_schema_length: usize) -> Result<(DataFrame, Duration)> {
    let (df, elapsed) = run_with_spinner(
        &format!("Loading {}...", path.display()),
        "Dataset loaded",
        || load_dataset(path, infer_schema_length),
    )?;

    let missing = missing_flight_columns(&df);
    if !missing.is_empty() {
        anyhow::bail!(
            "{} is missing required column(s): {}",
            path.display(),
            missing.join(", ")
        );
    }

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", df.height());
    println!("      Columns: {}", df.width());
    println!("      Estimated memory: {:.2} MB", estimated_size_mb(&df));
    print_step_time(elapsed);
    Ok((df, elapsed))
}

fn fit_preprocessor(
    config: &FeatureConfig,
    train: &DataFrame,
) -> Result<(ColumnTransformer, Duration)> {
    let mut preprocessor = flight_preprocessor(config)?;
    let (_, elapsed) = run_with_spinner("Fitting preprocessor...", "Preprocessor fitted", || {
        preprocessor.fit(train).map(|_| ())
    })
    .context("Failed to fit the flight preprocessor")?;
    info!(routes = ?preprocessor.route_names(), "preprocessor fitted");
    Ok((preprocessor, elapsed))
}

/// Copy the target column from `source` onto the engineered batch.
/// Returns false when `source` has no such column.
fn attach_target(features: &mut DataFrame, source: &DataFrame, target: &str) -> Result<bool> {
    let Ok(column) = source.column(target) else {
        warn!(target, "target column not present in transformed data");
        print_warning(&format!(
            "Target column '{}' not found; output written without it",
            target
        ));
        return Ok(false);
    };
    features
        .with_column(column.clone())
        .with_context(|| format!("Failed to attach target column '{}'", target))?;
    Ok(true)
}

/// Refit the duration similarity generator on the training data and export its references.
fn export_references(
    path: &Path,
    args: &FitTransformArgs,
    config: &FeatureConfig,
    train: &DataFrame,
    features: &DataFrame,
) -> Result<()> {
    let similarity_config = SimilarityConfig {
        variables: if config.similarity.variables.is_empty() {
            vec![DURATION_COLUMN.to_string()]
        } else {
            config.similarity.variables.clone()
        },
        ..config.similarity.clone()
    };
    let mut similarity = RbfPercentileSimilarity::new(similarity_config)?;
    similarity.fit(train)?;

    let export = ReferenceExport::new(
        &args.input.display().to_string(),
        train.height(),
        config,
        &similarity,
        features,
    )?;
    export.write(path)
}
