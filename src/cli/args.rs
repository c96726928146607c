//! Command-line argument definitions using clap

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::{DurationCategory, FeatureConfig, PartOfDay};

/// fareprep - Turn raw flight bookings into model-ready features
#[derive(Parser, Debug)]
#[command(name = "fareprep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    /// RUST_LOG takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the flight preprocessor on a training file and write engineered features
    FitTransform(FitTransformArgs),

    /// Fit on a training file, then enter one booking interactively and show its features
    Form(FormArgs),
}

#[derive(Args, Debug, Clone)]
pub struct FitTransformArgs {
    /// Training file (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file path (CSV or Parquet, determined by extension).
    /// Defaults to the transformed file's directory with a '_features' suffix
    /// (e.g., flights.csv → flights_features.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Transform this file with the preprocessor fitted on --input
    /// instead of transforming the training data itself
    #[arg(long)]
    pub apply: Option<PathBuf>,

    /// Target column copied unchanged into the output (e.g. price).
    /// Skipped with a warning when the transformed file lacks it.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Write fitted similarity reference values and the output schema as JSON
    #[arg(long)]
    pub export_references: Option<PathBuf>,

    /// Overwrite an existing output file without asking
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    #[command(flatten)]
    pub features: FeatureArgs,
}

impl FitTransformArgs {
    /// The file whose rows end up in the output.
    pub fn transformed_path(&self) -> &Path {
        self.apply.as_deref().unwrap_or(&self.input)
    }

    /// Get the output path, deriving it from the transformed file if not explicitly provided.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| derived_output_path(self.transformed_path()))
    }
}

#[derive(Args, Debug, Clone)]
pub struct FormArgs {
    /// Training file used to fit the preprocessor (CSV or Parquet)
    #[arg(long)]
    pub train: PathBuf,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    #[command(flatten)]
    pub features: FeatureArgs,
}

/// Feature engineering parameters shared by every command.
///
/// Flags override values from `--config`, which override the defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct FeatureArgs {
    /// JSON configuration file; see `FeatureConfig` for the layout
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// RBF kernel bandwidth for the duration similarity features
    #[arg(long, value_parser = validate_gamma)]
    pub gamma: Option<f64>,

    /// Comma-separated percentiles used as similarity reference points
    /// [default: 0.25,0.5,0.75]
    #[arg(long, value_delimiter = ',', value_parser = validate_percentile)]
    pub percentiles: Vec<f64>,

    /// Durations below this many minutes are "short" [default: 180]
    #[arg(long)]
    pub short_duration: Option<f64>,

    /// Durations below this many minutes are "medium" [default: 400]
    #[arg(long)]
    pub medium_duration: Option<f64>,

    /// Threshold in minutes for the duration_over flag [default: 1000]
    #[arg(long)]
    pub long_duration: Option<i64>,

    /// Part-of-day boundaries as four hours: morning,noon,evening,night [default: 4,12,16,20]
    #[arg(long, value_delimiter = ',')]
    pub day_parts: Vec<u32>,
}

impl FeatureArgs {
    /// Resolve the effective configuration and validate it.
    pub fn to_config(&self) -> Result<FeatureConfig> {
        let mut config = match &self.config {
            Some(path) => FeatureConfig::from_json_file(path)?,
            None => FeatureConfig::default(),
        };

        if let Some(gamma) = self.gamma {
            config.similarity.gamma = gamma;
        }
        if !self.percentiles.is_empty() {
            config.similarity.percentiles = self.percentiles.clone();
        }

        let short = self.short_duration.unwrap_or(config.duration.short);
        let medium = self.medium_duration.unwrap_or(config.duration.medium);
        config.duration =
            DurationCategory::new(short, medium).context("Invalid duration thresholds")?;

        if let Some(value) = self.long_duration {
            config.long_duration.value = value;
        }

        if !self.day_parts.is_empty() {
            let [morning, noon, evening, night] = <[u32; 4]>::try_from(self.day_parts.as_slice())
                .map_err(|_| {
                    anyhow::anyhow!(
                        "--day-parts expects exactly four hours, got {}",
                        self.day_parts.len()
                    )
                })?;
            config.part_of_day = PartOfDay::new(morning, noon, evening, night)
                .context("Invalid part-of-day boundaries")?;
        }

        config.validate().context("Invalid feature configuration")?;
        Ok(config)
    }
}

/// `{dir}/{stem}_features.{ext}` next to `input`.
pub fn derived_output_path(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv");
    parent.join(format!("{}_features.{}", stem, extension))
}

/// Validator for the gamma parameter
fn validate_gamma(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("gamma must be a positive number, got {}", value))
    }
}

/// Validator for a single percentile
fn validate_percentile(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "percentiles must be between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
