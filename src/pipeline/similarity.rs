//! RBF percentile similarity features
//!
//! Learns a small set of reference points per numeric column (one per
//! configured percentile) and turns each value into its radial basis
//! similarity to every reference point:
//!
//! ```text
//! score = exp(-gamma * (value - reference)^2)
//! ```
//!
//! Scores lie in [0, 1] and are exactly 1.0 when the value equals the
//! reference point, so the downstream model sees smooth proximity signals
//! ("how close is this duration to the median duration") instead of raw
//! magnitudes. Mathematically a score is never 0, but in f64 it underflows
//! to exactly 0.0 once `gamma * (value - reference)^2` exceeds about 745,
//! e.g. durations more than ~86 minutes from a reference at `gamma = 0.1`.

use std::collections::HashMap;

use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{FeatureError, Result};
use super::transform::{numeric_column, Fittable, Transform};

/// Configuration for [`RbfPercentileSimilarity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Columns to transform. Empty means "every numeric column seen at fit".
    pub variables: Vec<String>,
    /// Quantile fractions in [0, 1], one reference point each.
    pub percentiles: Vec<f64>,
    /// Kernel bandwidth; larger values make similarity decay faster.
    pub gamma: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            variables: Vec::new(),
            percentiles: vec![0.25, 0.5, 0.75],
            gamma: 0.1,
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.percentiles.is_empty() {
            return Err(FeatureError::Configuration(
                "at least one percentile is required".to_string(),
            ));
        }
        if let Some(p) = self
            .percentiles
            .iter()
            .find(|p| !p.is_finite() || !(0.0..=1.0).contains(*p))
        {
            return Err(FeatureError::Configuration(format!(
                "percentiles must lie in [0, 1], got {}",
                p
            )));
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(FeatureError::Configuration(format!(
                "gamma must be a positive number, got {}",
                self.gamma
            )));
        }

        let mut suffixes: Vec<i64> = self.percentiles.iter().map(|p| percentile_suffix(*p)).collect();
        suffixes.sort_unstable();
        if let Some(pair) = suffixes.windows(2).find(|w| w[0] == w[1]) {
            return Err(FeatureError::Configuration(format!(
                "percentiles produce duplicate feature suffix _rbf_{}",
                pair[0]
            )));
        }
        Ok(())
    }
}

/// `0.25 -> 25`; truncates toward zero so `0.999 -> 99`.
fn percentile_suffix(percentile: f64) -> i64 {
    (percentile * 100.0) as i64
}

/// Name of the similarity feature for `column` at `percentile`.
pub fn rbf_feature_name(column: &str, percentile: f64) -> String {
    format!("{}_rbf_{}", column, percentile_suffix(percentile))
}

/// Radial basis similarity between two scalars.
#[inline]
pub fn rbf_kernel(value: f64, reference: f64, gamma: f64) -> f64 {
    let diff = value - reference;
    (-gamma * diff * diff).exp()
}

/// Fit/transform generator of kernel similarity features.
#[derive(Debug, Clone, Serialize)]
pub struct RbfPercentileSimilarity {
    variables: Vec<String>,
    percentiles: Vec<f64>,
    gamma: f64,
    reference_values: Option<HashMap<String, Vec<f64>>>,
}

impl Default for RbfPercentileSimilarity {
    fn default() -> Self {
        Self {
            variables: Vec::new(),
            percentiles: vec![0.25, 0.5, 0.75],
            gamma: 0.1,
            reference_values: None,
        }
    }
}

impl RbfPercentileSimilarity {
    /// Create an unfitted generator, rejecting invalid configuration.
    pub fn new(config: SimilarityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            variables: config.variables,
            percentiles: config.percentiles,
            gamma: config.gamma,
            reference_values: None,
        })
    }

    /// Learn one reference point per percentile for every selected column.
    ///
    /// When no variables were configured, every numeric column of `df` is
    /// selected and that selection is kept for all later fits and transforms.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        if self.variables.is_empty() {
            let selected: Vec<String> = df
                .get_columns()
                .iter()
                .filter(|col| col.dtype().is_primitive_numeric())
                .map(|col| col.name().to_string())
                .collect();
            if selected.is_empty() {
                return Err(FeatureError::Schema(
                    "no numeric columns to select for similarity features".to_string(),
                ));
            }
            debug!(variables = ?selected, "auto-selected numeric variables");
            self.variables = selected;
        }

        let mut references = HashMap::with_capacity(self.variables.len());
        for name in &self.variables {
            let column = numeric_column(df, name)?;
            let ca = column.f64()?;
            let points = self
                .percentiles
                .iter()
                .map(|&p| {
                    ca.quantile(p, QuantileMethod::Linear)?.ok_or_else(|| {
                        FeatureError::Schema(format!(
                            "column '{}' has no values to compute percentile {} from",
                            name, p
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            debug!(column = %name, references = ?points, "fitted reference values");
            references.insert(name.clone(), points);
        }

        self.reference_values = Some(references);
        Ok(self)
    }

    /// Fit on `df` and return its similarity features.
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?.transform(df)
    }

    /// Similarity features for every selected column, and nothing else.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let references = self
            .reference_values
            .as_ref()
            .ok_or_else(|| FeatureError::not_fitted("rbf_percentile_similarity"))?;

        let per_variable = self
            .variables
            .par_iter()
            .map(|name| {
                let points = references
                    .get(name)
                    .ok_or_else(|| FeatureError::not_fitted("rbf_percentile_similarity"))?;
                self.similarity_columns(df, name, points)
            })
            .collect::<Result<Vec<Vec<Column>>>>()?;

        let columns: Vec<Column> = per_variable.into_iter().flatten().collect();
        if columns.is_empty() {
            return Ok(DataFrame::empty());
        }
        Ok(DataFrame::new(columns)?)
    }

    fn similarity_columns(
        &self,
        df: &DataFrame,
        name: &str,
        references: &[f64],
    ) -> Result<Vec<Column>> {
        let column = numeric_column(df, name)?;
        let ca = column.f64()?;
        if ca.null_count() > 0 {
            return Err(FeatureError::Schema(format!(
                "column '{}' contains {} missing value(s); similarity needs complete input",
                name,
                ca.null_count()
            )));
        }
        let values: Vec<f64> = ca.into_no_null_iter().collect();

        Ok(self
            .percentiles
            .iter()
            .zip(references)
            .map(|(&percentile, &reference)| {
                let scores: Vec<f64> = values
                    .iter()
                    .map(|&v| rbf_kernel(v, reference, self.gamma))
                    .collect();
                Column::new(rbf_feature_name(name, percentile).into(), scores)
            })
            .collect())
    }

    /// Selected columns, in output order. Empty until fit when auto-selecting.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn percentiles(&self) -> &[f64] {
        &self.percentiles
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Fitted reference points per column, in variable order.
    pub fn reference_values(&self) -> Option<Vec<(String, Vec<f64>)>> {
        let references = self.reference_values.as_ref()?;
        Some(
            self.variables
                .iter()
                .filter_map(|name| references.get(name).map(|r| (name.clone(), r.clone())))
                .collect(),
        )
    }

    /// Output column names, in output order.
    pub fn feature_names(&self) -> Vec<String> {
        self.variables
            .iter()
            .flat_map(|name| {
                self.percentiles
                    .iter()
                    .map(move |&p| rbf_feature_name(name, p))
            })
            .collect()
    }
}

impl Transform for RbfPercentileSimilarity {
    fn name(&self) -> &str {
        "rbf_percentile_similarity"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        RbfPercentileSimilarity::transform(self, df)
    }
}

impl Fittable for RbfPercentileSimilarity {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        RbfPercentileSimilarity::fit(self, df).map(|_| ())
    }

    fn is_fitted(&self) -> bool {
        self.reference_values.is_some()
    }
}
