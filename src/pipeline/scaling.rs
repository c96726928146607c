//! Standard scaling of numeric features

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{FeatureError, Result};
use super::transform::{numeric_column, Fittable, Transform};

/// Parameters for one fitted column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: f64,
    pub std: f64,
}

/// Z-score scaling: `(x - mean) / std` with population statistics.
///
/// Fits every numeric column of the batch it sees. Columns with zero
/// variance are only centred.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Option<Vec<(String, ScalerParams)>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> Option<&[(String, ScalerParams)]> {
        self.params.as_deref()
    }
}

impl Transform for StandardScaler {
    fn name(&self) -> &str {
        "standard_scaler"
    }

    /// Replaces fitted columns in place; other columns pass through.
    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let params = self
            .params
            .as_ref()
            .ok_or_else(|| FeatureError::not_fitted(self.name()))?;

        let mut out = df.clone();
        for (name, p) in params {
            let column = numeric_column(df, name)?;
            let scaled: Float64Chunked = column
                .f64()?
                .into_iter()
                .map(|v| v.map(|x| (x - p.mean) / p.std))
                .collect();
            out.with_column(scaled.with_name(name.as_str().into()).into_series())?;
        }
        Ok(out)
    }
}

impl Fittable for StandardScaler {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let mut fitted = Vec::new();
        for column in df.get_columns() {
            if !column.dtype().is_primitive_numeric() {
                continue;
            }
            let name = column.name().to_string();
            let floats = column.cast(&DataType::Float64)?;
            let ca = floats.f64()?;
            let mean = ca.mean().unwrap_or(0.0);
            let std = match ca.std(0) {
                Some(s) if s > 0.0 && s.is_finite() => s,
                _ => 1.0,
            };
            debug!(column = %name, mean, std, "fitted scaler");
            fitted.push((name, ScalerParams { mean, std }));
        }
        self.params = Some(fitted);
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.params.is_some()
    }
}
