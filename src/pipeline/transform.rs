//! The transform contract shared by every preprocessing step
//!
//! Stateless steps implement [`Transform`] only. Steps that learn from
//! training data also implement [`Fittable`]. [`Step`] wraps either kind so
//! pipelines can hold them side by side.

use polars::prelude::*;

use super::error::{FeatureError, Result};

/// A step that maps a batch to a new batch.
pub trait Transform: Send + Sync {
    /// Short identifier used in logs and error messages.
    fn name(&self) -> &str;

    /// Apply the step. Implementations never mutate `self`.
    fn transform(&self, df: &DataFrame) -> Result<DataFrame>;
}

/// A step that must see training data before it can transform.
pub trait Fittable: Transform {
    /// Learn state from `df`, overwriting anything learned before.
    fn fit(&mut self, df: &DataFrame) -> Result<()>;

    fn is_fitted(&self) -> bool;
}

/// One step of a pipeline.
pub enum Step {
    Stateless(Box<dyn Transform>),
    Fittable(Box<dyn Fittable>),
}

impl Step {
    pub fn stateless<T: Transform + 'static>(step: T) -> Self {
        Step::Stateless(Box::new(step))
    }

    pub fn fittable<T: Fittable + 'static>(step: T) -> Self {
        Step::Fittable(Box::new(step))
    }

    pub fn name(&self) -> &str {
        match self {
            Step::Stateless(step) => step.name(),
            Step::Fittable(step) => step.name(),
        }
    }

    /// Stateless steps are always ready.
    pub fn is_fitted(&self) -> bool {
        match self {
            Step::Stateless(_) => true,
            Step::Fittable(step) => step.is_fitted(),
        }
    }

    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        match self {
            Step::Stateless(step) => step.transform(df),
            Step::Fittable(step) => step.transform(df),
        }
    }

    /// Fit a fittable step; no-op for stateless steps.
    pub fn fit(&mut self, df: &DataFrame) -> Result<()> {
        match self {
            Step::Stateless(_) => Ok(()),
            Step::Fittable(step) => step.fit(df),
        }
    }

    /// Fit (when the step is fittable) and transform the same batch.
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        match self {
            Step::Stateless(step) => step.transform(df),
            Step::Fittable(step) => {
                step.fit(df)?;
                step.transform(df)
            }
        }
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Stateless(step) => write!(f, "Stateless({})", step.name()),
            Step::Fittable(step) => write!(f, "Fittable({})", step.name()),
        }
    }
}

/// Look up a column, mapping absence to [`FeatureError::MissingColumn`].
pub(crate) fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| FeatureError::missing_column(name))
}

/// Cast a numeric column to Float64, rejecting non-numeric dtypes.
pub(crate) fn numeric_column(df: &DataFrame, name: &str) -> Result<Column> {
    let column = require_column(df, name)?;
    if !column.dtype().is_primitive_numeric() {
        return Err(FeatureError::Schema(format!(
            "column '{}' must be numeric, found {}",
            name,
            column.dtype()
        )));
    }
    Ok(column.cast(&DataType::Float64)?)
}

/// Render any column as strings so text parsers can work on it.
pub(crate) fn string_column(df: &DataFrame, name: &str) -> Result<Column> {
    let column = require_column(df, name)?;
    match column.dtype() {
        DataType::String => Ok(column.clone()),
        _ => Ok(column.cast(&DataType::String)?),
    }
}

/// Build a batch from freshly derived columns, keeping an empty input empty.
pub(crate) fn frame_from_columns(columns: Vec<Column>) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(DataFrame::empty());
    }
    Ok(DataFrame::new(columns)?)
}
