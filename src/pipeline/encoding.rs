//! Categorical encoders that chain with the feature transforms
//!
//! [`OneHotEncoder`] learns its categories at fit time;
//! [`OrdinalEncoder`] is given an explicit order up front.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{FeatureError, Result};
use super::transform::{frame_from_columns, string_column, Fittable, Transform};

/// One indicator column per category seen at fit time.
///
/// Output columns are named `{column}_{category}`. Values not seen at fit
/// time (and missing values) encode as all zeros.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Option<Vec<(String, Vec<String>)>>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learned categories per column, sorted.
    pub fn categories(&self) -> Option<&[(String, Vec<String>)]> {
        self.categories.as_deref()
    }
}

impl Transform for OneHotEncoder {
    fn name(&self) -> &str {
        "one_hot_encoder"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let categories = self
            .categories
            .as_ref()
            .ok_or_else(|| FeatureError::not_fitted(self.name()))?;

        let mut encoded = Vec::new();
        for (name, levels) in categories {
            let column = string_column(df, name)?;
            let values = column.str()?;
            for level in levels {
                let indicator: Vec<f64> = values
                    .into_iter()
                    .map(|v| if v == Some(level.as_str()) { 1.0 } else { 0.0 })
                    .collect();
                encoded.push(Column::new(format!("{}_{}", name, level).into(), indicator));
            }
        }
        frame_from_columns(encoded)
    }
}

impl Fittable for OneHotEncoder {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let mut learned = Vec::with_capacity(df.width());
        for name in df.get_column_names() {
            let column = string_column(df, name)?;
            let mut levels: Vec<String> = column
                .str()?
                .into_iter()
                .flatten()
                .map(str::to_string)
                .collect();
            levels.sort();
            levels.dedup();
            debug!(column = %name, categories = levels.len(), "one-hot categories learned");
            learned.push((name.to_string(), levels));
        }
        self.categories = Some(learned);
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.categories.is_some()
    }
}

/// Replace every column's values with their position in a fixed category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    categories: Vec<String>,
}

impl OrdinalEncoder {
    pub fn new<S: Into<String>>(categories: impl IntoIterator<Item = S>) -> Result<Self> {
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        if categories.is_empty() {
            return Err(FeatureError::Configuration(
                "ordinal encoder needs at least one category".to_string(),
            ));
        }
        let mut unique = categories.clone();
        unique.sort();
        unique.dedup();
        if unique.len() != categories.len() {
            return Err(FeatureError::Configuration(format!(
                "ordinal categories must be distinct: {:?}",
                categories
            )));
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

impl Transform for OrdinalEncoder {
    fn name(&self) -> &str {
        "ordinal_encoder"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut out = df.clone();
        for name in df.get_column_names() {
            let column = string_column(df, name)?;
            let codes = column
                .str()?
                .into_iter()
                .map(|value| match value {
                    None => Ok(None),
                    Some(v) => self
                        .categories
                        .iter()
                        .position(|c| c == v)
                        .map(|idx| Some(idx as f64))
                        .ok_or_else(|| {
                            FeatureError::Schema(format!(
                                "unknown category '{}' in column '{}'",
                                v, name
                            ))
                        }),
                })
                .collect::<Result<Vec<Option<f64>>>>()?;
            out.with_column(Column::new(name.clone(), codes))?;
        }
        Ok(out)
    }
}
