//! Error types for feature transforms.
//!
//! Every transform in this crate returns [`FeatureError`]. Configuration
//! problems are caught when a transform is constructed, schema problems when
//! a batch is transformed, and `NotFitted` when a fittable step is used
//! before `fit`.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while configuring, fitting or applying a transform.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// `transform` was called on a fittable step that has not been fitted.
    #[error("{transformer} is not fitted yet; call fit before transform")]
    NotFitted {
        /// Name of the step that was used too early
        transformer: String,
    },

    /// A column the transform needs is not present in the batch.
    /// Counts as a schema error; see [`FeatureError::is_schema`].
    #[error("column '{column}' not found in batch")]
    MissingColumn { column: String },

    /// The batch is structurally valid but its contents cannot be transformed
    /// (wrong dtype, unparseable timestamp, missing value fed to a kernel).
    #[error("schema error: {0}")]
    Schema(String),

    /// A transform parameter was rejected at construction time.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Failure inside the dataframe engine.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl FeatureError {
    /// True for every batch-shape problem: [`FeatureError::Schema`] and
    /// [`FeatureError::MissingColumn`].
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            FeatureError::Schema(_) | FeatureError::MissingColumn { .. }
        )
    }

    pub(crate) fn not_fitted(transformer: &str) -> Self {
        FeatureError::NotFitted {
            transformer: transformer.to_string(),
        }
    }

    pub(crate) fn missing_column(column: &str) -> Self {
        FeatureError::MissingColumn {
            column: column.to_string(),
        }
    }
}

/// Result alias used throughout the pipeline module.
pub type Result<T> = std::result::Result<T, FeatureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_fitted_message_names_transformer() {
        let err = FeatureError::not_fitted("rbf_percentile_similarity");
        assert!(err.to_string().contains("rbf_percentile_similarity"));
        assert!(err.to_string().contains("not fitted"));
    }

    #[test]
    fn test_missing_column_message() {
        let err = FeatureError::missing_column("duration");
        assert_eq!(err.to_string(), "column 'duration' not found in batch");
    }

    #[test]
    fn test_is_schema_covers_missing_columns() {
        assert!(FeatureError::missing_column("duration").is_schema());
        assert!(FeatureError::Schema("bad timestamp".to_string()).is_schema());
        assert!(!FeatureError::not_fitted("scaler").is_schema());
        assert!(!FeatureError::Configuration("gamma".to_string()).is_schema());
    }
}
