//! JSON export of fitted similarity references and the output schema

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::pipeline::{
    rbf_feature_name, FeatureConfig, FeatureError, RbfPercentileSimilarity, Transform,
};

/// Metadata about the run that produced the export
#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub fareprep_version: String,
    pub input_file: String,
    pub training_rows: usize,
    /// Effective feature configuration
    pub config: FeatureConfig,
}

/// Fitted reference points for one variable
#[derive(Debug, Serialize)]
pub struct VariableReferences {
    pub variable: String,
    /// `(percentile, value)` pairs in configured order
    pub references: Vec<PercentileReference>,
    /// Names of the features this variable produces
    pub features: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PercentileReference {
    pub percentile: f64,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct OutputColumn {
    pub name: String,
    pub dtype: String,
}

/// Complete export document
#[derive(Debug, Serialize)]
pub struct ReferenceExport {
    pub metadata: ExportMetadata,
    pub gamma: f64,
    pub similarity: Vec<VariableReferences>,
    pub output_columns: Vec<OutputColumn>,
}

impl ReferenceExport {
    /// Assemble the export from a fitted similarity generator and the engineered batch.
    pub fn new(
        input_file: &str,
        training_rows: usize,
        config: &FeatureConfig,
        similarity: &RbfPercentileSimilarity,
        output: &DataFrame,
    ) -> std::result::Result<Self, FeatureError> {
        let fitted = similarity
            .reference_values()
            .ok_or_else(|| FeatureError::not_fitted(similarity.name()))?;

        let variables = fitted
            .into_iter()
            .map(|(variable, values)| {
                let references = similarity
                    .percentiles()
                    .iter()
                    .zip(values)
                    .map(|(&percentile, value)| PercentileReference { percentile, value })
                    .collect();
                let features = similarity
                    .percentiles()
                    .iter()
                    .map(|&p| rbf_feature_name(&variable, p))
                    .collect();
                VariableReferences {
                    variable,
                    references,
                    features,
                }
            })
            .collect();

        let output_columns = output
            .get_columns()
            .iter()
            .map(|c| OutputColumn {
                name: c.name().to_string(),
                dtype: c.dtype().to_string(),
            })
            .collect();

        Ok(Self {
            metadata: ExportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                fareprep_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.to_string(),
                training_rows,
                config: config.clone(),
            },
            gamma: similarity.gamma(),
            similarity: variables,
            output_columns,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize reference export to JSON")
    }

    /// Write the export to a JSON file
    pub fn write(&self, output_path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(output_path, json).with_context(|| {
            format!(
                "Failed to write reference export to {}",
                output_path.display()
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SimilarityConfig;
    use polars::prelude::*;

    #[test]
    fn test_export_lists_references_in_percentile_order() {
        let train = df! { "duration" => [1.0f64, 2.0, 3.0, 4.0, 5.0] }.unwrap();
        let mut rbf = RbfPercentileSimilarity::new(SimilarityConfig {
            variables: vec!["duration".to_string()],
            ..SimilarityConfig::default()
        })
        .unwrap();
        let out = rbf.fit_transform(&train).unwrap();

        let export =
            ReferenceExport::new("train.csv", 5, &FeatureConfig::default(), &rbf, &out).unwrap();
        assert_eq!(export.similarity.len(), 1);
        let values: Vec<f64> = export.similarity[0]
            .references
            .iter()
            .map(|r| r.value)
            .collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        assert_eq!(
            export.similarity[0].features,
            vec!["duration_rbf_25", "duration_rbf_50", "duration_rbf_75"]
        );

        let json: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(json["metadata"]["training_rows"], 5);
        assert_eq!(json["output_columns"][0]["name"], "duration_rbf_25");
    }

    #[test]
    fn test_export_requires_fitted_generator() {
        let rbf = RbfPercentileSimilarity::default();
        let out = DataFrame::empty();
        let err = ReferenceExport::new("x.csv", 0, &FeatureConfig::default(), &rbf, &out)
            .unwrap_err();
        assert!(matches!(err, FeatureError::NotFitted { .. }));
    }
}
