//! Composing steps into pipelines
//!
//! - [`Pipeline`] runs steps one after another.
//! - [`FeatureUnion`] runs branches side by side on the same input and
//!   concatenates their outputs.
//! - [`ColumnTransformer`] routes column subsets to their own pipelines and
//!   prefixes each output column with the route name (`route__column`).
//!
//! All three are themselves [`Fittable`], so they nest freely.

use std::collections::HashSet;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{FeatureError, Result};
use super::transform::{frame_from_columns, require_column, Fittable, Step, Transform};

// ============================================================================
// Pipeline
// ============================================================================

/// Ordered sequence of named steps. An empty pipeline is the identity.
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    steps: Vec<(String, Step)>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn with_step(mut self, name: impl Into<String>, step: Step) -> Self {
        self.steps.push((name.into(), step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Fit every step on the output of the steps before it.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.fit_transform(df)?;
        Ok(self)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        let mut current = df.clone();
        for (name, step) in self.steps.iter_mut() {
            debug!(pipeline = %self.name, step = %name, "fitting step");
            current = step.fit_transform(&current)?;
        }
        Ok(current)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut current = df.clone();
        for (_, step) in &self.steps {
            current = step.transform(&current)?;
        }
        Ok(current)
    }
}

impl Transform for Pipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        Pipeline::transform(self, df)
    }
}

impl Fittable for Pipeline {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        Pipeline::fit(self, df).map(|_| ())
    }

    fn is_fitted(&self) -> bool {
        self.steps.iter().all(|(_, step)| step.is_fitted())
    }
}

// ============================================================================
// Feature union
// ============================================================================

/// Applies every branch to the same batch and joins the results column-wise,
/// in branch order.
#[derive(Debug)]
pub struct FeatureUnion {
    name: String,
    branches: Vec<(String, Step)>,
}

impl FeatureUnion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branches: Vec::new(),
        }
    }

    pub fn with_branch(mut self, name: impl Into<String>, step: Step) -> Self {
        self.branches.push((name.into(), step));
        self
    }
}

impl Transform for FeatureUnion {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let outputs = self
            .branches
            .iter()
            .map(|(_, step)| step.transform(df))
            .collect::<Result<Vec<DataFrame>>>()?;
        concat_horizontal(outputs)
    }
}

impl Fittable for FeatureUnion {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        for (name, step) in self.branches.iter_mut() {
            debug!(union = %self.name, branch = %name, "fitting branch");
            step.fit(df)?;
        }
        Ok(())
    }

    fn is_fitted(&self) -> bool {
        self.branches.iter().all(|(_, step)| step.is_fitted())
    }
}

/// Join batches column-wise, rejecting duplicate column names.
fn concat_horizontal(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for frame in frames {
        for column in frame.take_columns() {
            if !seen.insert(column.name().to_string()) {
                return Err(FeatureError::Schema(format!(
                    "duplicate output column '{}'",
                    column.name()
                )));
            }
            columns.push(column);
        }
    }
    frame_from_columns(columns)
}

// ============================================================================
// Column transformer
// ============================================================================

/// What happens to columns no route mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Remainder {
    #[default]
    Drop,
    Passthrough,
}

#[derive(Debug)]
struct Route {
    name: String,
    columns: Vec<String>,
    pipeline: Pipeline,
}

/// Routes column subsets through their own pipelines.
#[derive(Debug, Default)]
pub struct ColumnTransformer {
    routes: Vec<Route>,
    remainder: Remainder,
    remainder_columns: Option<Vec<String>>,
}

impl ColumnTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remainder(mut self, remainder: Remainder) -> Self {
        self.remainder = remainder;
        self
    }

    /// Send `columns` through `pipeline`; outputs are prefixed `{name}__`.
    pub fn with_route<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
        pipeline: Pipeline,
    ) -> Self {
        self.routes.push(Route {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            pipeline,
        });
        self
    }

    pub fn route_names(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.name.as_str()).collect()
    }

    /// Every input column a route consumes.
    pub fn input_columns(&self) -> Vec<&str> {
        self.routes
            .iter()
            .flat_map(|r| r.columns.iter().map(String::as_str))
            .collect()
    }

    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        for route in self.routes.iter_mut() {
            let slice = select_columns(df, &route.columns)?;
            info!(route = %route.name, columns = ?route.columns, "fitting route");
            route.pipeline.fit(&slice)?;
        }

        let routed: HashSet<&str> = self.input_columns().into_iter().collect();
        let remainder: Vec<String> = df
            .get_column_names()
            .into_iter()
            .filter(|name| !routed.contains(name.as_str()))
            .map(|name| name.to_string())
            .collect();
        self.remainder_columns = Some(remainder);
        Ok(self)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let remainder_columns = self
            .remainder_columns
            .as_ref()
            .ok_or_else(|| FeatureError::not_fitted("column_transformer"))?;

        let mut outputs = Vec::with_capacity(self.routes.len() + 1);
        for route in &self.routes {
            let slice = select_columns(df, &route.columns)?;
            let out = route.pipeline.transform(&slice)?;
            if out.height() != df.height() && out.width() > 0 {
                return Err(FeatureError::Schema(format!(
                    "route '{}' changed the row count from {} to {}",
                    route.name,
                    df.height(),
                    out.height()
                )));
            }
            outputs.push(prefix_columns(out, &route.name)?);
        }

        if self.remainder == Remainder::Passthrough {
            let rest = select_columns(df, remainder_columns)?;
            outputs.push(prefix_columns(rest, "remainder")?);
        }

        concat_horizontal(outputs)
    }
}

impl Transform for ColumnTransformer {
    fn name(&self) -> &str {
        "column_transformer"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        ColumnTransformer::transform(self, df)
    }
}

impl Fittable for ColumnTransformer {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        ColumnTransformer::fit(self, df).map(|_| ())
    }

    fn is_fitted(&self) -> bool {
        self.remainder_columns.is_some()
    }
}

fn select_columns(df: &DataFrame, names: &[String]) -> Result<DataFrame> {
    let columns = names
        .iter()
        .map(|name| require_column(df, name).cloned())
        .collect::<Result<Vec<Column>>>()?;
    frame_from_columns(columns)
}

fn prefix_columns(df: DataFrame, prefix: &str) -> Result<DataFrame> {
    let columns: Vec<Column> = df
        .take_columns()
        .into_iter()
        .map(|mut column| {
            let renamed = format!("{}__{}", prefix, column.name());
            column.rename(renamed.into());
            column
        })
        .collect();
    frame_from_columns(columns)
}
