//! Run summary and feature-row tables

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::*;

/// Summary of one fit-transform run
#[derive(Debug, Default)]
pub struct FeatureSummary {
    pub train_rows: usize,
    pub output_rows: usize,
    pub input_columns: usize,
    pub output_columns: usize,
    /// Output width per route, in route order
    pub route_widths: Vec<(String, usize)>,
    pub target: Option<String>,
    pub timings: Vec<(String, Duration)>,
}

impl FeatureSummary {
    pub fn new(train: &DataFrame) -> Self {
        Self {
            train_rows: train.height(),
            input_columns: train.width(),
            ..Default::default()
        }
    }

    /// Record the engineered batch, counting columns per `{route}__` prefix.
    pub fn set_output(&mut self, output: &DataFrame, routes: &[&str]) {
        self.output_rows = output.height();
        self.output_columns = output.width();
        self.route_widths = route_widths(output, routes);
    }

    pub fn add_timing(&mut self, step: &str, elapsed: Duration) {
        self.timings.push((step.to_string(), elapsed));
    }

    pub fn total_time(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("FEATURE SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Training Rows"), Cell::new(self.train_rows)]);
        table.add_row(vec![Cell::new("📁 Input Columns"), Cell::new(self.input_columns)]);
        for (route, width) in &self.route_widths {
            table.add_row(vec![
                Cell::new(format!("   └ {}", route)),
                Cell::new(width).fg(if *width == 0 { Color::Red } else { Color::White }),
            ]);
        }
        if let Some(target) = &self.target {
            table.add_row(vec![Cell::new("🎯 Target"), Cell::new(target)]);
        }
        table.add_row(vec![Cell::new("📄 Output Rows"), Cell::new(self.output_rows)]);
        table.add_row(vec![
            Cell::new("✅ Output Columns"),
            Cell::new(self.output_columns)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.timings.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("⏱️").cyan(),
                style("TIMINGS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for (step, elapsed) in &self.timings {
                println!(
                    "      {:<24} {}",
                    step,
                    style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
                );
            }
            println!(
                "      {:<24} {}",
                style("Total").bold(),
                style(format!("{:.2}s", self.total_time().as_secs_f64())).yellow()
            );
        }
    }
}

/// Count output columns per `{route}__` prefix.
pub fn route_widths(output: &DataFrame, routes: &[&str]) -> Vec<(String, usize)> {
    routes
        .iter()
        .map(|route| {
            let prefix = format!("{}__", route);
            let width = output
                .get_column_names()
                .iter()
                .filter(|name| name.starts_with(prefix.as_str()))
                .count();
            (route.to_string(), width)
        })
        .collect()
}

/// Render the first row of `df` as a feature / value table.
pub fn feature_row_table(df: &DataFrame) -> PolarsResult<Table> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    for column in df.get_columns() {
        let value = column.get(0)?;
        let text = match value {
            AnyValue::Float64(v) => format!("{:.4}", v),
            AnyValue::Float32(v) => format!("{:.4}", v),
            AnyValue::Null => "null".to_string(),
            other => other.to_string(),
        };
        let cell = if text == "0.0000" || text == "0" {
            Cell::new(text).fg(Color::DarkGrey)
        } else {
            Cell::new(text)
        };
        table.add_row(vec![
            Cell::new(column.name().as_str()),
            cell.set_alignment(CellAlignment::Right),
        ]);
    }
    Ok(table)
}

/// Print the engineered features of a single booking.
pub fn display_feature_row(df: &DataFrame) -> PolarsResult<()> {
    let table = feature_row_table(df)?;
    println!();
    println!(
        "    {} {}",
        style("✈️").cyan(),
        style("ENGINEERED FEATURES").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
    Ok(())
}
