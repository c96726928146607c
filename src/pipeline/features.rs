//! Column transform functions for flight booking attributes
//!
//! Each function takes a batch slice and returns a new batch with derived
//! columns. The free functions use default parameters; the structs carry
//! validated parameters and implement [`Transform`] so they can sit in a
//! pipeline.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{FeatureError, Result};
use super::transform::{frame_from_columns, numeric_column, string_column, Transform};

/// Cities treated as northern hubs.
pub const NORTH_CITIES: [&str; 4] = ["Delhi", "Kolkata", "Mumbai", "New Delhi"];

/// Value of `additional_info` meaning "nothing to report".
pub const NO_INFO: &str = "No Info";

pub const DURATION_COLUMN: &str = "duration";
pub const TOTAL_STOPS_COLUMN: &str = "total_stops";
pub const ADDITIONAL_INFO_COLUMN: &str = "additional_info";

/// Flag every column: 1 when the city is in [`NORTH_CITIES`].
pub fn is_north(df: &DataFrame) -> Result<DataFrame> {
    NorthFlag.transform(df)
}

/// Bucket every column's hour of day using the default boundaries.
pub fn part_of_day(df: &DataFrame) -> Result<DataFrame> {
    PartOfDay::default().transform(df)
}

/// Bucket `duration` into short / medium / long using the default thresholds.
pub fn duration_category(df: &DataFrame) -> Result<DataFrame> {
    DurationCategory::default().transform(df)
}

/// Flag durations of at least 1000 minutes.
pub fn is_over(df: &DataFrame) -> Result<DataFrame> {
    DurationOver::default().transform(df)
}

/// Add `is_direct_flight`, keeping `total_stops`.
pub fn is_direct(df: &DataFrame) -> Result<DataFrame> {
    DirectFlight.transform(df)
}

/// Overwrite `additional_info` with a 0/1 presence flag.
pub fn have_info(df: &DataFrame) -> Result<DataFrame> {
    InfoPresence.transform(df)
}

/// Expand every date column into calendar features.
pub fn date_features(df: &DataFrame) -> Result<DataFrame> {
    DateFeatures.transform(df)
}

// ============================================================================
// North flag
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct NorthFlag;

impl Transform for NorthFlag {
    fn name(&self) -> &str {
        "is_north"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut derived = Vec::with_capacity(df.width());
        for name in df.get_column_names() {
            let column = string_column(df, name)?;
            let flags: Vec<i32> = column
                .str()?
                .into_iter()
                .map(|city| i32::from(city.is_some_and(|c| NORTH_CITIES.contains(&c))))
                .collect();
            derived.push(Column::new(format!("{}_is_north", name).into(), flags));
        }
        frame_from_columns(derived)
    }
}

// ============================================================================
// Part of day
// ============================================================================

/// Hour boundaries for [`PartOfDay`]. Intervals are half-open:
/// `[morning, noon)`, `[noon, evening)`, `[evening, night)`; everything else is night.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartOfDay {
    pub morning: u32,
    pub noon: u32,
    pub evening: u32,
    pub night: u32,
}

impl Default for PartOfDay {
    fn default() -> Self {
        Self {
            morning: 4,
            noon: 12,
            evening: 16,
            night: 20,
        }
    }
}

impl PartOfDay {
    pub fn new(morning: u32, noon: u32, evening: u32, night: u32) -> Result<Self> {
        let part = Self {
            morning,
            noon,
            evening,
            night,
        };
        part.validate()?;
        Ok(part)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.morning < self.noon && self.noon < self.evening && self.evening < self.night)
            || self.night > 24
        {
            return Err(FeatureError::Configuration(format!(
                "part-of-day boundaries must satisfy 0 <= morning < noon < evening < night <= 24, got {}/{}/{}/{}",
                self.morning, self.noon, self.evening, self.night
            )));
        }
        Ok(())
    }

    /// Category for an hour in `0..24`.
    pub fn label(&self, hour: u32) -> &'static str {
        if (self.morning..self.noon).contains(&hour) {
            "morning"
        } else if (self.noon..self.evening).contains(&hour) {
            "afternoon"
        } else if (self.evening..self.night).contains(&hour) {
            "evening"
        } else {
            "night"
        }
    }
}

impl Transform for PartOfDay {
    fn name(&self) -> &str {
        "part_of_day"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut derived = Vec::with_capacity(df.width());
        for name in df.get_column_names() {
            let column = string_column(df, name)?;
            let labels = column
                .str()?
                .into_iter()
                .map(|value| match value {
                    Some(raw) => parse_hour(raw)
                        .map(|hour| self.label(hour))
                        .ok_or_else(|| {
                            FeatureError::Schema(format!(
                                "cannot parse '{}' in column '{}' as a time of day",
                                raw, name
                            ))
                        }),
                    // No hour to bucket, falls through to the default bucket
                    None => Ok("night"),
                })
                .collect::<Result<Vec<&str>>>()?;
            derived.push(Column::new(
                format!("{}_part_of_the_day", name).into(),
                labels,
            ));
        }
        frame_from_columns(derived)
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Extract the hour from a time, date or datetime string.
/// A bare date has hour 0.
pub fn parse_hour(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Some(dt) = parse_datetime(raw) {
        return Some(dt.hour());
    }
    if let Some(time) = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
    {
        return Some(time.hour());
    }
    parse_date(raw).map(|_| 0)
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse a date, accepting a datetime string and discarding its time.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| parse_datetime(raw).map(|dt| dt.date()))
}

// ============================================================================
// Duration buckets
// ============================================================================

/// `duration < short` is "short", `short <= duration < medium` is "medium",
/// anything else (including missing) is "long".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationCategory {
    pub short: f64,
    pub medium: f64,
}

impl Default for DurationCategory {
    fn default() -> Self {
        Self {
            short: 180.0,
            medium: 400.0,
        }
    }
}

impl DurationCategory {
    pub fn new(short: f64, medium: f64) -> Result<Self> {
        let category = Self { short, medium };
        category.validate()?;
        Ok(category)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.short.is_finite() || !self.medium.is_finite() {
            return Err(FeatureError::Configuration(
                "duration thresholds must be finite".to_string(),
            ));
        }
        if self.short >= self.medium {
            return Err(FeatureError::Configuration(format!(
                "short duration threshold ({}) must be below the medium threshold ({})",
                self.short, self.medium
            )));
        }
        Ok(())
    }

    pub fn label(&self, duration: Option<f64>) -> &'static str {
        match duration {
            Some(d) if d < self.short => "short",
            Some(d) if d >= self.short && d < self.medium => "medium",
            _ => "long",
        }
    }
}

impl Transform for DurationCategory {
    fn name(&self) -> &str {
        "duration_category"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let duration = numeric_column(df, DURATION_COLUMN)?;
        let labels: Vec<&str> = duration
            .f64()?
            .into_iter()
            .map(|d| self.label(d))
            .collect();
        replace_duration(df, Column::new("duration_cat".into(), labels))
    }
}

/// Flag durations at or above `value` minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationOver {
    pub value: i64,
}

impl Default for DurationOver {
    fn default() -> Self {
        Self { value: 1000 }
    }
}

impl DurationOver {
    pub fn new(value: i64) -> Self {
        Self { value }
    }

    pub fn feature_name(&self) -> String {
        format!("duration_over_{}", self.value)
    }
}

impl Transform for DurationOver {
    fn name(&self) -> &str {
        "is_over"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let duration = numeric_column(df, DURATION_COLUMN)?;
        let threshold = self.value as f64;
        let flags: Vec<i32> = duration
            .f64()?
            .into_iter()
            .map(|d| i32::from(d.is_some_and(|d| d >= threshold)))
            .collect();
        replace_duration(df, Column::new(self.feature_name().into(), flags))
    }
}

/// Append `derived` and drop `duration`; other columns pass through.
fn replace_duration(df: &DataFrame, derived: Column) -> Result<DataFrame> {
    let mut out = df.clone();
    out.with_column(derived)?;
    Ok(out.drop(DURATION_COLUMN)?)
}

// ============================================================================
// Stops and additional info
// ============================================================================

/// Adds `is_direct_flight`; `total_stops` is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectFlight;

impl Transform for DirectFlight {
    fn name(&self) -> &str {
        "is_direct"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let stops = numeric_column(df, TOTAL_STOPS_COLUMN)?;
        let flags: Vec<i32> = stops
            .f64()?
            .into_iter()
            .map(|s| i32::from(s == Some(0.0)))
            .collect();
        let mut out = df.clone();
        out.with_column(Column::new("is_direct_flight".into(), flags))?;
        Ok(out)
    }
}

/// Rewrites `additional_info` in place: 0 for "No Info", 1 otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoPresence;

impl Transform for InfoPresence {
    fn name(&self) -> &str {
        "have_info"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let info = string_column(df, ADDITIONAL_INFO_COLUMN)?;
        let flags: Vec<i32> = info
            .str()?
            .into_iter()
            .map(|v| i32::from(v != Some(NO_INFO)))
            .collect();
        let mut out = df.clone();
        out.with_column(Column::new(ADDITIONAL_INFO_COLUMN.into(), flags))?;
        Ok(out)
    }
}

// ============================================================================
// Calendar features
// ============================================================================

/// Month, ISO week, weekday (Monday = 0) and day of year for each date column.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFeatures;

impl Transform for DateFeatures {
    fn name(&self) -> &str {
        "date_features"
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut derived = Vec::with_capacity(df.width() * 4);
        for name in df.get_column_names() {
            let column = string_column(df, name)?;
            let dates = column
                .str()?
                .into_iter()
                .map(|value| {
                    value
                        .map(|raw| {
                            parse_date(raw).ok_or_else(|| {
                                FeatureError::Schema(format!(
                                    "cannot parse '{}' in column '{}' as a date",
                                    raw, name
                                ))
                            })
                        })
                        .transpose()
                })
                .collect::<Result<Vec<Option<NaiveDate>>>>()?;

            let extract = |f: fn(&NaiveDate) -> i32| -> Vec<Option<i32>> {
                dates.iter().map(|d| d.as_ref().map(f)).collect()
            };
            derived.push(Column::new(
                format!("{}_month", name).into(),
                extract(|d| d.month() as i32),
            ));
            derived.push(Column::new(
                format!("{}_week", name).into(),
                extract(|d| d.iso_week().week() as i32),
            ));
            derived.push(Column::new(
                format!("{}_day_of_week", name).into(),
                extract(|d| d.weekday().num_days_from_monday() as i32),
            ));
            derived.push(Column::new(
                format!("{}_day_of_year", name).into(),
                extract(|d| d.ordinal() as i32),
            ));
        }
        frame_from_columns(derived)
    }
}
