//! A single flight booking as entered by a user

use chrono::{NaiveDate, NaiveTime};
use polars::prelude::*;

use super::error::{FeatureError, Result};

/// One booking, ready to be turned into a one-row batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    pub airline: String,
    pub date_of_journey: NaiveDate,
    pub source: String,
    pub destination: String,
    pub dep_time: NaiveTime,
    pub arrival_time: NaiveTime,
    /// Minutes
    pub duration: u32,
    pub total_stops: u32,
    pub additional_info: String,
}

impl FlightRecord {
    /// Reject bookings the preprocessor could not sensibly score.
    pub fn validate(&self) -> Result<()> {
        if self.source == self.destination {
            return Err(FeatureError::Schema(format!(
                "source and destination cannot be the same city ({})",
                self.source
            )));
        }
        Ok(())
    }

    /// One-row batch with dates and times rendered as strings.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        self.validate()?;
        let df = df! {
            "airline" => [self.airline.as_str()],
            "date_of_journey" => [self.date_of_journey.format("%Y-%m-%d").to_string()],
            "source" => [self.source.as_str()],
            "destination" => [self.destination.as_str()],
            "dep_time" => [self.dep_time.format("%H:%M:%S").to_string()],
            "arrival_time" => [self.arrival_time.format("%H:%M:%S").to_string()],
            "duration" => [i64::from(self.duration)],
            "total_stops" => [i64::from(self.total_stops)],
            "additional_info" => [self.additional_info.as_str()],
        }?;
        Ok(df)
    }
}
