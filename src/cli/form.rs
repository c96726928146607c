//! Interactive booking form

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::pipeline::{parse_date, FlightRecord};

pub const AIRLINES: [&str; 8] = [
    "Jet Airways",
    "Indigo",
    "Air India",
    "Multiple Carriers",
    "Spicejet",
    "Vistara",
    "Air Asia",
    "Goair",
];

pub const SOURCES: [&str; 5] = ["Mumbai", "Delhi", "Kolkata", "Banglore", "Chennai"];

pub const DESTINATIONS: [&str; 6] = [
    "Hyderabad",
    "Cochin",
    "Banglore",
    "Delhi",
    "New Delhi",
    "Kolkata",
];

pub const ADDITIONAL_INFO: [&str; 7] = [
    "No Info",
    "In-Flight Meal Not Included",
    "No Check-In Baggage Included",
    "1 Long Layover",
    "Change Airports",
    "Business Class",
    "Red-Eye Flight",
];

pub const MIN_DURATION: u32 = 30;
pub const MAX_STOPS: u32 = 5;

/// Walk the user through every booking field.
///
/// Source and destination are asked again until they differ.
pub fn collect_flight_record() -> Result<FlightRecord> {
    let theme = ColorfulTheme::default();

    let airline = select(&theme, "Airline", &AIRLINES)?;
    let date_of_journey = Input::<String>::with_theme(&theme)
        .with_prompt("Date of journey (YYYY-MM-DD)")
        .default(chrono::Local::now().date_naive().format("%Y-%m-%d").to_string())
        .validate_with(|raw: &String| -> Result<(), String> {
            parse_form_date(raw).map(|_| ())
        })
        .interact_text()?;
    let date_of_journey = parse_form_date(&date_of_journey).map_err(anyhow::Error::msg)?;

    let (source, destination) = loop {
        let source = select(&theme, "Source airport", &SOURCES)?;
        let destination = select(&theme, "Destination airport", &DESTINATIONS)?;
        if source != destination {
            break (source, destination);
        }
        crate::utils::print_warning("Source and destination cannot be the same city.");
    };

    let dep_time = time_input(&theme, "Departure time (HH:MM)")?;
    let arrival_time = time_input(&theme, "Arrival time (HH:MM)")?;

    let duration = Input::<u32>::with_theme(&theme)
        .with_prompt("Duration (minutes)")
        .default(120)
        .validate_with(|d: &u32| -> Result<(), String> {
            if *d >= MIN_DURATION {
                Ok(())
            } else {
                Err(format!("duration must be at least {} minutes", MIN_DURATION))
            }
        })
        .interact_text()?;

    let total_stops = Input::<u32>::with_theme(&theme)
        .with_prompt("Total stops")
        .default(0)
        .validate_with(|s: &u32| -> Result<(), String> {
            if *s <= MAX_STOPS {
                Ok(())
            } else {
                Err(format!("at most {} stops", MAX_STOPS))
            }
        })
        .interact_text()?;

    let additional_info = select(&theme, "Additional info", &ADDITIONAL_INFO)?;

    let record = FlightRecord {
        airline,
        date_of_journey,
        source,
        destination,
        dep_time,
        arrival_time,
        duration,
        total_stops,
        additional_info,
    };
    record.validate().context("Invalid booking")?;
    Ok(record)
}

fn select(theme: &ColorfulTheme, prompt: &str, options: &[&str]) -> Result<String> {
    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(options)
        .default(0)
        .interact()?;
    Ok(options[index].to_string())
}

fn time_input(theme: &ColorfulTheme, prompt: &str) -> Result<NaiveTime> {
    let raw = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .default("00:00".to_string())
        .validate_with(|raw: &String| -> Result<(), String> {
            parse_form_time(raw).map(|_| ())
        })
        .interact_text()?;
    parse_form_time(&raw).map_err(anyhow::Error::msg)
}

/// Parse a date typed into the form.
pub fn parse_form_date(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw.trim()).ok_or_else(|| format!("'{}' is not a date like 2019-03-24", raw))
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_form_time(raw: &str) -> Result<NaiveTime, String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("'{}' is not a time like 22:20", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_time() {
        assert_eq!(
            parse_form_time("22:20").unwrap(),
            NaiveTime::from_hms_opt(22, 20, 0).unwrap()
        );
        assert_eq!(
            parse_form_time(" 05:50:30 ").unwrap(),
            NaiveTime::from_hms_opt(5, 50, 30).unwrap()
        );
        assert!(parse_form_time("25:00").is_err());
        assert!(parse_form_time("noon").is_err());
    }

    #[test]
    fn test_parse_form_date() {
        assert_eq!(
            parse_form_date("2019-03-24").unwrap(),
            NaiveDate::from_ymd_opt(2019, 3, 24).unwrap()
        );
        assert!(parse_form_date("24th March").is_err());
    }
}
