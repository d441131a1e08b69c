use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_TIME_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Anything the backend might hand us as a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

impl From<DateTime<Local>> for Timestamp {
    fn from(at: DateTime<Local>) -> Self {
        Timestamp::Millis(at.timestamp_millis())
    }
}

impl From<&str> for Timestamp {
    fn from(text: &str) -> Self {
        Timestamp::Text(text.to_string())
    }
}

pub fn parse_timestamp(input: &Timestamp) -> Option<DateTime<Local>> {
    match input {
        Timestamp::Millis(ms) => Local.timestamp_millis_opt(*ms).single(),
        Timestamp::Fractional(ms) => {
            // i64 conversion saturates, so bound the range first
            if ms.is_finite() && ms.abs() < 8.64e15 {
                Local.timestamp_millis_opt(*ms as i64).single()
            } else {
                None
            }
        }
        Timestamp::Text(text) => parse_text(text.trim()),
    }
}

fn parse_text(text: &str) -> Option<DateTime<Local>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Local));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Local
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .earliest();
    }
    text.parse::<i64>()
        .ok()
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
}

/// Time of day for `input`, or for now when `input` is not a usable time.
pub fn format_timestamp(input: &Timestamp) -> String {
    format_with(input, TIME_FORMAT)
}

/// Date and time for `input`, or for now when `input` is not a usable time.
pub fn format_date_time(input: &Timestamp) -> String {
    format_with(input, DATE_TIME_FORMAT)
}

pub fn format_time(at: &DateTime<Local>) -> String {
    at.format(TIME_FORMAT).to_string()
}

fn format_with(input: &Timestamp, format: &str) -> String {
    parse_timestamp(input)
        .unwrap_or_else(Local::now)
        .format(format)
        .to_string()
}
