// Shared fixtures for integration tests
#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use weather_archive_service::models::{DailyVariable, FormInput, LocationQuery};
use weather_archive_service::validation::validate_query_as_of;

/// Fixed "today" so date-range checks do not depend on the clock
pub fn reference_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

/// New York City, January 2023
pub fn nyc_january_form() -> FormInput {
    FormInput::new(40.7128, -74.0060, "2023-01-01", "2023-01-31")
}

pub fn nyc_january_query() -> LocationQuery {
    validate_query_as_of(&nyc_january_form(), reference_day()).unwrap()
}

/// Archive-shaped payload with `days` dates starting at `start` and all six
/// variables filled with distinct values.
pub fn archive_payload(start: NaiveDate, days: usize) -> Value {
    let time: Vec<String> = (0..days)
        .map(|i| (start + Duration::days(i as i64)).format("%Y-%m-%d").to_string())
        .collect();

    let mut daily = serde_json::Map::new();
    daily.insert("time".to_string(), json!(time));
    for (v, variable) in DailyVariable::ALL.iter().enumerate() {
        let values: Vec<f64> = (0..days)
            .map(|i| (v as f64) * 10.0 + (i as f64) / 4.0 - 5.0)
            .collect();
        daily.insert(variable.api_name().to_string(), json!(values));
    }

    json!({
        "latitude": 40.710335,
        "longitude": -73.99307,
        "generationtime_ms": 0.42,
        "utc_offset_seconds": -18000,
        "timezone": "America/New_York",
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C",
            "temperature_2m_mean": "°C",
            "apparent_temperature_max": "°C",
            "apparent_temperature_min": "°C",
            "apparent_temperature_mean": "°C"
        },
        "daily": Value::Object(daily)
    })
}

pub fn nyc_january_payload() -> Value {
    archive_payload(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 31)
}
