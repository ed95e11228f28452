//! Input validation for weather queries
//!
//! Pure functions shared by the backend (`POST /store-weather-data`) and the
//! dashboard client. Checks run in a fixed order, latitude then longitude then
//! the date range, and stop at the first failure.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

use crate::models::{FieldValue, FormInput, LocationQuery};

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Largest allowed `end - start` difference, in days
pub const MAX_RANGE_DAYS: i64 = 730;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coordinate {
    Latitude,
    Longitude,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Latitude => f.write_str("Latitude"),
            Coordinate::Longitude => f.write_str("Longitude"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Start => f.write_str("Start date"),
            DateField::End => f.write_str("End date"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a valid number")]
    InvalidNumber { field: Coordinate },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: Coordinate,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{0} is required")]
    MissingDate(DateField),
    #[error("{field} must be in YYYY-MM-DD format (got '{value}')")]
    InvalidDate { field: DateField, value: String },
    #[error("Start date must be before or equal to end date")]
    InvertedRange,
    #[error("End date cannot be in the future")]
    FutureDate,
    #[error("Date range cannot exceed {max} days (got {days})")]
    RangeTooLarge { days: i64, max: i64 },
}

/// Current calendar day used for the future-date check
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn validate_latitude(value: &FieldValue) -> Result<f64, ValidationError> {
    validate_coordinate(value, Coordinate::Latitude, MIN_LATITUDE, MAX_LATITUDE)
}

pub fn validate_longitude(value: &FieldValue) -> Result<f64, ValidationError> {
    validate_coordinate(value, Coordinate::Longitude, MIN_LONGITUDE, MAX_LONGITUDE)
}

fn validate_coordinate(
    value: &FieldValue,
    field: Coordinate,
    min: f64,
    max: f64,
) -> Result<f64, ValidationError> {
    let parsed = value
        .as_number()
        .ok_or(ValidationError::InvalidNumber { field })?;

    if !(min..=max).contains(&parsed) {
        return Err(ValidationError::OutOfRange {
            field,
            value: parsed,
            min,
            max,
        });
    }

    Ok(parsed)
}

/// Parse a calendar date, stripping any time-of-day component.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_date(value: &str, field: DateField) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .ok_or_else(|| ValidationError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })
}

fn required_date(value: Option<&str>, field: DateField) -> Result<&str, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingDate(field)),
    }
}

pub fn validate_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    validate_date_range_as_of(start, end, today())
}

/// Date range check against an explicit reference day
pub fn validate_date_range_as_of(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let start = required_date(start, DateField::Start)?;
    let end = required_date(end, DateField::End)?;

    let start = parse_date(start, DateField::Start)?;
    let end = parse_date(end, DateField::End)?;

    if start > end {
        return Err(ValidationError::InvertedRange);
    }

    if end > today {
        return Err(ValidationError::FutureDate);
    }

    let days = (end - start).num_days().abs();
    if days > MAX_RANGE_DAYS {
        return Err(ValidationError::RangeTooLarge {
            days,
            max: MAX_RANGE_DAYS,
        });
    }

    Ok((start, end))
}

pub fn validate_query(form: &FormInput) -> Result<LocationQuery, ValidationError> {
    validate_query_as_of(form, today())
}

pub fn validate_query_as_of(
    form: &FormInput,
    today: NaiveDate,
) -> Result<LocationQuery, ValidationError> {
    let latitude = validate_latitude(&form.latitude)?;
    let longitude = validate_longitude(&form.longitude)?;
    let (start_date, end_date) =
        validate_date_range_as_of(form.start_date.as_deref(), form.end_date.as_deref(), today)?;

    Ok(LocationQuery::new(latitude, longitude, start_date, end_date))
}
