use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// A raw form value as typed by a user or sent by an HTTP client.
///
/// Browsers post numbers, terminals post text; both are accepted and parsed
/// by the validator. `null` and omitted fields become `Missing`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl FieldValue {
    /// Parse the value as a finite real number
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FieldValue::Missing => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Missing => write!(f, "<missing>"),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Unvalidated form payload: the body of `POST /store-weather-data` and the
/// input of a dashboard submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FormInput {
    #[serde(default)]
    #[schema(value_type = f64)]
    pub latitude: FieldValue,
    #[serde(default)]
    #[schema(value_type = f64)]
    pub longitude: FieldValue,
    #[serde(default)]
    #[schema(example = "2023-01-01")]
    pub start_date: Option<String>,
    #[serde(default)]
    #[schema(example = "2023-01-31")]
    pub end_date: Option<String>,
}

impl FormInput {
    pub fn new(
        latitude: impl Into<FieldValue>,
        longitude: impl Into<FieldValue>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }
}

/// A validated `(latitude, longitude, date range)` tuple.
///
/// Only the validator builds one, so holding a `LocationQuery` means the
/// coordinate and range invariants already hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationQuery {
    latitude: f64,
    longitude: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl LocationQuery {
    pub(crate) fn new(
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            latitude,
            longitude,
            start_date,
            end_date,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Number of calendar days covered, both endpoints included
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
