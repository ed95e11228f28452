use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::fetch_error::FetchError;
use crate::models::{DailyVariable, LocationQuery};

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Client for the public historical-weather archive
#[derive(Clone)]
pub struct ArchiveFetcher {
    client: reqwest::Client,
    url: String,
}

impl ArchiveFetcher {
    pub fn new(url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// Query parameters for one archive request
    pub fn query_params(query: &LocationQuery) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", query.latitude().to_string()),
            ("longitude", query.longitude().to_string()),
            ("start_date", query.start_date().format("%Y-%m-%d").to_string()),
            ("end_date", query.end_date().format("%Y-%m-%d").to_string()),
            ("daily", DailyVariable::query_list()),
            ("timezone", "auto".to_string()),
        ]
    }

    /// Fetch the daily series for a query.
    ///
    /// The payload is returned as untyped JSON so it can be stored exactly as
    /// the archive produced it.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_daily(&self, query: &LocationQuery) -> Result<Value, FetchError> {
        debug!("Sending HTTP request to weather archive");
        let response = self
            .client
            .get(&self.url)
            .query(&Self::query_params(query))
            .send()
            .await?;

        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            warn!("Weather archive returned error status {}", status);
            return Err(match status {
                StatusCode::BAD_REQUEST => FetchError::InvalidParameters,
                StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited,
                other => FetchError::Upstream(other.as_u16()),
            });
        }

        let body = response.text().await?;
        debug!("Retrieved archive payload, size: {} bytes", body.len());

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Weather archive returned invalid JSON: {}", e);
            FetchError::ParseError(e.to_string())
        })?;

        let points = data
            .pointer("/daily/time")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        debug!("Successfully fetched weather data with {} data points", points);

        Ok(data)
    }
}
