use reqwest::Url;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::models::{LocationQuery, RawSeriesResponse, StoreReceipt};
use crate::transport_error::TransportError;

/// The backend as seen by the dashboard: store a query, read a stored file back.
pub trait WeatherBackend: Send + Sync {
    fn store(
        &self,
        query: &LocationQuery,
    ) -> impl Future<Output = Result<StoreReceipt, TransportError>> + Send;

    fn retrieve(
        &self,
        filename: &str,
    ) -> impl Future<Output = Result<RawSeriesResponse, TransportError>> + Send;
}

/// HTTP client for the backend's `/weather` routes
#[derive(Clone)]
pub struct HttpBackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    /// `base_url` is the prefix the routes hang off, e.g. `http://localhost:8080/weather`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            TransportError::RequestConstruction(format!(
                "invalid backend URL '{}': {e}",
                self.base_url
            ))
        })?;

        {
            let mut path = url.path_segments_mut().map_err(|_| {
                TransportError::RequestConstruction(format!(
                    "backend URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }

        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::from_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| TransportError::ServerError {
            status: status.as_u16(),
            message: format!("Malformed response body: {e}"),
        })
    }
}

impl WeatherBackend for HttpBackendClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn store(&self, query: &LocationQuery) -> Result<StoreReceipt, TransportError> {
        let url = self.endpoint(&["store-weather-data"])?;
        debug!("Posting store request to {}", url);

        let response = self.client.post(url).json(query).send().await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn retrieve(&self, filename: &str) -> Result<RawSeriesResponse, TransportError> {
        let url = self.endpoint(&["weather-file-content", filename])?;
        debug!("Fetching stored file from {}", url);

        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }
}
