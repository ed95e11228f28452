#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request timeout - the weather service is taking too long to respond")]
    Timeout,
    #[error("Unable to connect to weather service: {0}")]
    Connect(String),
    #[error("Invalid request parameters for weather data")]
    InvalidParameters,
    #[error("Rate limit exceeded for weather service")]
    RateLimited,
    #[error("Weather service error: {0}")]
    Upstream(u16),
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),
    #[error("Failed to parse weather data: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connect(err.to_string())
        } else {
            FetchError::Request(err)
        }
    }
}
