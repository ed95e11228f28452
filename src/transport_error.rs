use crate::models::ErrorBody;

/// Failure of a call from the dashboard to the backend.
///
/// Every network boundary on the client side reports through this one type,
/// and [`TransportError::classify`] is the only place a `reqwest::Error` is
/// sorted into a variant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The server answered, but with an error status or an unusable body
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },
    /// No response arrived (connection refused, DNS failure, timeout)
    #[error("Unable to reach the weather backend: {0}")]
    Unreachable(String),
    /// The request could not be built (bad base URL, invalid parameters)
    #[error("Request could not be constructed: {0}")]
    RequestConstruction(String),
}

impl TransportError {
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            return TransportError::RequestConstruction(err.to_string());
        }

        if let Some(status) = err.status() {
            return TransportError::ServerError {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }

        TransportError::Unreachable(err.to_string())
    }

    /// Build a `ServerError` from a non-success response body.
    ///
    /// Prefers the backend's `{"error": ...}` message, then the raw body, then
    /// the status' canonical reason.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|b| b.error)
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        TransportError::ServerError {
            status: status.as_u16(),
            message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::classify(&err)
    }
}
