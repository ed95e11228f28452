use serde::Serialize;
use std::fmt::Display;

/// Uniform `{success, data, error}` envelope.
///
/// `success` is true exactly when `data` is present and `error` is absent;
/// the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(error)) => Err(error),
            (None, None) => Err("operation produced no data".to_string()),
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for OperationResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let result = OperationResult::ok(3);
        assert!(result.is_success());
        assert_eq!(result.data(), Some(&3));
        assert_eq!(result.error(), None);
        assert_eq!(result.into_result(), Ok(3));
    }

    #[test]
    fn test_failed_envelope_serializes_nulls() {
        let result: OperationResult<u32> = OperationResult::failed("boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn test_from_result() {
        let err: Result<u32, std::fmt::Error> = Err(std::fmt::Error);
        let result = OperationResult::from(err);
        assert!(!result.is_success());
        assert!(result.error().is_some());
    }
}
