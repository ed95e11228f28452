use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::fetch_error::FetchError;
use crate::models::{ErrorBody, FormInput, StoreReceipt};
use crate::services::weather_service::FileListResponse;
use crate::services::{ServiceError, WeatherService};
use crate::storage::{StorageError, StoredFileInfo};

pub const SERVICE_NAME: &str = "weather-backend-service";

#[derive(Clone)]
pub struct AppState {
    pub weather_service: WeatherService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub version: String,
}

/// Handler error, rendered as `{"error": message}` with a matching status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Fetch(FetchError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            ServiceError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServiceError::Storage(StorageError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid JSON request body: {}", rejection.body_text()),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, store_weather_data, list_weather_files, get_weather_file_content),
    components(schemas(
        FormInput,
        StoreReceipt,
        ErrorBody,
        HealthResponse,
        FileListResponse,
        StoredFileInfo
    )),
    tags((name = "weather", description = "Historical weather data storage and retrieval"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let weather_routes = Router::new()
        .route("/health", get(health))
        .route("/store-weather-data", post(store_weather_data))
        .route("/list-weather-files", get(list_weather_files))
        .route("/weather-file-content/{filename}", get(get_weather_file_content));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/weather", weather_routes)
        .fallback(not_found)
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "weather",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument]
async fn health() -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    post,
    path = "/weather/store-weather-data",
    tag = "weather",
    request_body = FormInput,
    responses(
        (status = 201, description = "Weather data fetched and stored", body = StoreReceipt),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 502, description = "Weather archive failed", body = ErrorBody),
        (status = 504, description = "Weather archive timed out", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
#[instrument(skip(state, payload))]
async fn store_weather_data(
    State(state): State<AppState>,
    payload: Result<Json<FormInput>, JsonRejection>,
) -> Result<(StatusCode, Json<StoreReceipt>), ApiError> {
    let Json(form) = payload.map_err(|rejection| {
        warn!("Invalid request body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    debug!("Store request: {:?}", form);
    let receipt = state
        .weather_service
        .store_weather_data(&form)
        .await
        .map_err(|e| {
            match &e {
                ServiceError::Validation(v) => warn!("Invalid request: {}", v),
                other => error!("Error in store_weather_data: {}", other),
            }
            ApiError::from(e)
        })?;

    info!("Stored weather data as {}", receipt.filename);
    Ok((StatusCode::CREATED, Json(receipt)))
}

#[utoipa::path(
    get,
    path = "/weather/list-weather-files",
    tag = "weather",
    responses(
        (status = 200, description = "Stored weather files", body = FileListResponse),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
#[instrument(skip(state))]
async fn list_weather_files(
    State(state): State<AppState>,
) -> Result<Json<FileListResponse>, ApiError> {
    let response = state
        .weather_service
        .list_weather_files()
        .await
        .map_err(|e| {
            error!("Error in list_weather_files: {}", e);
            ApiError::from(e)
        })?;

    info!("Listed {} weather files", response.count);
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/weather/weather-file-content/{filename}",
    tag = "weather",
    params(("filename" = String, Path, description = "Storage key returned by the store call")),
    responses(
        (status = 200, description = "Stored archive payload", body = Object),
        (status = 400, description = "Invalid storage key", body = ErrorBody),
        (status = 404, description = "No such file", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
#[instrument(skip(state), fields(filename = %filename))]
async fn get_weather_file_content(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let content = state
        .weather_service
        .get_weather_file_content(&filename)
        .await
        .map_err(|e| {
            match &e {
                ServiceError::Storage(StorageError::NotFound(_)) => warn!("{}", e),
                other => error!("Error in get_weather_file_content: {}", other),
            }
            ApiError::from(e)
        })?;

    info!("Retrieved content for file: {}", filename);
    Ok(Json(content))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Endpoint not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_service_errors_map_to_statuses() {
        let cases = [
            (
                ServiceError::Validation(ValidationError::InvertedRange),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Fetch(FetchError::RateLimited),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ServiceError::Fetch(FetchError::Timeout),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                ServiceError::Storage(StorageError::NotFound("a.json".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Storage(StorageError::InvalidKey("..".into())),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_openapi_lists_routes() {
        let spec = serde_json::to_value(generate_openapi_spec()).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/weather/store-weather-data"));
        assert!(paths.contains_key("/weather/weather-file-content/{filename}"));
    }
}
