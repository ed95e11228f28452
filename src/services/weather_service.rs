use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::fetch_error::FetchError;
use crate::fetcher::ArchiveFetcher;
use crate::models::{FormInput, StoreReceipt};
use crate::storage::{FileStore, StorageError, StoredFileInfo};
use crate::utils::storage_filename;
use crate::validation::{validate_query, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<StoredFileInfo>,
    pub count: usize,
}

/// Backend use cases: fetch-and-store, list, read back
#[derive(Clone)]
pub struct WeatherService {
    fetcher: ArchiveFetcher,
    store: FileStore,
}

impl WeatherService {
    pub fn new(fetcher: ArchiveFetcher, store: FileStore) -> Self {
        Self { fetcher, store }
    }

    /// Validate the form, fetch the archive payload and store it verbatim
    #[instrument(skip(self, form))]
    pub async fn store_weather_data(&self, form: &FormInput) -> Result<StoreReceipt, ServiceError> {
        let query = validate_query(form)?;
        info!(
            "Fetching weather data for coordinates ({}, {}) from {} to {} ({} days)",
            query.latitude(),
            query.longitude(),
            query.start_date(),
            query.end_date(),
            query.day_count()
        );

        let data = self.fetcher.fetch_daily(&query).await?;

        let filename = storage_filename(&query, Utc::now());
        let location = self.store.write_json(&filename, &data).await?;

        info!("Successfully processed weather data request for {}", filename);
        Ok(StoreReceipt {
            message: "Weather data stored successfully".to_string(),
            filename,
            location,
        })
    }

    pub async fn list_weather_files(&self) -> Result<FileListResponse, ServiceError> {
        let files = self.store.list().await?;
        Ok(FileListResponse {
            count: files.len(),
            files,
        })
    }

    pub async fn get_weather_file_content(&self, filename: &str) -> Result<Value, ServiceError> {
        Ok(self.store.read_json(filename).await?)
    }
}
