#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File '{0}' not found")]
    NotFound(String),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error("File '{0}' contains invalid JSON data")]
    InvalidJson(String),
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize weather data: {0}")]
    Serialize(#[from] serde_json::Error),
}
