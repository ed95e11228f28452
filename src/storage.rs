pub mod error;
pub mod file_store;
pub mod models;

pub use error::StorageError;
pub use file_store::FileStore;
pub use models::StoredFileInfo;
