use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response of a successful store: where the raw payload was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoreReceipt {
    #[schema(example = "Weather data stored successfully")]
    pub message: String,
    /// Storage key; pass it to the file-content endpoint to read the payload back
    pub filename: String,
    pub location: String,
}

/// Error body returned by every failing backend route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
