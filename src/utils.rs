//! Shared utility functions for the weather archive service

use chrono::{DateTime, Utc};

use crate::models::LocationQuery;

/// Build the storage key for a fetched payload
///
/// The key embeds the query and the fetch time, so two identical queries made
/// in the same second share a key and the later write replaces the earlier.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use weather_archive_service::models::FormInput;
/// use weather_archive_service::utils::storage_filename;
/// use weather_archive_service::validation::validate_query;
///
/// let form = FormInput::new(40.7128, -74.006, "2023-01-01", "2023-01-31");
/// let query = validate_query(&form).unwrap();
/// let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
///
/// assert_eq!(
///     storage_filename(&query, at),
///     "weather_data_lat40.7128_lon-74.006_2023-01-01_to_2023-01-31_20240305_140709.json"
/// );
/// ```
pub fn storage_filename(query: &LocationQuery, at: DateTime<Utc>) -> String {
    format!(
        "weather_data_lat{}_lon{}_{}_to_{}_{}.json",
        query.latitude(),
        query.longitude(),
        query.start_date().format("%Y-%m-%d"),
        query.end_date().format("%Y-%m-%d"),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Check that a client-supplied storage key names a single JSON file
///
/// Keys are plain file names: no path separators, no `..`, and a `.json`
/// extension.
///
/// # Examples
///
/// ```
/// use weather_archive_service::utils::check_storage_key;
///
/// assert!(check_storage_key("weather_data_lat1_lon2_2023-01-01_to_2023-01-02_20240101_000000.json").is_ok());
/// assert!(check_storage_key("../etc/passwd.json").is_err());
/// assert!(check_storage_key("notes.txt").is_err());
/// ```
pub fn check_storage_key(key: &str) -> Result<(), &'static str> {
    if key.is_empty() {
        return Err("Storage key is empty");
    }

    if key.contains('/') || key.contains('\\') || key.contains('\0') {
        return Err("Storage key must not contain path separators");
    }

    if key.contains("..") {
        return Err("Storage key must not contain '..'");
    }

    if !key.ends_with(".json") || key.len() == ".json".len() {
        return Err("Storage key must name a .json file");
    }

    Ok(())
}
