use std::env;
use std::time::Duration;

use crate::fetcher::DEFAULT_ARCHIVE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub archive_url: String,
    pub request_timeout_secs: u64,
    pub storage_dir: String,
}

/// Read a variable, falling back to `default` only when it is unset.
/// A value that is set but not valid unicode is still an error.
fn var_or(name: &str, default: &str) -> Result<String, env::VarError> {
    match env::var(name) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(e),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            server_host: var_or("SERVER_HOST", "0.0.0.0")?,
            server_port: var_or("SERVER_PORT", "8080")?.parse().unwrap_or(8080),
            archive_url: var_or("ARCHIVE_URL", DEFAULT_ARCHIVE_URL)?,
            request_timeout_secs: var_or("REQUEST_TIMEOUT_SECS", "30")?
                .parse()
                .unwrap_or(30),
            storage_dir: var_or("STORAGE_DIR", "local_weather_data")?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
