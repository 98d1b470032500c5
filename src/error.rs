//! Error types for fetching the pass collection

use thiserror::Error;
use url::Url;

/// Failure of one remote fetch.
///
/// None of these reach the user: the coordinator logs them and publishes an
/// empty result set instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Endpoint returned HTTP {status}")]
    Status { status: u16 },
    #[error("Response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Expected a JSON array of passes, got {found}")]
    NotAnArray { found: &'static str },
}

impl FetchError {
    /// Stable code used in log fields
    pub fn error_code(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Timeout(_) => "timeout",
            FetchError::Status { .. } => "http_status",
            FetchError::Decode(_) => "decode",
            FetchError::NotAnArray { .. } => "not_an_array",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Errors raised while setting things up, before any fetch happens
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// The endpoint must be an absolute http(s) URL
pub fn validate_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidEndpoint(
            "Endpoint cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {}", trimmed, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}
