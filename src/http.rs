//! HTTP client utilities
//!
//! Provides a reqwest::Client configured with a request timeout. reqwest picks
//! up HTTP_PROXY / HTTPS_PROXY / NO_PROXY from the environment on its own.

use crate::error::ConfigError;
use reqwest::Client;
use std::time::Duration;

/// Build a reqwest Client with the given total request timeout
pub fn client_with_timeout(timeout: Duration) -> Result<Client, ConfigError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(concat!("passfinder/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}
