//! Remote source of the pass collection
//!
//! The endpoint has no filter parameters: every fetch downloads the whole
//! collection and filtering happens locally.

use super::records::{decode_records, PassRecord};
use crate::error::FetchError;
use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Production endpoint serving the pass collection
pub const DEFAULT_ENDPOINT: &str = "https://checking-passes.vercel.app/get/passes";

/// Something that can produce the full pass collection
pub trait PassSource: Send + Sync + 'static {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<PassRecord>, FetchError>>;
}

/// Fetches the collection with a plain HTTP GET
pub struct HttpPassSource {
    client: Client,
    endpoint: Url,
}

impl HttpPassSource {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_impl(&self) -> Result<Vec<PassRecord>, FetchError> {
        debug!("Fetching passes from {}", self.endpoint);

        let response = self.client.get(self.endpoint.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        debug!("Received {} bytes", body.len());

        parse_collection(&body)
    }
}

impl PassSource for HttpPassSource {
    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<PassRecord>, FetchError>> {
        Box::pin(self.fetch_impl())
    }
}

/// Parse a response body into records; anything but a JSON array is an error
pub fn parse_collection(body: &str) -> Result<Vec<PassRecord>, FetchError> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Array(items) => Ok(decode_records(items)),
        other => Err(FetchError::NotAnArray {
            found: json_type_name(&other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
