//! Transport abstraction
//!
//! Fetchers only need "send this GET/POST, give me status and body".
//! Anything that can do that (a reqwest client, a test stub, a client with
//! its own auth or retry layer) can drive a result stream.

use super::client::RequestConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

/// A fully read HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl TransportResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 response with a JSON body
    pub fn json_ok(body: &Value) -> Self {
        Self::new(200, body.to_string())
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`Error::HttpStatus`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::http_status(self.status, self.body))
        }
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends requests on behalf of a fetcher
///
/// Implementations return a response for every HTTP status and an error
/// only when no response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a GET request
    async fn get(&self, url: &str, request: RequestConfig) -> Result<TransportResponse>;

    /// Send a POST request
    async fn post(&self, url: &str, request: RequestConfig) -> Result<TransportResponse>;
}
