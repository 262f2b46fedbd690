//! Shared helpers for unit tests

use crate::error::{Error, Result};
use crate::http::{RequestConfig, Transport, TransportResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request seen by [`StubTransport`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SentRequest {
    pub method: &'static str,
    pub url: String,
    pub config: RequestConfig,
}

/// Transport that replays queued responses and records every request
#[derive(Default)]
pub(crate) struct StubTransport {
    responses: Mutex<VecDeque<Result<TransportResponse>>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue 200 responses with these JSON bodies
    pub fn with_pages(pages: impl IntoIterator<Item = Value>) -> Self {
        let stub = Self::new();
        for page in pages {
            stub.push(TransportResponse::json_ok(&page));
        }
        stub
    }

    pub fn push(&self, response: TransportResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, error: Error) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Number of requests sent
    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn respond(
        &self,
        method: &'static str,
        url: &str,
        config: RequestConfig,
    ) -> Result<TransportResponse> {
        self.sent.lock().unwrap().push(SentRequest {
            method,
            url: url.to_string(),
            config,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(Error::internal(format!(
                    "no response queued for {method} {url}"
                )))
            })
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, url: &str, request: RequestConfig) -> Result<TransportResponse> {
        self.respond("GET", url, request)
    }

    async fn post(&self, url: &str, request: RequestConfig) -> Result<TransportResponse> {
        self.respond("POST", url, request)
    }
}
