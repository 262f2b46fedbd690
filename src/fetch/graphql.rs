//! GraphQL page fetcher
//!
//! Every page is a POST of `{"query": ..., "variables": {...}}`. The paging
//! variable is written into an owned variables map before each request, so
//! it overrides a caller-supplied variable of the same name.
//!
//! Responses are checked in this order:
//! 1. a top-level `message` (REST-style error from the gateway)
//! 2. a non-null `errors` array
//! 3. a non-success HTTP status
//! 4. the `data` envelope, which is unwrapped before records and cursors
//!    are extracted

use super::{record_count, take_records, FetchPage, FetchedPage};
use crate::config::GraphQlConfig;
use crate::error::{Error, Result};
use crate::http::{RequestConfig, Transport, TransportResponse};
use crate::pagination::{Paginator, Strategy};
use crate::types::JsonObject;
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

/// Appended to the server's "Problems parsing JSON" message
pub const PARSE_JSON_HINT: &str = "The server could not parse the request body. \
Check that the query is valid GraphQL and that string arguments use double quotes. \
Request body sent:";

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\n\s*").unwrap());

/// Body of a GraphQL request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest<'a> {
    /// Query document
    pub query: &'a str,
    /// Query variables
    pub variables: &'a JsonObject,
}

/// Compact a query document onto one line
///
/// A line break between two words (at least three word characters before
/// it) becomes a `,` so selections like `name\n id` stay separate. All
/// other newlines and spaces are dropped, then a leading `query` keyword
/// gets its space back.
///
/// ```
/// use autopaginate::clean_query;
///
/// let query = "query {\n  viewer {\n    name\n    id\n  }\n}";
/// assert_eq!(clean_query(query), "query {viewer{name,id}}");
/// ```
pub fn clean_query(query: &str) -> String {
    let mut joined = String::with_capacity(query.len());
    let mut last = 0;

    for m in LINE_BREAK.find_iter(query) {
        joined.push_str(&query[last..m.start()]);
        if ends_with_word(&query[..m.start()]) && starts_with_word(&query[m.end()..]) {
            joined.push(',');
        } else {
            joined.push_str(m.as_str());
        }
        last = m.end();
    }
    joined.push_str(&query[last..]);

    let compact: String = joined.chars().filter(|c| *c != '\n' && *c != ' ').collect();
    match compact.strip_prefix("query") {
        Some(rest) => format!("query {rest}"),
        None => compact,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn ends_with_word(s: &str) -> bool {
    let tail: Vec<char> = s.chars().rev().take(3).collect();
    tail.len() == 3 && tail.into_iter().all(is_word_char)
}

fn starts_with_word(s: &str) -> bool {
    s.chars().next().is_some_and(is_word_char)
}

/// Fetches pages of a GraphQL query with POST requests
pub struct GraphQlPageFetcher {
    transport: Arc<dyn Transport>,
    config: GraphQlConfig,
    query: String,
    variables: JsonObject,
    strategy: Strategy,
    pages_fetched: u64,
}

impl GraphQlPageFetcher {
    /// Create a fetcher, validating the config and preparing the query
    pub fn new(transport: Arc<dyn Transport>, config: GraphQlConfig) -> Result<Self> {
        config.validate()?;
        let strategy = Strategy::build(&config.pagination_config(), &config.url)?;
        let query = if config.clean_query {
            clean_query(&config.query)
        } else {
            config.query.clone()
        };
        let variables = config.variables.clone();

        Ok(Self {
            transport,
            config,
            query,
            variables,
            strategy,
            pages_fetched: 0,
        })
    }

    /// Query document as it is sent
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Variables as of the most recent request
    pub fn variables(&self) -> &JsonObject {
        &self.variables
    }

    /// Current pagination state
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Pages fetched so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    fn request_body(&self) -> GraphQlRequest<'_> {
        GraphQlRequest {
            query: &self.query,
            variables: &self.variables,
        }
    }

    /// Check the response envelope and return the `data` value
    fn unwrap_envelope(&self, response: &TransportResponse) -> Result<Value> {
        let mut body = match response.json() {
            Ok(body) => body,
            Err(_) if !response.is_success() => {
                return Err(Error::http_status(response.status, response.body.clone()))
            }
            Err(e) => return Err(e),
        };

        if let Some(message) = body.get("message") {
            let message = message
                .as_str()
                .map_or_else(|| message.to_string(), str::to_string);
            let message = if message == "Problems parsing JSON" {
                let sent = serde_json::to_string(&self.request_body())?;
                format!("{message}\n{PARSE_JSON_HINT}\n{sent}")
            } else {
                message
            };
            warn!("GraphQL request to {} failed: {}", self.config.url, message);
            return Err(Error::graphql(response.status, message));
        }

        match body.get("errors") {
            Some(Value::Null) | None => {}
            Some(errors) => {
                warn!("GraphQL request to {} returned errors", self.config.url);
                return Err(Error::graphql(response.status, errors.to_string()));
            }
        }

        if !response.is_success() {
            return Err(Error::http_status(response.status, response.body.clone()));
        }

        body.get_mut("data")
            .map(Value::take)
            .ok_or_else(|| Error::path_lookup("data", "data"))
    }
}

#[async_trait]
impl FetchPage for GraphQlPageFetcher {
    async fn fetch_page(&mut self) -> Result<FetchedPage> {
        for (name, value) in self.strategy.next_request().params {
            self.variables.insert(name, value);
        }

        let mut request = RequestConfig::new().json(serde_json::to_value(self.request_body())?);
        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }
        for (key, value) in &self.config.params {
            request = request.query(key, value);
        }

        let response = self.transport.post(&self.config.url, request).await?;
        let mut data = self.unwrap_envelope(&response)?;
        let count = record_count(&data, &self.config.data_path)?;
        let next = self.strategy.process_page(&data, count)?;
        let records = take_records(&mut data, &self.config.data_path)?;
        self.pages_fetched += 1;

        debug!(
            "GraphQL page {} of {}: {} records",
            self.pages_fetched,
            self.config.url,
            records.len()
        );

        Ok(FetchedPage { records, next })
    }
}

impl std::fmt::Debug for GraphQlPageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQlPageFetcher")
            .field("url", &self.config.url)
            .field("query", &self.query)
            .field("variables", &self.variables)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
