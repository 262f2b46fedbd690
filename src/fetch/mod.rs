//! Page fetching and result streams
//!
//! # Overview
//!
//! - [`PageFetcher`] - one GET per page against a REST endpoint
//! - [`GraphQlPageFetcher`] - one POST per page carrying `{query, variables}`
//! - [`ResultStream`] - buffers fetched records and hands them out one at a
//!   time, fetching the next page only when the buffer runs dry
//!
//! ```rust,ignore
//! use autopaginate::{paginate, FetchConfig, HttpClient, PaginationStyle};
//! use std::sync::Arc;
//!
//! let config = FetchConfig::new("https://api.example.com/items", PaginationStyle::PageNumber, "items")
//!     .paging_param("page");
//! let mut stream = paginate(Arc::new(HttpClient::new()?), config)?;
//! while let Some(record) = stream.next().await? {
//!     println!("{record}");
//! }
//! ```

mod graphql;
mod rest;
mod stream;

pub use graphql::{clean_query, GraphQlPageFetcher, GraphQlRequest, PARSE_JSON_HINT};
pub use rest::PageFetcher;
pub use stream::ResultStream;

use crate::config::{EndpointConfig, FetchConfig, GraphQlConfig};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::pagination::NextPage;
use crate::path::{extract, extract_mut, DataPath};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Records from one page plus whether more pages remain
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// Records in server order
    pub records: Vec<Value>,
    /// Whether the strategy expects another page
    pub next: NextPage,
}

/// Fetches one page per call
///
/// Each call performs exactly one network request and advances the
/// fetcher's pagination state only if the page was fetched and parsed.
#[async_trait]
pub trait FetchPage: Send {
    /// Fetch the next page
    async fn fetch_page(&mut self) -> Result<FetchedPage>;
}

#[async_trait]
impl<F: FetchPage + ?Sized> FetchPage for Box<F> {
    async fn fetch_page(&mut self) -> Result<FetchedPage> {
        (**self).fetch_page().await
    }
}

/// Stream every record of a paginated REST endpoint
pub fn paginate(
    transport: Arc<dyn Transport>,
    config: FetchConfig,
) -> Result<ResultStream<PageFetcher>> {
    Ok(ResultStream::new(PageFetcher::new(transport, config)?))
}

/// Stream every record of a paginated GraphQL query
pub fn paginate_graphql(
    transport: Arc<dyn Transport>,
    config: GraphQlConfig,
) -> Result<ResultStream<GraphQlPageFetcher>> {
    Ok(ResultStream::new(GraphQlPageFetcher::new(transport, config)?))
}

/// Stream every record of an endpoint loaded from configuration
pub fn paginate_endpoint(
    transport: Arc<dyn Transport>,
    endpoint: EndpointConfig,
) -> Result<ResultStream<Box<dyn FetchPage>>> {
    let fetcher: Box<dyn FetchPage> = match endpoint {
        EndpointConfig::Rest(config) => Box::new(PageFetcher::new(transport, config)?),
        EndpointConfig::GraphQl(config) => Box::new(GraphQlPageFetcher::new(transport, config)?),
    };
    Ok(ResultStream::new(fetcher))
}

/// Number of records in a parsed page
///
/// Fails unless `data_path` leads to an array, so a page is rejected before
/// its strategy sees it.
fn record_count(body: &Value, data_path: &DataPath) -> Result<usize> {
    match extract(body, data_path)? {
        Value::Array(records) => Ok(records.len()),
        other => Err(not_an_array(data_path, other)),
    }
}

/// Move the records array out of a parsed page
///
/// Called after the strategy has read the page, since a cursor path may
/// point into the records themselves.
fn take_records(body: &mut Value, data_path: &DataPath) -> Result<Vec<Value>> {
    match extract_mut(body, data_path)?.take() {
        Value::Array(records) => Ok(records),
        other => Err(not_an_array(data_path, &other)),
    }
}

fn not_an_array(data_path: &DataPath, value: &Value) -> Error {
    Error::record_extraction(
        data_path.to_string(),
        format!("expected an array, got {}", json_kind(value)),
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
