// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # autopaginate
//!
//! Turn a paginated REST or GraphQL endpoint into one flat, lazily-fetched
//! stream of records. Pages are fetched on demand, one request per empty
//! buffer, and page boundaries never reach the caller.
//!
//! ## Pagination styles
//!
//! - **Page number**: `?page=1`, `?page=2`, ... until a short page
//! - **Offset**: `?offset=0`, `?offset=100`, ... until a short page
//! - **Cursor**: opaque token read from each response (REST or GraphQL)
//! - **URL**: full next-page URL read from each response (REST)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use autopaginate::{paginate, DataPath, FetchConfig, HttpClient, PaginationStyle, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = FetchConfig::new(
//!         "https://api.example.com/items",
//!         PaginationStyle::Cursor,
//!         DataPath::keys(["data", "items"]),
//!     )
//!     .paging_param("after")
//!     .cursor_path(DataPath::keys(["meta", "next"]));
//!
//!     let mut stream = paginate(Arc::new(HttpClient::new()?), config)?;
//!     while let Some(record) = stream.next().await? {
//!         println!("{record}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! caller ── next() ──> ResultStream ── buffer empty? ──> FetchPage
//!                                                          │
//!                          PageFetcher (GET) / GraphQlPageFetcher (POST)
//!                                                          │
//!                Transport ── response ──> DataPath ──> records
//!                                             │
//!                                  Strategy (page_number | offset | cursor | url)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document Error variant fields before 1.0

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Nested value lookup by key and index paths
pub mod path;

/// HTTP client and transport abstraction
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Page fetchers and result streams
pub mod fetch;

/// Endpoint configuration and YAML loading
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{
    load_config, load_config_from_str, EndpointConfig, EndpointDefinition, FetchConfig,
    GraphQlConfig, HttpConfig,
};
pub use fetch::{
    clean_query, paginate, paginate_endpoint, paginate_graphql, FetchPage, FetchedPage,
    GraphQlPageFetcher, PageFetcher, ResultStream,
};
pub use http::{HttpClient, HttpClientConfig, RequestConfig, Transport, TransportResponse};
pub use pagination::{NextPage, PaginationStyle, Paginator, Strategy};
pub use path::{extract, DataPath, PathSegment};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
