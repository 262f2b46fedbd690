//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::error::{Error, Result};
use crate::path::DataPath;
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How an endpoint exposes "more data"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationStyle {
    /// `?page=1`, `?page=2`, ... until a short page
    PageNumber,
    /// `?offset=0`, `?offset=100`, ... until a short page
    Offset,
    /// Opaque token returned with each page
    Cursor,
    /// Full URL of the next page returned with each page
    Url,
}

impl PaginationStyle {
    /// Config name of this style
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageNumber => "page_number",
            Self::Offset => "offset",
            Self::Cursor => "cursor",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for PaginationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaginationStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "page_number" => Ok(Self::PageNumber),
            "offset" => Ok(Self::Offset),
            "cursor" => Ok(Self::Cursor),
            "url" => Ok(Self::Url),
            other => Err(Error::config(format!(
                "Unknown pagination type '{other}', try \"page_number\", \"offset\", \"cursor\", or \"url\""
            ))),
        }
    }
}

/// Result of processing a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available
    Continue,
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// Paging inputs for the next request
///
/// `params` are merged into the query string (REST) or the variables
/// map (GraphQL). When `url` is set the request goes to that URL exactly,
/// without the endpoint's extra query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    /// Paging parameters keyed by parameter name
    pub params: JsonObject,
    /// URL overriding the configured endpoint
    pub url: Option<String>,
}

impl PageRequest {
    /// Request with no paging inputs (first page of cursor/url styles)
    pub fn first_page() -> Self {
        Self::default()
    }

    /// Request with a single paging parameter
    pub fn with_param(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut params = JsonObject::new();
        params.insert(key.into(), value.into());
        Self { params, url: None }
    }

    /// Request for an explicit URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            params: JsonObject::new(),
            url: Some(url.into()),
        }
    }
}

/// Settings needed to build a strategy
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Pagination style
    pub style: PaginationStyle,
    /// Name of the query parameter (or GraphQL variable) carrying the page
    /// number, offset or cursor
    pub paging_param: Option<String>,
    /// Path to the next cursor (cursor style) or next URL (url style)
    pub cursor_path: Option<DataPath>,
    /// Fixed offset increment (offset style)
    pub step_size: Option<usize>,
}

impl PaginationConfig {
    /// Create a config for a style with no parameters set
    pub fn new(style: PaginationStyle) -> Self {
        Self {
            style,
            paging_param: None,
            cursor_path: None,
            step_size: None,
        }
    }

    /// Page number pagination
    pub fn page_number(page_param: impl Into<String>) -> Self {
        Self::new(PaginationStyle::PageNumber).with_paging_param(page_param)
    }

    /// Offset pagination
    pub fn offset(offset_param: impl Into<String>, step_size: Option<usize>) -> Self {
        Self {
            step_size,
            ..Self::new(PaginationStyle::Offset).with_paging_param(offset_param)
        }
    }

    /// Cursor pagination
    pub fn cursor(cursor_param: impl Into<String>, cursor_path: impl Into<DataPath>) -> Self {
        Self::new(PaginationStyle::Cursor)
            .with_paging_param(cursor_param)
            .with_cursor_path(cursor_path)
    }

    /// Next URL pagination
    pub fn next_url(url_path: impl Into<DataPath>) -> Self {
        Self::new(PaginationStyle::Url).with_cursor_path(url_path)
    }

    /// Set the paging parameter name
    #[must_use]
    pub fn with_paging_param(mut self, param: impl Into<String>) -> Self {
        self.paging_param = Some(param.into());
        self
    }

    /// Set the cursor path
    #[must_use]
    pub fn with_cursor_path(mut self, path: impl Into<DataPath>) -> Self {
        self.cursor_path = Some(path.into());
        self
    }
}

/// Core trait for pagination strategies
///
/// A strategy owns its state. `next_request` is pure; `process_page` is
/// called once per successfully fetched page and is the only place state
/// changes.
pub trait Paginator: Send + Sync {
    /// Style implemented by this strategy
    fn style(&self) -> PaginationStyle;

    /// Paging inputs for the next request
    fn next_request(&self) -> PageRequest;

    /// Advance state from a fetched page and decide whether more remain
    ///
    /// `body` is the parsed page (for GraphQL, the unwrapped `data` object).
    fn process_page(&mut self, body: &Value, records_count: usize) -> Result<NextPage>;
}
