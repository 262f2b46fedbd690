//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern and owns the state
//! that pattern needs between pages.

use super::types::{NextPage, PageRequest, PaginationConfig, PaginationStyle, Paginator};
use crate::error::{Error, Result};
use crate::path::{extract, DataPath};
use serde_json::Value;
use tracing::debug;
use url::Url;

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination (e.g., traditional web pagination)
///
/// Requests `?page=1`, `?page=2`, ... The first page's record count becomes
/// the expected page size; a page at or below `expected / 1.25` records is
/// treated as the last one. The margin tolerates a record or two
/// disappearing between calls without mistaking a full page for the end.
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter name for page number
    pub page_param: String,
    next_page_number: u64,
    expected_page_size: Option<usize>,
    last_page_record_count: Option<usize>,
}

impl PageNumberPaginator {
    /// Create a new page number paginator starting at page 1
    pub fn new(page_param: impl Into<String>) -> Self {
        Self {
            page_param: page_param.into(),
            next_page_number: 1,
            expected_page_size: None,
            last_page_record_count: None,
        }
    }

    /// Page number the next request will ask for
    pub fn next_page_number(&self) -> u64 {
        self.next_page_number
    }

    /// Record count of the first page, once fetched
    pub fn expected_page_size(&self) -> Option<usize> {
        self.expected_page_size
    }

    /// Record count of the most recent page
    pub fn last_page_record_count(&self) -> Option<usize> {
        self.last_page_record_count
    }
}

/// Largest record count still considered a short page: `floor(expected / 1.25)`
pub(crate) fn short_page_threshold(expected: usize) -> usize {
    expected - expected.div_ceil(5)
}

impl Paginator for PageNumberPaginator {
    fn style(&self) -> PaginationStyle {
        PaginationStyle::PageNumber
    }

    fn next_request(&self) -> PageRequest {
        PageRequest::with_param(&self.page_param, self.next_page_number)
    }

    fn process_page(&mut self, _body: &Value, records_count: usize) -> Result<NextPage> {
        let expected = *self.expected_page_size.get_or_insert(records_count);
        self.last_page_record_count = Some(records_count);
        self.next_page_number += 1;

        if records_count <= short_page_threshold(expected) {
            debug!(
                "Short page ({} records, expected {}), stopping",
                records_count, expected
            );
            return Ok(NextPage::Done);
        }
        Ok(NextPage::Continue)
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination (e.g., SQL-style pagination)
///
/// Requests `?offset=0`, then advances by the fixed step size when one is
/// configured, otherwise by the number of records each page returned.
/// Stops on a page smaller than the step size.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Fixed increment per page
    pub step_size: Option<usize>,
    offset: u64,
    observed_page_size: Option<usize>,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(offset_param: impl Into<String>, step_size: Option<usize>) -> Self {
        Self {
            offset_param: offset_param.into(),
            step_size,
            offset: 0,
            observed_page_size: None,
        }
    }

    /// Offset the next request will ask for
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Paginator for OffsetPaginator {
    fn style(&self) -> PaginationStyle {
        PaginationStyle::Offset
    }

    fn next_request(&self) -> PageRequest {
        PageRequest::with_param(&self.offset_param, self.offset)
    }

    fn process_page(&mut self, _body: &Value, records_count: usize) -> Result<NextPage> {
        let (step, advance) = match self.step_size {
            Some(step) => (step, step),
            None => (
                *self.observed_page_size.get_or_insert(records_count),
                records_count,
            ),
        };
        self.offset += advance as u64;

        if records_count == 0 || records_count < step {
            return Ok(NextPage::Done);
        }
        Ok(NextPage::Continue)
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor-based pagination (e.g., Stripe, Slack, GitHub GraphQL)
///
/// The first request carries no cursor. Each page's cursor is read from
/// `cursor_path`; when the path is absent (or holds `null`) the current
/// page is the last one. Any other value, including an empty string, is
/// passed back verbatim.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Query parameter (or variable) name for cursor
    pub cursor_param: String,
    /// Path to extract cursor from response
    pub cursor_path: DataPath,
    next_cursor: Option<Value>,
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new(cursor_param: impl Into<String>, cursor_path: impl Into<DataPath>) -> Self {
        Self {
            cursor_param: cursor_param.into(),
            cursor_path: cursor_path.into(),
            next_cursor: None,
        }
    }

    /// Cursor the next request will carry
    pub fn next_cursor(&self) -> Option<&Value> {
        self.next_cursor.as_ref()
    }
}

impl Paginator for CursorPaginator {
    fn style(&self) -> PaginationStyle {
        PaginationStyle::Cursor
    }

    fn next_request(&self) -> PageRequest {
        match &self.next_cursor {
            Some(cursor) => PageRequest::with_param(&self.cursor_param, cursor.clone()),
            None => PageRequest::first_page(),
        }
    }

    fn process_page(&mut self, body: &Value, _records_count: usize) -> Result<NextPage> {
        match extract(body, &self.cursor_path) {
            Ok(Value::Null) => {
                self.next_cursor = None;
                Ok(NextPage::Done)
            }
            Ok(cursor) => {
                self.next_cursor = Some(cursor.clone());
                Ok(NextPage::Continue)
            }
            Err(e) if e.is_path_lookup() => {
                debug!("No cursor at '{}', stopping", self.cursor_path);
                self.next_cursor = None;
                Ok(NextPage::Done)
            }
            Err(e) => Err(e),
        }
    }
}

// ============================================================================
// Next URL Pagination
// ============================================================================

/// Next URL pagination (URL in response body)
///
/// Extracts next page URL from a field in the response body.
/// Common patterns:
/// - `{ "next": "https://api.example.com/items?page=2" }`
/// - `{ "pagination": { "next_url": "..." } }`
///
/// Relative URLs are resolved against the URL of the page that returned
/// them. A missing, `null` or empty field ends pagination.
#[derive(Debug, Clone)]
pub struct NextUrlPaginator {
    /// Path to extract next URL from response
    pub path: DataPath,
    base_url: String,
    next_url: Option<String>,
}

impl NextUrlPaginator {
    /// Create a new next URL paginator; `base_url` is the first page's URL
    pub fn new(path: impl Into<DataPath>, base_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            base_url: base_url.into(),
            next_url: None,
        }
    }

    /// URL the next request will go to, once known
    pub fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref()
    }

    fn resolve(&self, next: &str) -> Result<String> {
        if Url::parse(next).is_ok() {
            return Ok(next.to_string());
        }
        let current = self.next_url.as_deref().unwrap_or(&self.base_url);
        Ok(Url::parse(current)?.join(next)?.to_string())
    }
}

impl Paginator for NextUrlPaginator {
    fn style(&self) -> PaginationStyle {
        PaginationStyle::Url
    }

    fn next_request(&self) -> PageRequest {
        match &self.next_url {
            Some(url) => PageRequest::with_url(url.clone()),
            None => PageRequest::first_page(),
        }
    }

    fn process_page(&mut self, body: &Value, _records_count: usize) -> Result<NextPage> {
        let next = match extract(body, &self.path) {
            Ok(Value::String(next)) if !next.is_empty() => self.resolve(next)?,
            Ok(Value::String(_) | Value::Null) => {
                self.next_url = None;
                return Ok(NextPage::Done);
            }
            Ok(other) => {
                return Err(Error::record_extraction(
                    self.path.to_string(),
                    format!("expected a URL string, got {other}"),
                ))
            }
            Err(e) if e.is_path_lookup() => {
                self.next_url = None;
                return Ok(NextPage::Done);
            }
            Err(e) => return Err(e),
        };
        self.next_url = Some(next);
        Ok(NextPage::Continue)
    }
}

// ============================================================================
// Strategy
// ============================================================================

/// One of the four pagination strategies, chosen from configuration
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Sequential page numbers
    PageNumber(PageNumberPaginator),
    /// Offsets
    Offset(OffsetPaginator),
    /// Opaque cursors
    Cursor(CursorPaginator),
    /// Next-page URLs
    Url(NextUrlPaginator),
}

impl Strategy {
    /// Build a strategy, checking that the style's required settings exist
    ///
    /// `base_url` is the endpoint's URL, used to resolve relative next URLs.
    /// The `url` style therefore needs it to be absolute; a relative URL is
    /// [`Error::InvalidUrl`] even when the transport has a base URL of its own.
    pub fn build(config: &PaginationConfig, base_url: &str) -> Result<Self> {
        let paging_param = || {
            config
                .paging_param
                .clone()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| Error::missing_field("paging_param"))
        };
        let cursor_path = || {
            config
                .cursor_path
                .clone()
                .ok_or_else(|| Error::missing_field("cursor_path"))
        };

        match config.style {
            PaginationStyle::PageNumber => {
                Ok(Self::PageNumber(PageNumberPaginator::new(paging_param()?)))
            }
            PaginationStyle::Offset => {
                if config.step_size == Some(0) {
                    return Err(Error::config("step_size must be greater than zero"));
                }
                Ok(Self::Offset(OffsetPaginator::new(
                    paging_param()?,
                    config.step_size,
                )))
            }
            PaginationStyle::Cursor => Ok(Self::Cursor(CursorPaginator::new(
                paging_param()?,
                cursor_path()?,
            ))),
            PaginationStyle::Url => {
                Url::parse(base_url)?;
                Ok(Self::Url(NextUrlPaginator::new(cursor_path()?, base_url)))
            }
        }
    }

    fn inner(&self) -> &dyn Paginator {
        match self {
            Self::PageNumber(p) => p,
            Self::Offset(p) => p,
            Self::Cursor(p) => p,
            Self::Url(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Paginator {
        match self {
            Self::PageNumber(p) => p,
            Self::Offset(p) => p,
            Self::Cursor(p) => p,
            Self::Url(p) => p,
        }
    }
}

impl Paginator for Strategy {
    fn style(&self) -> PaginationStyle {
        self.inner().style()
    }

    fn next_request(&self) -> PageRequest {
        self.inner().next_request()
    }

    fn process_page(&mut self, body: &Value, records_count: usize) -> Result<NextPage> {
        self.inner_mut().process_page(body, records_count)
    }
}
