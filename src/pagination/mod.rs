//! Pagination module
//!
//! Supports: Page Number, Offset, Cursor, Next URL
//!
//! # Overview
//!
//! The pagination module provides a unified interface for handling different
//! API pagination patterns. Each strategy says what the next request should
//! carry, reads whatever the response exposes about the following page, and
//! tracks when pagination is complete.

mod strategies;
mod types;

pub use strategies::{
    CursorPaginator, NextUrlPaginator, OffsetPaginator, PageNumberPaginator, Strategy,
};
pub use types::{NextPage, PageRequest, PaginationConfig, PaginationStyle, Paginator};

#[cfg(test)]
mod tests;
