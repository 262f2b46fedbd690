//! Path extraction module
//!
//! Locates nested values inside parsed response bodies.
//!
//! # Overview
//!
//! A [`DataPath`] is a single key, a single index, or an ordered list of
//! keys and indices. [`extract`] applies the segments left to right and
//! fails with [`Error::PathLookup`](crate::Error::PathLookup) on the first
//! absent segment, which callers either propagate (record extraction) or
//! treat as "field absent" (cursor and next-URL detection).

mod extractor;
mod types;

pub use extractor::{extract, extract_mut, extract_with};
pub use types::{DataPath, PathSegment};
