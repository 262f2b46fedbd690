//! HTTP module
//!
//! The [`Transport`] trait is the seam between the pagination engine and
//! the network; [`HttpClient`] is the reqwest-backed implementation.
//!
//! # Features
//!
//! - **Any status is a response**: callers decide what a non-2xx means
//! - **Default headers**: applied to every request
//! - **Base URL**: relative paths are joined onto it

mod client;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use transport::{Transport, TransportResponse};
