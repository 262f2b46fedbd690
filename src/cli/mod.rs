//! CLI module
//!
//! Command-line interface for paginated endpoints.
//!
//! # Commands
//!
//! - `run` - Fetch every page and print the records as JSON
//! - `validate` - Check an endpoint definition without sending requests

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
