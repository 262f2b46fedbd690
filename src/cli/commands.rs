//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stream every record of a paginated REST or GraphQL endpoint
#[derive(Parser, Debug)]
#[command(name = "autopaginate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Endpoint definition file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every page and print the records
    Run {
        /// Stop after this many records
        #[arg(long)]
        max_records: Option<usize>,

        /// Extra request header (repeatable)
        #[arg(long = "header", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        headers: Vec<(String, String)>,

        /// Extra query parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },

    /// Validate the endpoint definition
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON record per line
    Json,
    /// Indented JSON
    Pretty,
}

/// Split a `KEY=VALUE` argument at the first `=`
pub(crate) fn parse_key_value(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{arg}'")),
    }
}
