//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, EndpointDefinition, HttpConfig};
use crate::error::{Error, Result, ResultExt};
use crate::fetch::paginate_endpoint;
use crate::http::{HttpClient, HttpClientConfig};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                max_records,
                headers,
                params,
            } => {
                self.run_endpoint(*max_records, headers, params, &mut std::io::stdout())
                    .await
                    .map(|_| ())
            }
            Commands::Validate => self.validate(),
        }
    }

    /// Load the endpoint definition
    fn load_definition(&self) -> Result<EndpointDefinition> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Endpoint file not specified (use -c flag)"))?;
        load_config(path)
    }

    /// Stream records to `out`, returning how many were written
    async fn run_endpoint(
        &self,
        max_records: Option<usize>,
        headers: &[(String, String)],
        params: &[(String, String)],
        out: &mut impl Write,
    ) -> Result<usize> {
        let mut definition = self.load_definition()?;
        for (key, value) in headers {
            definition.endpoint.insert_header(key, value);
        }
        for (key, value) in params {
            definition.endpoint.insert_param(key, value);
        }

        let client = HttpClient::with_config(Self::build_http_config(&definition.http))?;
        info!(
            "Fetching {} ({} pagination)",
            definition.endpoint.url(),
            definition.endpoint.pagination()
        );

        let start = Instant::now();
        let mut stream = paginate_endpoint(Arc::new(client), definition.endpoint)?;
        let mut written = 0;

        while max_records.is_none_or(|max| written < max) {
            let Some(record) = stream.next().await? else {
                break;
            };
            self.write_record(out, &record)?;
            written += 1;
        }

        info!(
            "Wrote {} records from {} pages in {:?}",
            written,
            stream.pages_fetched(),
            start.elapsed()
        );
        Ok(written)
    }

    /// Validate the endpoint definition
    fn validate(&self) -> Result<()> {
        let definition = self.load_definition()?;
        self.write_record(
            &mut std::io::stdout(),
            &json!({
                "status": "valid",
                "url": definition.endpoint.url(),
                "pagination": definition.endpoint.pagination(),
            }),
        )
    }

    fn build_http_config(http: &HttpConfig) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().timeout(http.timeout());
        if let Some(ua) = &http.user_agent {
            builder = builder.user_agent(ua);
        }
        builder.build()
    }

    fn write_record(&self, out: &mut impl Write, record: &Value) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(record)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(record)?,
        };
        writeln!(out, "{line}").context("Failed to write record")
    }
}
