//! REST page fetcher

use super::{record_count, take_records, FetchPage, FetchedPage};
use crate::config::FetchConfig;
use crate::error::Result;
use crate::http::{RequestConfig, Transport};
use crate::pagination::{PageRequest, Paginator, Strategy};
use crate::types::query_value;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Fetches pages of a REST endpoint with GET requests
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    config: FetchConfig,
    strategy: Strategy,
    pages_fetched: u64,
}

impl PageFetcher {
    /// Create a fetcher, validating the config and building its strategy
    pub fn new(transport: Arc<dyn Transport>, config: FetchConfig) -> Result<Self> {
        config.validate()?;
        let strategy = Strategy::build(&config.pagination_config(), &config.url)?;

        Ok(Self {
            transport,
            config,
            strategy,
            pages_fetched: 0,
        })
    }

    /// Endpoint configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Current pagination state
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Pages fetched so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// URL and request options for the next page
    ///
    /// Extra params go first so a paging parameter of the same name wins.
    /// A strategy-supplied URL is requested as-is, without extra params.
    fn build_request(&self, page: PageRequest) -> (String, RequestConfig) {
        let mut request = RequestConfig::new();
        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        let url = match page.url {
            Some(url) => url,
            None => {
                for (key, value) in &self.config.params {
                    request = request.query(key, value);
                }
                self.config.url.clone()
            }
        };

        for (key, value) in &page.params {
            request = request.query(key, query_value(value));
        }

        (url, request)
    }
}

#[async_trait]
impl FetchPage for PageFetcher {
    async fn fetch_page(&mut self) -> Result<FetchedPage> {
        let (url, request) = self.build_request(self.strategy.next_request());

        let response = self.transport.get(&url, request).await?.error_for_status()?;
        let mut body = response.json()?;
        let count = record_count(&body, &self.config.data_path)?;
        let next = self.strategy.process_page(&body, count)?;
        let records = take_records(&mut body, &self.config.data_path)?;
        self.pages_fetched += 1;

        debug!(
            "Page {} of {}: {} records ({})",
            self.pages_fetched,
            url,
            records.len(),
            if next.is_done() { "last page" } else { "more pages" }
        );

        Ok(FetchedPage { records, next })
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("config", &self.config)
            .field("strategy", &self.strategy)
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}
