//! Lazy record stream over a page fetcher

use super::FetchPage;
use crate::error::{Error, Result};
use futures::stream::{self, Stream};
use serde_json::Value;
use std::collections::VecDeque;
use tracing::debug;

/// A flat sequence of records drawn page by page from a fetcher
///
/// Each call to [`next`](Self::next) either hands out a buffered record
/// or awaits exactly one page fetch. Once the fetcher reports its last
/// page (or a fetch comes back empty) the stream is exhausted for good and
/// makes no further requests.
#[derive(Debug)]
pub struct ResultStream<F> {
    fetcher: F,
    buffer: VecDeque<Value>,
    done: bool,
    pages_fetched: u64,
}

impl<F: FetchPage> ResultStream<F> {
    /// Wrap a fetcher; nothing is fetched until the first pull
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            buffer: VecDeque::new(),
            done: false,
            pages_fetched: 0,
        }
    }

    /// Next record, or `None` once every page has been consumed
    ///
    /// A failed fetch leaves the pagination state where it was, so pulling
    /// again re-sends the same request.
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&mut self) -> Result<Option<Value>> {
        if self.buffer.is_empty() {
            if self.done {
                return Ok(None);
            }
            self.fetch_into_buffer().await?;
            if self.buffer.is_empty() {
                self.finish();
                return Ok(None);
            }
        }
        Ok(self.buffer.pop_front())
    }

    /// Fetch one page into the empty buffer
    pub(crate) async fn fetch_into_buffer(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            return Err(Error::internal(
                "fetched a new page before the buffered records were consumed",
            ));
        }

        let page = self.fetcher.fetch_page().await?;
        self.pages_fetched += 1;
        self.buffer.extend(page.records);
        if page.next.is_done() {
            self.finish();
        }
        Ok(())
    }

    fn finish(&mut self) {
        if !self.done {
            debug!("Stream exhausted after {} pages", self.pages_fetched);
            self.done = true;
        }
    }

    /// Whether the last page has been fetched
    ///
    /// Buffered records may still be waiting to be pulled.
    pub fn is_exhausted(&self) -> bool {
        self.done
    }

    /// Records fetched but not yet pulled
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Pages fetched so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// The underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Pull every remaining record
    pub async fn collect_all(mut self) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        while let Some(record) = self.next().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Adapt into a [`Stream`]; the stream ends after the first error
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> {
        stream::try_unfold(self, |mut results| async move {
            Ok::<_, Error>(results.next().await?.map(|record| (record, results)))
        })
    }
}
