//! Scripted search source for unit testing.
//!
//! Serves generated pages without touching the network and records every
//! request it receives.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::SearchError;

use super::client::ShopSearch;
use super::types::{PageRequest, SearchPage};

/// Configuration for mock source behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Non-empty pages served before the source runs dry. `None` never runs dry.
    pub pages: Option<usize>,
    /// Items per non-empty page. Zero means the requested `display`.
    pub items_per_page: usize,
    /// 1-based call number that fails with a 500.
    pub fail_on_call: Option<usize>,
    /// Answer dry calls with no `items` key instead of an empty list.
    pub omit_items_when_dry: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// Mock search source for testing.
#[derive(Debug, Clone, Default)]
pub struct MockShopSearch {
    /// Mock configuration.
    config: MockConfig,
    /// Requests received, in order.
    calls: Arc<Mutex<Vec<PageRequest>>>,
}

impl MockShopSearch {
    /// Create a mock source with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve `pages` full pages, then empty ones.
    pub fn with_pages(pages: usize) -> Self {
        Self::with_config(MockConfig {
            pages: Some(pages),
            ..Default::default()
        })
    }

    /// Never run dry.
    pub fn endless() -> Self {
        Self::with_config(MockConfig::default())
    }

    /// Fail the given 1-based call.
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.config.fail_on_call = Some(call);
        self
    }

    /// Number of requests received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Copy of the requests received.
    pub fn calls(&self) -> Vec<PageRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn item(query: &str, position: usize) -> Value {
        json!({
            "title": format!("{} #{}", query, position),
            "productId": position.to_string(),
        })
    }
}

#[async_trait]
impl ShopSearch for MockShopSearch {
    async fn fetch_page(&self, request: &PageRequest) -> Result<SearchPage, SearchError> {
        let call = {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            calls.push(request.clone());
            calls.len()
        };

        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.config.fail_on_call == Some(call) {
            return Err(SearchError::Status {
                status: 500,
                body: "Mock search failure".to_string(),
            });
        }

        let dry = self.config.pages.is_some_and(|pages| call > pages);
        if dry {
            if self.config.omit_items_when_dry {
                return Ok(SearchPage::default());
            }
            return Ok(SearchPage::with_items(Vec::new()));
        }

        let size = match self.config.items_per_page {
            0 => request.display as usize,
            n => n,
        };
        let first = request.start as usize;
        let items = (first..first + size)
            .map(|position| Self::item(&request.query, position))
            .collect();

        Ok(SearchPage::with_items(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_pages_then_runs_dry() {
        let mock = MockShopSearch::with_pages(1);

        let page = mock.fetch_page(&PageRequest::new("rose", 1)).await.unwrap();
        assert_eq!(page.into_items().len(), 100);

        let page = mock.fetch_page(&PageRequest::new("rose", 101)).await.unwrap();
        assert!(page.into_items().is_empty());

        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.calls()[1].start, 101);
    }

    #[tokio::test]
    async fn fails_on_configured_call() {
        let mock = MockShopSearch::endless().failing_on_call(2);

        assert!(mock.fetch_page(&PageRequest::new("rose", 1)).await.is_ok());
        assert!(mock.fetch_page(&PageRequest::new("rose", 101)).await.is_err());
        assert!(mock.fetch_page(&PageRequest::new("rose", 201)).await.is_ok());
    }

    #[tokio::test]
    async fn latency_delays_each_page() {
        let mock = MockShopSearch::with_config(MockConfig {
            pages: Some(1),
            latency_ms: 25,
            ..Default::default()
        });

        let started = tokio::time::Instant::now();
        mock.fetch_page(&PageRequest::new("rose", 1)).await.unwrap();
        mock.fetch_page(&PageRequest::new("rose", 101)).await.unwrap();

        assert!(started.elapsed() >= std::time::Duration::from_millis(50));
    }

    #[tokio::test]
    async fn dry_page_without_items_key() {
        let mock = MockShopSearch::with_config(MockConfig {
            pages: Some(0),
            omit_items_when_dry: true,
            ..Default::default()
        });

        let page = mock.fetch_page(&PageRequest::new("rose", 1)).await.unwrap();
        assert!(page.items.is_none());
    }
}
