//! Naver Shopping search request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Items requested per page.
pub const PAGE_SIZE: u32 = 100;

/// Largest `start` offset the aggregator will request.
pub const MAX_START: u32 = 1000;

/// Result ordering accepted by the search API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchSort {
    /// Relevance.
    #[default]
    Sim,
    /// Newest first.
    Date,
    /// Price ascending.
    Asc,
    /// Price descending.
    Dsc,
}

/// One page request against the search API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Search terms.
    pub query: String,
    /// Items per page (`display`).
    pub display: u32,
    /// 1-based offset of the first item (`start`).
    pub start: u32,
    /// Result ordering.
    pub sort: SearchSort,
}

impl PageRequest {
    /// Relevance-sorted request for a full page starting at `start`.
    pub fn new(query: impl Into<String>, start: u32) -> Self {
        Self {
            query: query.into(),
            display: PAGE_SIZE,
            start,
            sort: SearchSort::Sim,
        }
    }
}

/// Search API response envelope.
///
/// Only `items` is used. The rest is kept loosely typed for logging, so an
/// odd metadata value never rejects the page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// Response timestamp as sent by the API.
    #[serde(default)]
    pub last_build_date: Option<Value>,
    /// Total hits reported by the API.
    #[serde(default)]
    pub total: Option<Value>,
    /// Echo of the requested offset.
    #[serde(default)]
    pub start: Option<Value>,
    /// Number of items in this page.
    #[serde(default)]
    pub display: Option<Value>,
    /// Result items, passed through untouched.
    #[serde(default)]
    pub items: Option<Vec<Value>>,
}

impl SearchPage {
    /// Page holding `items`.
    pub fn with_items(items: Vec<Value>) -> Self {
        Self {
            display: Some(Value::from(items.len())),
            items: Some(items),
            ..Default::default()
        }
    }

    /// Items in this page; a missing list counts as empty.
    pub fn into_items(self) -> Vec<Value> {
        self.items.unwrap_or_default()
    }
}

/// Body returned by `/naver-shopping`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingResponse {
    /// Every collected item, in page order.
    pub items: Vec<Value>,
}
