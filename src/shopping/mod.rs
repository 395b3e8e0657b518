//! Naver Shopping search aggregation.
//!
//! This module handles:
//! - Search request/response types
//! - The Naver Shopping HTTP client
//! - The paginated aggregation loop
//! - Mock search source for testing

pub mod aggregator;
pub mod client;
pub mod mock;
pub mod types;

pub use aggregator::collect_all;
pub use client::{NaverShoppingClient, ShopSearch};
pub use mock::{MockConfig, MockShopSearch};
pub use types::{PageRequest, SearchPage, SearchSort, ShoppingResponse, MAX_START, PAGE_SIZE};
