//! Flower gateway.
//!
//! A small HTTP gateway with two endpoints:
//!
//! - `GET /flowers?flowername=...` resolves an English or Korean flower name
//!   to its stored record.
//! - `GET /naver-shopping?flowername=...` pages through the Naver Shopping
//!   search API and returns every item in one response.
//!
//! ```text
//! start=1   display=100  -> 100 items
//! start=101 display=100  -> 100 items
//! start=201 display=100  ->   0 items  (stop)
//! ─────────────────────────────────────
//! response: 200 items
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`flowers`]: Flower records and stores
//! - [`shopping`]: Naver Shopping client and aggregation
//! - [`api`]: HTTP router and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod flowers;
pub mod metrics;
pub mod shopping;
pub mod utils;

pub use config::Config;
pub use error::{GatewayError, Result};
