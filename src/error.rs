//! Unified error types for the gateway.

use thiserror::Error;

/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Document store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Document store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// MongoDB driver error (connection, timeout, malformed query).
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Store cannot serve queries.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Seed file could not be read or parsed.
    #[error("failed to load seed data: {0}")]
    Seed(String),
}

/// Errors from a single shopping search page request.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport-level failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status, including credential rejection.
    #[error("search API returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
}

/// Flower lookup failures.
#[derive(Error, Debug)]
pub enum LookupError {
    /// No name was supplied.
    #[error("flowername is required")]
    MissingParameter,

    /// No record matches either name field.
    #[error("flower not found: {name}")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The store failed to answer.
    #[error("store lookup failed: {0}")]
    Upstream(#[from] StoreError),
}

/// Search aggregation failures.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// No query was supplied.
    #[error("flowername is required")]
    MissingParameter,

    /// A page request failed; collected items were discarded.
    #[error("search aggregation failed at start={start}: {source}")]
    Upstream {
        /// Offset of the failed page.
        start: u32,
        /// Underlying page error.
        #[source]
        source: SearchError,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_convert_for_startup() {
        fn open() -> Result<()> {
            let seeded: std::result::Result<(), StoreError> =
                Err(StoreError::Seed("flowers.json: expected array".to_string()));
            seeded?;
            Ok(())
        }

        let err = open().unwrap_err();
        assert!(matches!(err, GatewayError::Store(StoreError::Seed(_))));
        assert_eq!(
            err.to_string(),
            "store error: failed to load seed data: flowers.json: expected array"
        );
    }
}
