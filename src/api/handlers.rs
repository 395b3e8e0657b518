//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AggregateError, LookupError};
use crate::flowers::{lookup_flower, Flower, FlowerStore};
use crate::shopping::{collect_all, ShopSearch, ShoppingResponse};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Flower record store.
    pub flowers: Arc<dyn FlowerStore>,
    /// Shopping search source.
    pub shopping: Arc<dyn ShopSearch>,
    /// Prometheus handle, present when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(flowers: Arc<dyn FlowerStore>, shopping: Arc<dyn ShopSearch>) -> Self {
        Self {
            flowers,
            shopping,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Query string shared by both endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FlowerQuery {
    /// English or Korean flower name.
    pub flowername: Option<String>,
}

impl FlowerQuery {
    fn name(&self) -> &str {
        self.flowername.as_deref().unwrap_or_default()
    }

    /// Accept any query string; an unparseable one carries no name.
    fn from_extracted(query: Result<Query<FlowerQuery>, QueryRejection>) -> Self {
        match query {
            Ok(Query(params)) => params,
            Err(rejection) => {
                debug!(%rejection, "Ignoring malformed query string");
                Self::default()
            }
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Public error message.
    pub error: String,
}

/// Handler error mapped to a fixed public message.
///
/// Upstream causes are logged where they happen and never reach the body.
#[derive(Debug)]
pub enum ApiError {
    /// Flower lookup failed.
    Lookup(LookupError),
    /// Search aggregation failed.
    Search(AggregateError),
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        ApiError::Lookup(e)
    }
}

impl From<AggregateError> for ApiError {
    fn from(e: AggregateError) -> Self {
        ApiError::Search(e)
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Lookup(LookupError::MissingParameter)
            | ApiError::Search(AggregateError::MissingParameter) => {
                (StatusCode::BAD_REQUEST, "Flowername is required")
            }
            ApiError::Lookup(LookupError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "Flower not found")
            }
            ApiError::Lookup(LookupError::Upstream(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "An error occurred")
            }
            ApiError::Search(AggregateError::Upstream { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Naver Shopping API error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Flower lookup handler.
pub async fn get_flower(
    State(state): State<AppState>,
    query: Result<Query<FlowerQuery>, QueryRejection>,
) -> Result<Json<Flower>, ApiError> {
    let params = FlowerQuery::from_extracted(query);
    let flower = lookup_flower(state.flowers.as_ref(), params.name()).await?;
    Ok(Json(flower))
}

/// Shopping search handler - returns every page collected for the name.
pub async fn naver_shopping(
    State(state): State<AppState>,
    query: Result<Query<FlowerQuery>, QueryRejection>,
) -> Result<Json<ShoppingResponse>, ApiError> {
    let params = FlowerQuery::from_extracted(query);
    let items = collect_all(state.shopping.as_ref(), params.name()).await?;
    Ok(Json(ShoppingResponse { items }))
}

/// Prometheus metrics handler - 404 when metrics are disabled.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SearchError, StoreError};

    #[test]
    fn errors_map_to_public_messages() {
        let cases: Vec<(ApiError, StatusCode, &str)> = vec![
            (
                LookupError::MissingParameter.into(),
                StatusCode::BAD_REQUEST,
                "Flowername is required",
            ),
            (
                LookupError::NotFound {
                    name: "Orchid".to_string(),
                }
                .into(),
                StatusCode::NOT_FOUND,
                "Flower not found",
            ),
            (
                LookupError::Upstream(StoreError::Unavailable("down".to_string())).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred",
            ),
            (
                AggregateError::MissingParameter.into(),
                StatusCode::BAD_REQUEST,
                "Flowername is required",
            ),
            (
                AggregateError::Upstream {
                    start: 1,
                    source: SearchError::Status {
                        status: 401,
                        body: String::new(),
                    },
                }
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Naver Shopping API error",
            ),
        ];

        for (error, status, message) in cases {
            assert_eq!(error.status_and_message(), (status, message));
        }
    }

    #[test]
    fn flower_query_defaults_to_empty_name() {
        assert_eq!(FlowerQuery::default().name(), "");
    }
}
