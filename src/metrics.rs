//! Prometheus metrics for lookups and search aggregation.
//!
//! Metrics are recorded through the `metrics` facade. Without an installed
//! recorder every call is a no-op, which is what unit tests rely on.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Flower lookups counter metric name.
pub const METRIC_FLOWER_LOOKUPS: &str = "flower_lookups_total";
/// Store lookup latency metric name.
pub const METRIC_STORE_LOOKUP_LATENCY: &str = "store_lookup_latency_ms";
/// Search pages fetched counter metric name.
pub const METRIC_SEARCH_PAGES: &str = "search_pages_fetched_total";
/// Search page latency metric name.
pub const METRIC_SEARCH_PAGE_LATENCY: &str = "search_page_latency_ms";
/// Search aggregations counter metric name.
pub const METRIC_SEARCH_AGGREGATIONS: &str = "search_aggregations_total";

// === Outcome Labels ===

/// Request answered.
pub const OUTCOME_OK: &str = "ok";
/// No matching record.
pub const OUTCOME_NOT_FOUND: &str = "not_found";
/// Missing parameter.
pub const OUTCOME_REJECTED: &str = "rejected";
/// Upstream failure.
pub const OUTCOME_FAILED: &str = "failed";

/// Install the Prometheus recorder and describe all metrics.
/// Call this once at startup; the handle renders the `/metrics` body.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(
        METRIC_FLOWER_LOOKUPS,
        "Total number of flower lookups by outcome"
    );
    describe_histogram!(
        METRIC_STORE_LOOKUP_LATENCY,
        "Document store lookup latency in milliseconds"
    );
    describe_counter!(
        METRIC_SEARCH_PAGES,
        "Total number of search pages fetched"
    );
    describe_histogram!(
        METRIC_SEARCH_PAGE_LATENCY,
        "Search page request latency in milliseconds"
    );
    describe_counter!(
        METRIC_SEARCH_AGGREGATIONS,
        "Total number of search aggregations by outcome"
    );

    debug!("Metrics initialized");
    Ok(handle)
}

/// Increment flower lookups counter.
pub fn inc_flower_lookups(outcome: &'static str) {
    counter!(METRIC_FLOWER_LOOKUPS, "outcome" => outcome).increment(1);
}

/// Increment search pages counter.
pub fn inc_search_pages() {
    counter!(METRIC_SEARCH_PAGES).increment(1);
}

/// Increment search aggregations counter.
pub fn inc_search_aggregations(outcome: &'static str) {
    counter!(METRIC_SEARCH_AGGREGATIONS, "outcome" => outcome).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for store lookups.
pub fn timer_store_lookup() -> LatencyTimer {
    LatencyTimer::new(METRIC_STORE_LOOKUP_LATENCY)
}

/// Create a latency timer for search page requests.
pub fn timer_search_page() -> LatencyTimer {
    LatencyTimer::new(METRIC_SEARCH_PAGE_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = timer_store_lookup();
        sleep(Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 9.0);
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        inc_flower_lookups(OUTCOME_OK);
        inc_search_pages();
        inc_search_aggregations(OUTCOME_FAILED);
    }
}
