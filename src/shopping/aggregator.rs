//! Paginated search aggregation.
//!
//! Pages are requested one after another, starting at offset 1 and moving
//! forward by [`PAGE_SIZE`], until a page comes back empty or the offset
//! passes [`MAX_START`]. A failed page aborts the whole run and drops what
//! was collected so far.

use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::error::AggregateError;
use crate::metrics;

use super::client::ShopSearch;
use super::types::{PageRequest, MAX_START, PAGE_SIZE};

/// Collect every page of results for `query`.
#[instrument(skip(source))]
pub async fn collect_all<S>(source: &S, query: &str) -> Result<Vec<Value>, AggregateError>
where
    S: ShopSearch + ?Sized,
{
    if query.is_empty() {
        metrics::inc_search_aggregations(metrics::OUTCOME_REJECTED);
        return Err(AggregateError::MissingParameter);
    }

    let mut collected = Vec::new();
    let mut start = 1;

    while start <= MAX_START {
        let request = PageRequest::new(query, start);
        let page = match source.fetch_page(&request).await {
            Ok(page) => page,
            Err(e) => {
                error!(start, discarded = collected.len(), error = %e, "Naver Shopping API error");
                metrics::inc_search_aggregations(metrics::OUTCOME_FAILED);
                return Err(AggregateError::Upstream { start, source: e });
            }
        };

        let items = page.into_items();
        if items.is_empty() {
            debug!(start, "Empty page, stopping");
            break;
        }

        debug!(start, count = items.len(), "Collected page");
        collected.extend(items);
        start += PAGE_SIZE;
    }

    info!(total = collected.len(), "Fetched all search results");
    metrics::inc_search_aggregations(metrics::OUTCOME_OK);

    Ok(collected)
}
