//! Store abstraction and the flower lookup operation.

use async_trait::async_trait;
use tracing::{debug, error, instrument};

use crate::error::{LookupError, StoreError};
use crate::metrics;

use super::types::Flower;

/// Read access to the flower collection.
///
/// Implementations are shared across requests and must be safe to call
/// concurrently.
#[async_trait]
pub trait FlowerStore: Send + Sync {
    /// Find the first record whose English or Korean name equals `name`.
    async fn find_by_name(&self, name: &str) -> Result<Option<Flower>, StoreError>;
}

/// Resolve a flower name to its stored record.
///
/// An empty name is rejected before the store is queried.
#[instrument(skip(store))]
pub async fn lookup_flower<S>(store: &S, name: &str) -> Result<Flower, LookupError>
where
    S: FlowerStore + ?Sized,
{
    if name.is_empty() {
        metrics::inc_flower_lookups(metrics::OUTCOME_REJECTED);
        return Err(LookupError::MissingParameter);
    }

    let result = {
        let _timer = metrics::timer_store_lookup();
        store.find_by_name(name).await
    };

    match result {
        Ok(Some(flower)) => {
            debug!("flower found");
            metrics::inc_flower_lookups(metrics::OUTCOME_OK);
            Ok(flower)
        }
        Ok(None) => {
            debug!("flower not found");
            metrics::inc_flower_lookups(metrics::OUTCOME_NOT_FOUND);
            Err(LookupError::NotFound {
                name: name.to_string(),
            })
        }
        Err(e) => {
            error!(error = %e, "Error retrieving flower information");
            metrics::inc_flower_lookups(metrics::OUTCOME_FAILED);
            Err(LookupError::Upstream(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowers::memory::InMemoryFlowerStore;
    use pretty_assertions::assert_eq;

    fn flower(en: &str, kr: &str) -> Flower {
        Flower {
            flowername: Some(en.to_string()),
            habitat: Some("Meadow".to_string()),
            binomial_name: Some(format!("{} binomial", en)),
            classification: Some("Plantae".to_string()),
            flowername_kr: Some(kr.to_string()),
        }
    }

    fn store() -> InMemoryFlowerStore {
        InMemoryFlowerStore::with_flowers(vec![
            flower("Rose", "장미"),
            flower("Tulip", "튤립"),
            flower("Sunflower", "해바라기"),
        ])
    }

    #[tokio::test]
    async fn every_record_is_found_by_either_name() {
        let store = store();
        for record in store.snapshot() {
            let en = record.flowername.clone().unwrap();
            let kr = record.flowername_kr.clone().unwrap();

            assert_eq!(lookup_flower(&store, &en).await.unwrap(), record);
            assert_eq!(lookup_flower(&store, &kr).await.unwrap(), record);
        }
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let result = lookup_flower(&store(), "Orchid").await;
        assert!(matches!(result, Err(LookupError::NotFound { name }) if name == "Orchid"));
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let result = lookup_flower(&store(), "").await;
        assert!(matches!(result, Err(LookupError::MissingParameter)));
    }

    #[tokio::test]
    async fn store_failure_is_upstream_error() {
        let store = store();
        store.set_unavailable(true);

        let result = lookup_flower(&store, "Rose").await;
        assert!(matches!(result, Err(LookupError::Upstream(_))));
    }

    #[tokio::test]
    async fn works_through_trait_object() {
        let store: std::sync::Arc<dyn FlowerStore> = std::sync::Arc::new(store());
        let found = lookup_flower(store.as_ref(), "튤립").await.unwrap();
        assert_eq!(found.flowername.as_deref(), Some("Tulip"));
    }
}
