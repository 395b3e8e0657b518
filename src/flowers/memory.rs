//! In-memory flower store.
//!
//! Keeps records in insertion order, so the first match wins the same way
//! the document store's natural order does. Used by tests and by the CLI
//! when a seed file is given instead of a database URI.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::StoreError;

use super::store::FlowerStore;
use super::types::Flower;

/// Flower store backed by a vector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlowerStore {
    flowers: Arc<RwLock<Vec<Flower>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryFlowerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `flowers` in the given order.
    pub fn with_flowers(flowers: Vec<Flower>) -> Self {
        Self {
            flowers: Arc::new(RwLock::new(flowers)),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Load a JSON array of flower records.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;
        let flowers: Vec<Flower> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;

        info!(count = flowers.len(), path = %path.display(), "Loaded flower seed data");
        Ok(Self::with_flowers(flowers))
    }

    /// Append a record.
    pub fn insert(&self, flower: Flower) {
        self.flowers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(flower);
    }

    /// Copy of all records, in order.
    pub fn snapshot(&self) -> Vec<Flower> {
        self.flowers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.flowers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every query fail, simulating a lost connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl FlowerStore for InMemoryFlowerStore {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<Flower>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store marked unavailable".to_string()));
        }

        debug!("Searching in-memory flower store");
        let flowers = self.flowers.read().unwrap_or_else(PoisonError::into_inner);
        Ok(flowers.iter().find(|f| f.matches(name)).cloned())
    }
}
