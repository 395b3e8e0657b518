//! MongoDB-backed flower store.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database};
use tracing::{debug, info, instrument};

use crate::error::StoreError;

use super::store::FlowerStore;
use super::types::Flower;

/// Collection holding flower records.
pub const FLOWERS_COLLECTION: &str = "flowers";

/// Database used when the URI does not name one.
pub const DEFAULT_DATABASE: &str = "test";

/// Flower store over a MongoDB collection.
///
/// Created once at startup and shared by all requests; the driver pools
/// connections internally.
#[derive(Debug, Clone)]
pub struct MongoFlowerStore {
    client: Client,
    database: Database,
    collection: Collection<Flower>,
}

impl MongoFlowerStore {
    /// Build a store from a connection string.
    ///
    /// The driver connects lazily, so this succeeds without a reachable
    /// server as long as the URI parses. Use [`ping`](Self::ping) to check.
    #[instrument(skip(uri))]
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        let collection = database.collection::<Flower>(FLOWERS_COLLECTION);

        info!(database = %database.name(), collection = FLOWERS_COLLECTION, "MongoDB client created");

        Ok(Self {
            client,
            database,
            collection,
        })
    }

    /// Round-trip a `ping` command to the server.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Name of the selected database.
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Close all pooled connections.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB client shut down");
    }
}

/// Filter matching `name` against the English or the Korean name.
pub(crate) fn name_filter(name: &str) -> Document {
    doc! {
        "$or": [
            { "flowername": name },
            { "flowername_kr": name },
        ]
    }
}

#[async_trait]
impl FlowerStore for MongoFlowerStore {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<Flower>, StoreError> {
        let filter = name_filter(name);
        debug!(?filter, "Querying flowers collection");

        Ok(self.collection.find_one(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn uses_database_from_uri() {
        let store = MongoFlowerStore::connect("mongodb://localhost:27017/garden")
            .await
            .unwrap();
        assert_eq!(store.database_name(), "garden");
    }

    #[tokio::test]
    async fn falls_back_to_default_database() {
        let store = MongoFlowerStore::connect("mongodb://localhost:27017")
            .await
            .unwrap();
        assert_eq!(store.database_name(), DEFAULT_DATABASE);
    }

    #[test]
    fn name_filter_matches_either_field_exactly() {
        assert_eq!(
            name_filter("장미"),
            doc! {
                "$or": [
                    { "flowername": "장미" },
                    { "flowername_kr": "장미" },
                ]
            }
        );
    }

    #[test]
    fn name_filter_keeps_operators_as_literals() {
        let filter = name_filter("$where");
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(
            clauses[0].as_document().unwrap().get_str("flowername").unwrap(),
            "$where"
        );
    }

    #[tokio::test]
    async fn rejects_malformed_uri() {
        let result = MongoFlowerStore::connect("postgres://localhost").await;
        assert!(matches!(result, Err(StoreError::Mongo(_))));
    }
}
