//! Flower record lookup.
//!
//! This module handles:
//! - The flower record type
//! - The store abstraction and the lookup operation
//! - MongoDB and in-memory store implementations

pub mod memory;
pub mod mongo;
pub mod store;
pub mod types;

pub use memory::InMemoryFlowerStore;
pub use mongo::MongoFlowerStore;
pub use store::{lookup_flower, FlowerStore};
pub use types::Flower;
