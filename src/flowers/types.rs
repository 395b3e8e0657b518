//! Flower record stored in the `flowers` collection.

use serde::{Deserialize, Serialize};

/// A flower record.
///
/// Every field is optional in the store. Absent fields serialize as `null`
/// so responses always carry the same five keys. Unknown stored fields such
/// as `_id` are dropped on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flower {
    /// English name.
    #[serde(default)]
    pub flowername: Option<String>,
    /// Where the flower grows.
    #[serde(default)]
    pub habitat: Option<String>,
    /// Scientific name.
    #[serde(default, rename = "binomialName")]
    pub binomial_name: Option<String>,
    /// Taxonomic classification.
    #[serde(default)]
    pub classification: Option<String>,
    /// Korean name.
    #[serde(default)]
    pub flowername_kr: Option<String>,
}

impl Flower {
    /// Whether either name field equals `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.flowername.as_deref() == Some(name) || self.flowername_kr.as_deref() == Some(name)
    }
}
