//! Core data models used by the library.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A document stored in the snippet collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique, human-readable id (e.g. `doc-js-fetch`).
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Adds a metadata tag, builder style.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A single similarity hit, in the store's ranking order.
#[derive(Clone, Debug, PartialEq)]
pub struct SnippetHit {
    pub id: String,
    pub text: String,
    pub score: f32,
    pub metadata: BTreeMap<String, String>,
}
