//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions live behind this facade so the rest of the crate
//! only deals with [`Document`] and [`SnippetHit`].

use std::collections::{BTreeMap, HashMap};

use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::record::{Document, SnippetHit};

/// Payload keys written for every document.
const KEY_DOC_ID: &str = "doc_id";
const KEY_TEXT: &str = "text";
const KEY_METADATA: &str = "metadata";

/// A facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Building the client does not contact the server.
    pub fn new(cfg: &StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Qdrant(format!("client build: {e}")))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub async fn collection_exists(&self) -> Result<bool, StoreError> {
        self.client
            .collection_exists(self.collection.as_str())
            .await
            .map_err(|e| StoreError::Qdrant(format!("collection_exists: {e}")))
    }

    /// Ensures that the collection exists, creating it with `size`-dimensional
    /// cosine vectors when missing.
    pub async fn ensure_collection(&self, size: usize) -> Result<(), StoreError> {
        if self.collection_exists().await? {
            debug!(collection = %self.collection, "collection already exists");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(size as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| StoreError::Qdrant(format!("create_collection: {e}")))?;

        info!(
            collection = %self.collection,
            size,
            "collection created"
        );
        Ok(())
    }

    /// Exact number of points in the collection. A missing collection counts as empty.
    pub async fn count(&self) -> Result<u64, StoreError> {
        if !self.collection_exists().await? {
            return Ok(0);
        }

        let res = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| StoreError::Qdrant(format!("count: {e}")))?;

        Ok(res.result.map(|r| r.count).unwrap_or(0))
    }

    /// Upserts `(document, vector)` pairs and waits until they are applied.
    ///
    /// Point ids are derived from document ids, so re-upserting a document
    /// replaces it instead of adding a copy.
    pub async fn upsert(&self, batch: Vec<(Document, Vec<f32>)>) -> Result<usize, StoreError> {
        if batch.is_empty() {
            debug!("no documents provided for upsert");
            return Ok(0);
        }

        let mut points = Vec::with_capacity(batch.len());
        for (doc, vector) in batch {
            let payload = document_payload(&doc)?;
            let point_id = services::uuid::stable_uuid(&doc.id).to_string();
            points.push(PointStruct::new(point_id, vector, payload));
        }
        let written = points.len();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| StoreError::Qdrant(format!("upsert_points: {e}")))?;

        info!(collection = %self.collection, written, "documents upserted");
        Ok(written)
    }

    /// Top-`limit` similarity search, best match first.
    pub async fn search(&self, vector: Vec<f32>, limit: u64) -> Result<Vec<SnippetHit>, StoreError> {
        let res = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, limit).with_payload(true),
            )
            .await
            .map_err(|e| StoreError::Qdrant(format!("search_points: {e}")))?;

        let hits: Vec<SnippetHit> = res
            .result
            .into_iter()
            .map(|sp| payload_to_hit(sp.score, sp.payload))
            .collect();

        debug!(collection = %self.collection, hits = hits.len(), "search completed");
        Ok(hits)
    }
}

/// Builds the Qdrant payload for a document.
fn document_payload(doc: &Document) -> Result<Payload, StoreError> {
    let as_json = json!({
        KEY_DOC_ID: doc.id,
        KEY_TEXT: doc.text,
        KEY_METADATA: doc.metadata,
    });
    Payload::try_from(as_json).map_err(|e| StoreError::Qdrant(format!("payload convert: {e}")))
}

/// Reads a hit back from a point payload; missing fields become empty values.
fn payload_to_hit(score: f32, payload: HashMap<String, QValue>) -> SnippetHit {
    let mut json = serde_json::Map::with_capacity(payload.len());
    for (k, v) in payload {
        json.insert(k, v.into_json());
    }
    hit_from_json(score, &serde_json::Value::Object(json))
}

fn hit_from_json(score: f32, payload: &serde_json::Value) -> SnippetHit {
    let str_field = |key: &str| {
        payload
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    let metadata: BTreeMap<String, String> = payload
        .get(KEY_METADATA)
        .and_then(|v| v.as_object())
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default();

    SnippetHit {
        id: str_field(KEY_DOC_ID),
        text: str_field(KEY_TEXT),
        score,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_is_read_from_payload_json() {
        let payload = json!({
            "doc_id": "doc-js-fetch",
            "text": "fetch('/api')",
            "metadata": { "lang": "javascript", "description": "JS fetch example" }
        });

        let hit = hit_from_json(0.87, &payload);
        assert_eq!(hit.id, "doc-js-fetch");
        assert_eq!(hit.text, "fetch('/api')");
        assert_eq!(hit.metadata.get("lang").map(String::as_str), Some("javascript"));
        assert!((hit.score - 0.87).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_fields_become_empty() {
        let hit = hit_from_json(0.1, &json!({}));
        assert!(hit.id.is_empty());
        assert!(hit.text.is_empty());
        assert!(hit.metadata.is_empty());
    }

    #[test]
    fn payload_carries_id_text_and_metadata() {
        let doc = Document::new("doc-python-fastapi", "app = FastAPI()").with_meta("lang", "python");
        let payload = document_payload(&doc).unwrap();

        let hit = payload_to_hit(1.0, HashMap::from(payload));
        assert_eq!(hit.id, doc.id);
        assert_eq!(hit.text, doc.text);
        assert_eq!(hit.metadata, doc.metadata);
    }
}
