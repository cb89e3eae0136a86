//! Chroma REST client.
//!
//! Implements [`VectorSearch`] against a running Chroma server and carries
//! the write path used by ingestion (drop/recreate the collection, add
//! records). Queries always supply the query vector directly — never raw
//! text — so the vector space is fixed by the ingest-time embedding model.

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::config::LibrisConfig;
use crate::error::RetrievalError;
use crate::index::{CandidateHit, VectorSearch};

const CHROMA_TIMEOUT: Duration = Duration::from_secs(30);

/// One record handed to the engine at ingest time.
#[derive(Debug, Clone)]
pub struct ChromaRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    pub title: String,
    pub document: String,
}

/// Client for one named Chroma collection.
pub struct ChromaStore {
    base: String,
    collection: String,
    // Collection UUID, resolved once per process; reset() invalidates it.
    cached_id: Mutex<Option<String>>,
}

#[derive(Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Deserialize)]
struct Meta {
    title: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Vec<Vec<Option<String>>>,
    #[serde(default)]
    metadatas: Vec<Vec<Option<Meta>>>,
    #[serde(default)]
    distances: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct AddRequest {
    ids: Vec<String>,
    embeddings: Vec<Vec<f32>>,
    metadatas: Vec<serde_json::Value>,
    documents: Vec<String>,
}

impl ChromaStore {
    pub fn new(config: &LibrisConfig) -> Self {
        Self {
            base: config.chroma_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            cached_id: Mutex::new(None),
        }
    }

    fn url(&self, tail: &str) -> String {
        format!("{}/api/v1/{tail}", self.base)
    }

    /// Resolve the collection's UUID by name. 404 means the collection has
    /// not been ingested yet.
    fn collection_id(&self) -> Result<String, RetrievalError> {
        if let Some(id) = self.cached_id.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            return Ok(id);
        }

        let url = self.url(&format!("collections/{}", self.collection));
        let response = ureq::get(&url)
            .timeout(CHROMA_TIMEOUT)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(404, _) => RetrievalError::CollectionMissing {
                    name: self.collection.clone(),
                },
                other => RetrievalError::SearchFailed {
                    message: other.to_string(),
                },
            })?;

        let info: CollectionInfo =
            response
                .into_json()
                .map_err(|e| RetrievalError::SearchFailed {
                    message: format!("collection lookup: {e}"),
                })?;

        *self.cached_id.lock().unwrap_or_else(|e| e.into_inner()) = Some(info.id.clone());
        Ok(info.id)
    }

    /// Drop and recreate the collection, returning the fresh UUID.
    pub fn reset(&self) -> Result<String, RetrievalError> {
        let delete_url = self.url(&format!("collections/{}", self.collection));
        // Best effort: a missing collection is fine on first ingest.
        let _ = ureq::delete(&delete_url).timeout(CHROMA_TIMEOUT).call();

        let create_url = self.url("collections");
        let response = ureq::post(&create_url)
            .timeout(CHROMA_TIMEOUT)
            .send_json(json!({ "name": self.collection, "get_or_create": true }))
            .map_err(|e| RetrievalError::SearchFailed {
                message: format!("create collection: {e}"),
            })?;

        let info: CollectionInfo =
            response
                .into_json()
                .map_err(|e| RetrievalError::SearchFailed {
                    message: format!("create collection: {e}"),
                })?;

        *self.cached_id.lock().unwrap_or_else(|e| e.into_inner()) = Some(info.id.clone());
        info!(collection = %self.collection, "collection reset");
        Ok(info.id)
    }

    /// Add pre-embedded records to the collection.
    pub fn add(&self, collection_id: &str, records: Vec<ChromaRecord>) -> Result<(), RetrievalError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut request = AddRequest {
            ids: Vec::with_capacity(records.len()),
            embeddings: Vec::with_capacity(records.len()),
            metadatas: Vec::with_capacity(records.len()),
            documents: Vec::with_capacity(records.len()),
        };
        for record in records {
            request.ids.push(record.id);
            request.embeddings.push(record.embedding);
            request.metadatas.push(json!({ "title": record.title }));
            request.documents.push(record.document);
        }

        let url = self.url(&format!("collections/{collection_id}/add"));
        ureq::post(&url)
            .timeout(CHROMA_TIMEOUT)
            .send_json(&request)
            .map_err(|e| RetrievalError::SearchFailed {
                message: format!("add records: {e}"),
            })?;
        Ok(())
    }
}

impl VectorSearch for ChromaStore {
    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<CandidateHit>, RetrievalError> {
        let collection_id = self.collection_id()?;
        let url = self.url(&format!("collections/{collection_id}/query"));

        let response = ureq::post(&url)
            .timeout(CHROMA_TIMEOUT)
            .send_json(json!({
                "query_embeddings": [vector],
                "n_results": k,
                "include": ["documents", "metadatas", "distances"],
            }))
            .map_err(|e| RetrievalError::SearchFailed {
                message: e.to_string(),
            })?;

        let parsed: QueryResponse =
            response
                .into_json()
                .map_err(|e| RetrievalError::SearchFailed {
                    message: format!("query response: {e}"),
                })?;

        Ok(assemble_hits(parsed))
    }
}

/// Zip the engine's column-oriented response into hits, preserving its
/// row order exactly. Rows missing a document or metadata are dropped.
fn assemble_hits(response: QueryResponse) -> Vec<CandidateHit> {
    let documents = response.documents.into_iter().next().unwrap_or_default();
    let metadatas = response.metadatas.into_iter().next().unwrap_or_default();
    let distances = response.distances.into_iter().next().unwrap_or_default();

    documents
        .into_iter()
        .zip(metadatas)
        .zip(distances)
        .filter_map(|((document, meta), distance)| {
            Some(CandidateHit {
                title: meta?.title,
                summary: document?,
                distance,
            })
        })
        .collect()
}
