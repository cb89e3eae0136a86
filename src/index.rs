//! Semantic retrieval: query text → ranked candidate books.
//!
//! [`VectorIndex`] glues the two external black boxes together: it embeds the
//! query exactly once, then hands the vector (never the raw text) to the
//! similarity engine. The engine's return order is the ranking; this wrapper
//! never re-sorts, because the similarity semantics (cosine vs. L2) are
//! engine-defined.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::Embedder;
use crate::error::RetrievalError;

/// One retrieval result. `distance` follows the engine's metric:
/// lower = more similar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateHit {
    pub title: String,
    /// The indexed document text (the stored summary, or a chunk of it).
    pub summary: String,
    pub distance: f32,
}

/// Black-box similarity query: `query(vector, k) -> ranked hits`.
///
/// Implementations return results already rank-sorted, at most `k` of them,
/// and an empty list when the collection holds no documents.
pub trait VectorSearch: Send + Sync {
    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<CandidateHit>, RetrievalError>;
}

/// Maps a free-text query to the `k` most similar catalogued books.
pub struct VectorIndex {
    embedder: Arc<dyn Embedder>,
    engine: Arc<dyn VectorSearch>,
}

impl VectorIndex {
    pub fn new(embedder: Arc<dyn Embedder>, engine: Arc<dyn VectorSearch>) -> Self {
        Self { embedder, engine }
    }

    /// Top-`k` candidates for `query`, in engine order.
    ///
    /// `k == 0` is rejected outright rather than treated as "no limit" or
    /// silently defaulted. An empty query string is allowed; embedding empty
    /// text is the provider's concern.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<CandidateHit>, RetrievalError> {
        if k == 0 {
            return Err(RetrievalError::InvalidTopK { got: 0 });
        }

        let vector = self.embedder.embed(query)?;
        let hits = self.engine.query(&vector, k)?;
        debug!(k, hits = hits.len(), "vector search complete");
        Ok(hits)
    }
}
