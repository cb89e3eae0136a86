//! Text-embedding client.
//!
//! The embedding provider is a black box behind the [`Embedder`] trait:
//! text in, fixed-dimension vector out. The live implementation speaks the
//! OpenAI `POST {base}/embeddings` wire format. The model name comes from
//! configuration and is shared between ingest and query so both sides of the
//! collection always live in the same vector space.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::LibrisConfig;
use crate::error::RetrievalError;

/// Bounded timeout for embedding calls; a hung provider surfaces as an
/// upstream failure instead of a hung request.
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// Black-box embedding function: `embed(text) -> vector`.
pub trait Embedder: Send + Sync {
    /// Embed a single text. Exactly one provider call.
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;

    /// Embed a batch of texts in one provider call (ingest path).
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError>;
}

// ---------------------------------------------------------------------------
// OpenAI-compatible client
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Live embedding client for an OpenAI-compatible endpoint.
pub struct OpenAiEmbedder {
    base: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(config: &LibrisConfig) -> Self {
        Self {
            base: config.openai_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.embed_model.clone(),
        }
    }

    fn request(&self, input: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let url = format!("{}/embeddings", self.base);
        let body = EmbeddingRequest {
            model: &self.model,
            input,
        };

        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .timeout(EMBED_TIMEOUT)
            .send_json(&body)
            .map_err(|e| RetrievalError::EmbedFailed {
                message: e.to_string(),
            })?;

        let parsed: EmbeddingResponse =
            response
                .into_json()
                .map_err(|e| RetrievalError::EmbedMalformed {
                    message: e.to_string(),
                })?;

        if parsed.data.len() != input.len() {
            return Err(RetrievalError::EmbedMalformed {
                message: format!(
                    "expected {} embeddings, got {}",
                    input.len(),
                    parsed.data.len()
                ),
            });
        }
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

impl Embedder for OpenAiEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let input = [text.to_string()];
        let mut vectors = self.request(&input)?;
        vectors.pop().ok_or_else(|| RetrievalError::EmbedMalformed {
            message: "empty data array".into(),
        })
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_response_deserializes_provider_shape() {
        let json = r#"{
            "object": "list",
            "data": [
                {"object": "embedding", "index": 0, "embedding": [0.1, -0.2, 0.3]}
            ],
            "model": "text-embedding-3-small",
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        }"#;
        let parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].embedding, vec![0.1, -0.2, 0.3]);
    }

    #[test]
    fn embedding_request_serializes_model_and_input() {
        let input = vec!["hello".to_string()];
        let req = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: &input,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "text-embedding-3-small");
        assert_eq!(value["input"][0], "hello");
    }
}
