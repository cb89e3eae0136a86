//! Runtime configuration, resolved from environment variables.
//!
//! The embedding model named here is a correctness-critical setting: the
//! collection must be queried with vectors from the same model (and thus the
//! same dimension) it was ingested with. Both the ingest path and the query
//! path read the model from this one config value so they cannot drift.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Default number of retrieval candidates handed to the model.
pub const DEFAULT_TOP_K: usize = 3;

/// Runtime configuration for clients and the corpus location.
#[derive(Debug, Clone)]
pub struct LibrisConfig {
    /// Base URL for the OpenAI-compatible API (no trailing slash).
    pub openai_base: String,
    /// Bearer token for the OpenAI-compatible API.
    pub api_key: String,
    /// Embedding model — must match the model used at ingest time.
    pub embed_model: String,
    /// Chat-completion model.
    pub chat_model: String,
    /// Base URL of the Chroma server.
    pub chroma_url: String,
    /// Vector collection holding the book summaries.
    pub collection: String,
    /// Markdown corpus file (`## Title:` blocks).
    pub corpus_path: PathBuf,
    /// Default retrieval depth when a request does not specify one.
    pub default_top_k: usize,
}

impl LibrisConfig {
    /// Resolve configuration from the environment.
    ///
    /// Every setting has a default except `OPENAI_API_KEY`, which is required
    /// because both live clients authenticate with it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let default_top_k = match std::env::var("LIBRIS_TOP_K") {
            Ok(raw) => match raw.parse::<usize>() {
                Ok(k) if k > 0 => k,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "LIBRIS_TOP_K",
                        value: raw,
                        reason: "it must parse as a positive integer",
                    });
                }
            },
            Err(_) => DEFAULT_TOP_K,
        };

        Ok(Self {
            openai_base: env_or("LIBRIS_OPENAI_BASE", "https://api.openai.com/v1"),
            api_key,
            embed_model: env_or("LIBRIS_EMBED_MODEL", "text-embedding-3-small"),
            chat_model: env_or("LIBRIS_CHAT_MODEL", "gpt-4o-mini"),
            chroma_url: env_or("LIBRIS_CHROMA_URL", "http://127.0.0.1:8000"),
            collection: env_or("LIBRIS_COLLECTION", "book_summaries"),
            corpus_path: PathBuf::from(env_or("LIBRIS_CORPUS", "data/book_summaries.md")),
            default_top_k,
        })
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}
