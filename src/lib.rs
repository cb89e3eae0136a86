//! # libris
//!
//! Retrieval-augmented book recommendation: semantic search over a small
//! corpus of book summaries, followed by a two-pass LLM call that grounds
//! its answer in the retrieved context and resolves a lookup tool call into
//! a verified, exact-match summary.
//!
//! ## Architecture
//!
//! - **Corpus** (`corpus`): markdown `## Title:` blocks → `Book` records
//! - **Summary store** (`summaries`): exact-title → full-summary lookup
//! - **Retrieval** (`embedding`, `index`, `chroma`): query → embedding →
//!   engine-ranked candidates
//! - **Protocol** (`chat`, `recommend`): moderation gate → grounding call →
//!   tool resolution → final answer
//! - **Ingestion** (`ingest`): rebuild the vector collection from the corpus
//!
//! External collaborators (embedding provider, similarity engine, chat
//! model) sit behind the `Embedder`, `VectorSearch`, and `ChatCompleter`
//! traits so the protocol is testable with deterministic fakes.
//!
//! ## Library usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use libris::chat::OpenAiChat;
//! use libris::chroma::ChromaStore;
//! use libris::config::LibrisConfig;
//! use libris::corpus::load_corpus;
//! use libris::embedding::OpenAiEmbedder;
//! use libris::index::VectorIndex;
//! use libris::moderation::ModerationGate;
//! use libris::recommend::Recommender;
//! use libris::summaries::SummaryStore;
//!
//! let config = LibrisConfig::from_env().unwrap();
//! let books = load_corpus(&config.corpus_path).unwrap();
//! let recommender = Recommender::new(
//!     ModerationGate::new(),
//!     VectorIndex::new(
//!         Arc::new(OpenAiEmbedder::new(&config)),
//!         Arc::new(ChromaStore::new(&config)),
//!     ),
//!     SummaryStore::from_books(&books),
//!     Arc::new(OpenAiChat::new(&config)),
//! );
//! let answer = recommender.recommend("a story about a totalitarian state", 3).unwrap();
//! println!("{}", answer.assistant);
//! ```

pub mod chat;
pub mod chroma;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod index;
pub mod ingest;
pub mod moderation;
pub mod recommend;
pub mod summaries;

pub use error::{LibrisError, LibrisResult};
