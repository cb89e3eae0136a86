//! Rich diagnostic error types for libris.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes, help text, and source chains so users know
//! exactly what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for libris.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum LibrisError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Completion(#[from] CompletionError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("missing OpenAI API key")]
    #[diagnostic(
        code(libris::config::missing_api_key),
        help(
            "Set the OPENAI_API_KEY environment variable. The key is required \
             for both the embedding and chat-completion clients."
        )
    )]
    MissingApiKey,

    #[error("invalid value for {var}: \"{value}\"")]
    #[diagnostic(
        code(libris::config::invalid_value),
        help("Check the environment variable — {reason}.")
    )]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Corpus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CorpusError {
    #[error("corpus file not readable: {path}")]
    #[diagnostic(
        code(libris::corpus::io),
        help(
            "Check that the corpus file exists and has read permissions. \
             The default location is data/book_summaries.md; override with \
             --corpus or LIBRIS_CORPUS."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus contains no books")]
    #[diagnostic(
        code(libris::corpus::empty),
        help(
            "The corpus markdown had no \"## Title:\" blocks. Each book must \
             start with a line of the form `## Title: <exact title>` followed \
             by its summary."
        )
    )]
    Empty,

    #[error("duplicate title in corpus: \"{title}\"")]
    #[diagnostic(
        code(libris::corpus::duplicate_title),
        help(
            "Titles are exact-match lookup keys and must be unique. Rename or \
             remove one of the duplicate blocks."
        )
    )]
    DuplicateTitle { title: String },
}

// ---------------------------------------------------------------------------
// Retrieval errors (embedding + vector search)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RetrievalError {
    #[error("invalid top_k: must be a positive integer, got {got}")]
    #[diagnostic(
        code(libris::retrieval::invalid_top_k),
        help("Pass top_k >= 1. Zero is rejected rather than treated as \"no limit\".")
    )]
    InvalidTopK { got: usize },

    #[error("embedding request failed: {message}")]
    #[diagnostic(
        code(libris::retrieval::embed_failed),
        help(
            "The embedding provider call failed. Check network connectivity, \
             the API key, and the configured embedding model name."
        )
    )]
    EmbedFailed { message: String },

    #[error("embedding response malformed: {message}")]
    #[diagnostic(
        code(libris::retrieval::embed_malformed),
        help("The provider returned a response without the expected embedding data.")
    )]
    EmbedMalformed { message: String },

    #[error("vector search failed: {message}")]
    #[diagnostic(
        code(libris::retrieval::search_failed),
        help(
            "The similarity-search engine call failed. Check that the engine \
             is running and reachable at the configured URL."
        )
    )]
    SearchFailed { message: String },

    #[error("collection not available: \"{name}\"")]
    #[diagnostic(
        code(libris::retrieval::collection_missing),
        help(
            "The vector collection does not exist on the engine. Run \
             `libris ingest` to build it from the corpus."
        )
    )]
    CollectionMissing { name: String },
}

// ---------------------------------------------------------------------------
// Chat-completion errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CompletionError {
    #[error("chat completion request failed: {message}")]
    #[diagnostic(
        code(libris::chat::request_failed),
        help(
            "The chat-completion call failed. Check network connectivity, the \
             API key, quota, and the configured chat model name."
        )
    )]
    RequestFailed { message: String },

    #[error("chat completion response malformed: {message}")]
    #[diagnostic(
        code(libris::chat::malformed_reply),
        help("The provider returned a response without the expected choices/message shape.")
    )]
    MalformedReply { message: String },
}

/// Convenience alias for functions returning libris results.
pub type LibrisResult<T> = std::result::Result<T, LibrisError>;
