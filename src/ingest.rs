//! Corpus ingestion: markdown → embeddings → vector collection.
//!
//! Rebuilds the collection from scratch so the index always reflects the
//! corpus file exactly. Each book is embedded as `"{title}\n{summary}"`
//! (title included so title words are searchable), while the stored document
//! is the summary text alone — what retrieval hands back as context.

use tracing::info;

use crate::chroma::{ChromaRecord, ChromaStore};
use crate::corpus::Book;
use crate::embedding::Embedder;
use crate::error::{LibrisResult, RetrievalError};

/// Outcome of one ingest run.
#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    pub books: usize,
}

/// Embed all books in one batch call and pair them with stable ids.
///
/// Ids are derived from the book's position; the authoritative key is the
/// `title` metadata, ids only need to be unique within the collection.
pub fn build_records(
    books: &[Book],
    embedder: &dyn Embedder,
) -> Result<Vec<ChromaRecord>, RetrievalError> {
    let inputs: Vec<String> = books
        .iter()
        .map(|b| format!("{}\n{}", b.title, b.summary))
        .collect();
    let embeddings = embedder.embed_batch(&inputs)?;

    if embeddings.len() != books.len() {
        return Err(RetrievalError::EmbedMalformed {
            message: format!(
                "expected {} embeddings for {} books, got {}",
                books.len(),
                books.len(),
                embeddings.len()
            ),
        });
    }

    Ok(books
        .iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (book, embedding))| ChromaRecord {
            id: format!("book-{i:04}"),
            embedding,
            title: book.title.clone(),
            document: book.summary.clone(),
        })
        .collect())
}

/// Drop and rebuild the collection from the parsed corpus.
pub fn ingest_corpus(
    books: &[Book],
    embedder: &dyn Embedder,
    store: &ChromaStore,
) -> LibrisResult<IngestReport> {
    let records = build_records(books, embedder)?;
    let collection_id = store.reset()?;
    store.add(&collection_id, records)?;
    info!(books = books.len(), "corpus ingested");
    Ok(IngestReport { books: books.len() })
}
