//! libris CLI: ingest the corpus, ask for a recommendation, inspect titles.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::Result;

use libris::chat::OpenAiChat;
use libris::chroma::ChromaStore;
use libris::config::LibrisConfig;
use libris::corpus::load_corpus;
use libris::embedding::OpenAiEmbedder;
use libris::index::VectorIndex;
use libris::ingest::ingest_corpus;
use libris::moderation::ModerationGate;
use libris::recommend::Recommender;
use libris::summaries::SummaryStore;

#[derive(Parser)]
#[command(name = "libris", version, about = "Book recommendation over a summary corpus")]
struct Cli {
    /// Corpus markdown file (overrides LIBRIS_CORPUS).
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the vector collection from the corpus file.
    Ingest,

    /// Ask for a single book recommendation.
    Ask {
        /// Free-text query, e.g. "a story about friendship and magic".
        query: String,

        /// Number of retrieval candidates handed to the model.
        #[arg(long, default_value = "3")]
        top_k: usize,
    },

    /// List the titles in the corpus.
    Titles,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = LibrisConfig::from_env()?;
    if let Some(corpus) = cli.corpus {
        config.corpus_path = corpus;
    }

    match cli.command {
        Commands::Ingest => {
            let books = load_corpus(&config.corpus_path)?;
            let embedder = OpenAiEmbedder::new(&config);
            let store = ChromaStore::new(&config);
            let report = ingest_corpus(&books, &embedder, &store)?;
            println!(
                "Ingested {} books into collection \"{}\"",
                report.books, config.collection
            );
        }

        Commands::Ask { query, top_k } => {
            let books = load_corpus(&config.corpus_path)?;
            let recommender = Recommender::new(
                ModerationGate::new(),
                VectorIndex::new(
                    Arc::new(OpenAiEmbedder::new(&config)),
                    Arc::new(ChromaStore::new(&config)),
                ),
                SummaryStore::from_books(&books),
                Arc::new(OpenAiChat::new(&config)),
            );

            let answer = recommender.recommend(&query, top_k)?;
            println!("{}", answer.assistant);
            if let Some(title) = &answer.recommendation {
                println!("\nTop match: {title}");
            }
            if let Some(summary) = &answer.summary {
                println!("\nFull summary:\n{summary}");
            }
        }

        Commands::Titles => {
            let books = load_corpus(&config.corpus_path)?;
            for book in &books {
                println!("{}", book.title);
            }
        }
    }

    Ok(())
}
