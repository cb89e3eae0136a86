//! librisd — the libris HTTP server.
//!
//! Single endpoint plus liveness:
//! - `POST /chat` — `{ message, top_k? }` → `{ assistant, recommendation, summary }`
//! - `GET  /health` — server status
//!
//! One recommender is shared across requests; it holds only read-only state
//! (summary store, gate word list, client handles), so concurrent requests
//! need no locking. Each request's protocol run is synchronous and executes
//! on the blocking pool.
//!
//! Build and run: `cargo run --features server --bin librisd`

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use libris::chat::OpenAiChat;
use libris::chroma::ChromaStore;
use libris::config::LibrisConfig;
use libris::corpus::load_corpus;
use libris::embedding::OpenAiEmbedder;
use libris::index::VectorIndex;
use libris::moderation::ModerationGate;
use libris::recommend::{Recommendation, Recommender};
use libris::summaries::SummaryStore;

struct ServerState {
    recommender: Arc<Recommender>,
    default_top_k: usize,
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    top_k: Option<usize>,
}

#[derive(Serialize)]
struct ChatResponse {
    assistant: String,
    recommendation: Option<String>,
    summary: Option<String>,
}

impl From<Recommendation> for ChatResponse {
    fn from(r: Recommendation) -> Self {
        Self {
            assistant: r.assistant,
            recommendation: r.recommendation,
            summary: r.summary,
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn chat(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let top_k = request.top_k.unwrap_or(state.default_top_k);
    if top_k == 0 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "top_k must be a positive integer".to_string(),
        ));
    }

    let recommender = Arc::clone(&state.recommender);
    let result = tokio::task::spawn_blocking(move || recommender.recommend(&request.message, top_k))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("request task failed: {e}"),
            )
        })?;

    match result {
        Ok(recommendation) => Ok(Json(recommendation.into())),
        Err(e) => {
            tracing::error!("recommendation failed: {e}");
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = LibrisConfig::from_env().unwrap_or_else(|e| {
        tracing::error!("configuration error: {e}");
        std::process::exit(1);
    });

    let books = load_corpus(&config.corpus_path).unwrap_or_else(|e| {
        tracing::error!("corpus error: {e}");
        std::process::exit(1);
    });
    tracing::info!(books = books.len(), "corpus loaded");

    let recommender = Arc::new(Recommender::new(
        ModerationGate::new(),
        VectorIndex::new(
            Arc::new(OpenAiEmbedder::new(&config)),
            Arc::new(ChromaStore::new(&config)),
        ),
        SummaryStore::from_books(&books),
        Arc::new(OpenAiChat::new(&config)),
    ));

    let state = Arc::new(ServerState {
        recommender,
        default_top_k: config.default_top_k,
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let bind = std::env::var("LIBRIS_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("LIBRIS_PORT").unwrap_or_else(|_| "8100".to_string());
    let addr = format!("{bind}:{port}");

    tracing::info!("librisd listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        tracing::error!("failed to bind {addr}: {e}");
        std::process::exit(1);
    });
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
