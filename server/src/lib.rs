use anyhow::{bail, Result};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sift_core::config::DEFAULT_TOP_K;
use sift_core::corpus::{scan, CorpusConfig, ScanSummary};
use sift_core::{Bm25Params, Document, Engine, Hit, IndexMode, IndexStats};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Upper bound on `k` for a single request.
pub const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_TOP_K }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_docs: usize,
    pub results: Vec<Hit>,
}

pub struct ServerConfig {
    pub corpus: CorpusConfig,
    pub params: Bm25Params,
    /// Required in `X-ADMIN-TOKEN` for admin endpoints; they are disabled when unset.
    pub admin_token: Option<String>,
    /// Comma-separated list of allowed origins; any origin when unset.
    pub cors_allow_origin: Option<String>,
}

impl ServerConfig {
    /// Reads `ADMIN_TOKEN` and `CORS_ALLOW_ORIGIN` from the environment.
    pub fn from_env(corpus: CorpusConfig) -> Self {
        Self {
            corpus,
            params: Bm25Params::default(),
            admin_token: std::env::var("ADMIN_TOKEN").ok(),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub corpus: Arc<CorpusConfig>,
    pub admin_token: Option<String>,
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    if !config.corpus.root.is_dir() {
        bail!("{} is not a directory", config.corpus.root.display());
    }
    // Initial load indexes every file, later rescans only pick up new names.
    let engine = Engine::with_params(config.params);
    let summary = scan(&engine, &config.corpus, IndexMode::Append);
    tracing::info!(indexed = summary.indexed, failed = summary.failed, "initial corpus loaded");

    let app_state = AppState {
        engine: Arc::new(engine),
        corpus: Arc::new(config.corpus),
        admin_token: config.admin_token,
    };

    let cors = match config.cors_allow_origin {
        Some(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/index/rescan", post(rescan_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = Instant::now();
    let k = params.k.clamp(1, MAX_K);
    let (results, total_docs) = state.engine.search_with_total(&params.q, k).map_err(|err| {
        tracing::error!(error = %err, query = %params.q, "search failed");
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    })?;
    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_docs, results }))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.engine.stats())
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<u32>,
) -> Result<Json<Document>, (StatusCode, Json<serde_json::Value>)> {
    state
        .engine
        .document(doc_id)
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" }))))
}

async fn rescan_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ScanSummary>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let (engine, corpus) = (Arc::clone(&state.engine), Arc::clone(&state.corpus));
    let summary = tokio::task::spawn_blocking(move || scan(&engine, &corpus, IndexMode::Incremental))
        .await
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    Ok(Json(summary))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
