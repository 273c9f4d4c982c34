// src/api.rs
//! HTTP surface: `POST /score`, health at `/` and `/health`.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, histogram};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::ai_bootstrap::{ArtifactPaths, ModelRuntime};
use crate::analyze::report::ScoreResponse;
use crate::analyze::{CredibilityEngine, Rubric};
use crate::config::ScoringConfig;
use crate::error::ScoreError;
use crate::ingest::ArticleSource;

const MAX_URL_LEN: usize = 2048;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CredibilityEngine>,
    pub source: Arc<dyn ArticleSource>,
    pub artifacts: ArtifactPaths,
    pub min_text_len: usize,
}

impl AppState {
    /// Wire the standard rubric over a bootstrapped model runtime.
    pub fn new(cfg: &ScoringConfig, runtime: ModelRuntime, source: Arc<dyn ArticleSource>) -> Self {
        let rubric = Rubric::standard(cfg, &runtime.services);
        Self {
            engine: Arc::new(CredibilityEngine::new(rubric, runtime.classifier)),
            source,
            artifacts: runtime.artifacts,
            min_text_len: cfg.min_text_len,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/score", post(score))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub bow: bool,
    pub rf: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (bow, rf) = state.artifacts.presence();
    Json(HealthResponse {
        status: "ok",
        bow,
        rf,
    })
}

async fn score(
    State(state): State<AppState>,
    body: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, ScoreError> {
    let t0 = Instant::now();
    let result = run_score(&state, body).await;

    let ms = t0.elapsed().as_millis() as u64;
    histogram!("score_duration_ms").record(ms as f64);
    match &result {
        Ok(resp) => {
            counter!("score_requests_total", "outcome" => "ok").increment(1);
            info!(
                target: "score",
                id = %anon_hash(&resp.url),
                total = resp.total,
                verdict = ?resp.classification,
                ms,
                "article scored"
            );
        }
        Err(e) => {
            counter!("score_requests_total", "outcome" => e.kind()).increment(1);
            warn!(target: "score", kind = e.kind(), error = %e, ms, "score request failed");
        }
    }
    result.map(Json)
}

async fn run_score(
    state: &AppState,
    body: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<ScoreResponse, ScoreError> {
    let Json(req) = body.map_err(|e| ScoreError::InvalidInput(e.body_text()))?;
    let url = validate_url(&req.url)?;

    let article = state.source.fetch(&url).await?;
    let len = article.text.chars().count();
    if len < state.min_text_len {
        return Err(ScoreError::ContentTooShort {
            len,
            min: state.min_text_len,
        });
    }

    state.engine.assess(&url, article.title, &article.text).await
}

/// Accept only absolute http(s) URLs with a host. Returns the trimmed input unchanged.
pub fn validate_url(raw: &str) -> Result<String, ScoreError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ScoreError::InvalidInput("missing url".into()));
    }
    if s.chars().count() > MAX_URL_LEN {
        return Err(ScoreError::InvalidInput("url too long".into()));
    }
    let parsed = Url::parse(s).map_err(|e| ScoreError::InvalidInput(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScoreError::InvalidInput(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ScoreError::InvalidInput("url has no host".into()));
    }
    Ok(s.to_string())
}

/// Short, stable id for logs. Never log raw URLs.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
