// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod ai_bootstrap;
pub mod analyze;
pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod normalize;
pub mod sentiment;

// ---- Re-exports for stable public API ----
pub use analyze::ai_adapter;
pub use crate::analyze::{CredibilityEngine, ScoreResponse, ScoreValue};
pub use crate::api::{router, AppState};
pub use crate::error::ScoreError;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tracing::info;

use crate::ai_bootstrap::ModelRuntime;
use crate::config::AppConfig;
use crate::ingest::HttpArticleSource;

/// Build the full service router (`/score`, health, `/metrics`) from the default config.
/// Fails when the classifier artifacts cannot be obtained.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = AppConfig::load_default().context("loading scorer config")?;
    app_with_config(&cfg).await
}

pub async fn app_with_config(cfg: &AppConfig) -> anyhow::Result<Router> {
    let metrics = metrics::Metrics::init().context("installing metrics recorder")?;
    let runtime = ModelRuntime::bootstrap(cfg)
        .await
        .context("bootstrapping model runtime")?;
    let source = HttpArticleSource::new(&cfg.fetch).context("building article fetcher")?;

    let state = AppState::new(&cfg.scoring, runtime, Arc::new(source));
    info!(
        scorers = state.engine.rubric().len(),
        min_text_len = state.min_text_len,
        "credibility scorer ready"
    );
    Ok(router(state).merge(metrics.router()))
}
