//! Article Credibility Scorer: Binary Entrypoint
//! Boots the Axum HTTP server: config, model artifacts, routes and metrics.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing logs; `RUST_LOG` overrides the default filter.
fn enable_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("credibility_scorer=info,warn"));

    // Shuttle may have installed a subscriber already.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Picks up SCORER_CONFIG_PATH, MODEL_CACHE, BOW_URL, RF_URL, HF_API_TOKEN.
    let _ = dotenvy::dotenv();

    enable_tracing();

    // Missing or corrupt classifier artifacts are fatal.
    let router = credibility_scorer::app().await?;

    Ok(router.into())
}
