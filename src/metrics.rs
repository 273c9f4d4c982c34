use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

// The recorder is process-global; tests build the app many times.
static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process) and describe the service series.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE.get_or_try_init(|| {
            // Default buckets; avoids API drift across exporter versions.
            let handle = PrometheusBuilder::new().install_recorder()?;

            describe_counter!("score_requests_total", "Scoring requests by outcome");
            describe_histogram!("score_duration_ms", "End-to-end /score latency in milliseconds");
            describe_counter!(
                "scorer_fallbacks_total",
                "Scorer failures replaced by the scorer's fallback value"
            );
            describe_histogram!(
                "classifier_probability",
                "Class-1 probability returned by the composite classifier"
            );
            Ok::<_, anyhow::Error>(handle)
        })?;

        Ok(Self {
            handle: handle.clone(),
        })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
