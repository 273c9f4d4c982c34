// src/ai_bootstrap.rs
//! Process-wide model runtime: makes sure the classifier artifacts are on disk, loads them
//! once, and builds the (lazy) label services. Everything here is read-only after startup.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::analyze::ai_adapter::LabelServices;
use crate::analyze::model_scorers::{AUTHOR_CREDIBILITY, BALANCED_COVERAGE, FACTUAL_ACCURACY};
use crate::classifier::{CompositeClassifier, ForestClassifier, ModelError};
use crate::config::{AppConfig, ModelsConfig};

/// On-disk locations of the two classifier artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
}

impl ArtifactPaths {
    pub fn from_config(cfg: &ModelsConfig) -> Self {
        Self {
            vectorizer: cfg.vectorizer_path(),
            classifier: cfg.classifier_path(),
        }
    }

    /// (vectorizer present, classifier present)
    pub fn presence(&self) -> (bool, bool) {
        (is_present(&self.vectorizer), is_present(&self.classifier))
    }
}

fn is_present(p: &Path) -> bool {
    fs::metadata(p).map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
}

pub struct ModelRuntime {
    pub classifier: Arc<dyn CompositeClassifier>,
    pub services: LabelServices,
    pub artifacts: ArtifactPaths,
}

impl ModelRuntime {
    /// Download missing artifacts (when URLs are configured) and load the classifier.
    /// Any failure here is fatal for the service.
    pub async fn bootstrap(cfg: &AppConfig) -> Result<Self, ModelError> {
        let artifacts = ArtifactPaths::from_config(&cfg.models);

        if let Some(url) = cfg.models.vectorizer_url.as_deref() {
            ensure_artifact(url, &artifacts.vectorizer).await?;
        }
        if let Some(url) = cfg.models.classifier_url.as_deref() {
            ensure_artifact(url, &artifacts.classifier).await?;
        }

        let vectorizer_path = artifacts.vectorizer.clone();
        let classifier_path = artifacts.classifier.clone();
        let classifier = tokio::task::spawn_blocking(move || {
            ForestClassifier::load(&vectorizer_path, &classifier_path)
        })
        .await
        .map_err(|e| ModelError::Corrupt {
            path: artifacts.classifier.clone(),
            reason: format!("loader task failed: {e}"),
        })??;

        let services = LabelServices::from_config(&cfg.inference);
        info!(
            provider = %cfg.inference.provider,
            zero_shot = services.zero_shot.provider_name(),
            ner = services.ner.provider_name(),
            "model runtime ready"
        );
        if services.is_disabled() {
            warn!(
                scorers = ?[FACTUAL_ACCURACY, AUTHOR_CREDIBILITY, BALANCED_COVERAGE],
                fallback = 0.5,
                "label inference disabled; model-backed scorers run degraded \
                 (set inference.provider to enable)"
            );
        }

        Ok(Self {
            classifier: Arc::new(classifier),
            services,
            artifacts,
        })
    }
}

/// Download `url` to `path` unless a non-empty file already exists there.
pub async fn ensure_artifact(url: &str, path: &Path) -> Result<(), ModelError> {
    if is_present(path) {
        return Ok(());
    }
    warn!(path = %path.display(), "model artifact missing; downloading");

    let download_err = |reason: String| ModelError::Download {
        url: url.to_string(),
        reason,
    };
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| download_err(e.to_string()))?;
    let resp = http
        .get(url)
        .send()
        .await
        .map_err(|e| download_err(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(download_err(format!("status {}", resp.status())));
    }
    let bytes = resp.bytes().await.map_err(|e| download_err(e.to_string()))?;

    let io_err = |source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let tmp = path.with_extension("download.tmp");
    fs::write(&tmp, &bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    info!(path = %path.display(), bytes = bytes.len(), "model artifact downloaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn existing_artifact_is_not_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("bow.json");
        fs::write(&p, "{}").unwrap();
        // Unroutable URL: would fail if a download were attempted.
        ensure_artifact("http://127.0.0.1:9/never", &p).await.unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "{}");
    }

    #[test]
    fn presence_requires_non_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ModelsConfig {
            dir: dir.path().to_path_buf(),
            ..ModelsConfig::default()
        };
        let paths = ArtifactPaths::from_config(&cfg);
        assert_eq!(paths.presence(), (false, false));

        fs::write(&paths.vectorizer, "").unwrap();
        fs::write(&paths.classifier, "{}").unwrap();
        assert_eq!(paths.presence(), (false, true));
    }

    #[tokio::test]
    async fn bootstrap_fails_without_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = AppConfig::default();
        cfg.models.dir = dir.path().to_path_buf();
        let err = ModelRuntime::bootstrap(&cfg).await.err().unwrap();
        assert!(matches!(err, ModelError::Missing(_)));
    }
}
