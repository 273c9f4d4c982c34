// src/classifier/mod.rs
//! Composite probability source: a bag-of-words vectorizer feeding a random forest.
//!
//! Both artifacts are JSON exports loaded once at startup. Loading validates shapes and tree
//! wiring, so prediction itself cannot fail.

pub mod forest;
pub mod vectorizer;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub use forest::RandomForest;
pub use vectorizer::{BagOfWords, SparseCounts};

/// Class-1 ("credible") probability for a raw article text.
pub trait CompositeClassifier: Send + Sync {
    fn predict_probability(&self, text: &str) -> f64;
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact missing: {0}")]
    Missing(PathBuf),
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt model artifact {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("downloading {url}: {reason}")]
    Download { url: String, reason: String },
}

/// Vectorizer + forest pair.
#[derive(Debug)]
pub struct ForestClassifier {
    vectorizer: BagOfWords,
    forest: RandomForest,
}

impl ForestClassifier {
    pub fn new(vectorizer: BagOfWords, forest: RandomForest) -> Result<Self, String> {
        if vectorizer.n_features() > forest.n_features() {
            return Err(format!(
                "vectorizer has {} features but the forest expects {}",
                vectorizer.n_features(),
                forest.n_features()
            ));
        }
        Ok(Self { vectorizer, forest })
    }

    /// Load both artifacts; any missing or malformed file is an error.
    pub fn load(vectorizer_path: &Path, forest_path: &Path) -> Result<Self, ModelError> {
        let vectorizer: BagOfWords = read_artifact(vectorizer_path)?;
        let vectorizer = vectorizer.compile().map_err(|reason| ModelError::Corrupt {
            path: vectorizer_path.to_path_buf(),
            reason,
        })?;

        let forest: RandomForest = read_artifact(forest_path)?;
        forest.validate().map_err(|reason| ModelError::Corrupt {
            path: forest_path.to_path_buf(),
            reason,
        })?;

        let clf = Self::new(vectorizer, forest).map_err(|reason| ModelError::Corrupt {
            path: forest_path.to_path_buf(),
            reason,
        })?;
        info!(
            vocabulary = clf.vectorizer.n_features(),
            trees = clf.forest.n_trees(),
            "composite classifier loaded"
        );
        Ok(clf)
    }
}

impl CompositeClassifier for ForestClassifier {
    fn predict_probability(&self, text: &str) -> f64 {
        let counts = self.vectorizer.transform(text);
        self.forest.positive_probability(&counts)
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    if !path.exists() {
        return Err(ModelError::Missing(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ModelError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
