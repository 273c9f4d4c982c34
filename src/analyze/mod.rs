// src/analyze/mod.rs
//! Analysis pipeline entry: independent scorers, rubric aggregation, fusion with the
//! composite classifier and assembly of the public response.
//!
//! Order of one scoring request:
//! 1) `Article::new` derives the processed token stream once
//! 2) `Rubric::evaluate` runs every scorer in its own task and reassembles the canonical order
//! 3) the composite classifier produces its class-1 probability on the raw text
//! 4) `scoring::fuse` blends both (70/30) into a score and verdict
//! 5) `report::assemble` builds the `ScoreResponse`

pub mod ai_adapter;
pub mod heuristics;
pub mod model_scorers;
pub mod readability;
pub mod report;
pub mod rubric;
pub mod scoring;

use async_trait::async_trait;
use metrics::histogram;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::classifier::CompositeClassifier;
use crate::error::ScoreError;
use crate::normalize::{preprocess, ProcessedTokens};

// Re-export convenient types.
pub use crate::analyze::report::{assemble, slugify, ScoreCategory, ScoreResponse};
pub use crate::analyze::rubric::{Rubric, RubricMapping};
pub use crate::analyze::scoring::{fuse, FusionResult};

/// A scorer output, always within [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreValue(f64);

impl ScoreValue {
    pub const ZERO: ScoreValue = ScoreValue(0.0);
    pub const NEUTRAL: ScoreValue = ScoreValue(0.5);
    pub const ONE: ScoreValue = ScoreValue(1.0);

    /// Clamp `raw` into [0, 1]. NaN maps to 0.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::ZERO;
        }
        Self(raw.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<ScoreValue> for f64 {
    fn from(v: ScoreValue) -> Self {
        v.0
    }
}

/// Why a single scorer could not produce a value.
#[derive(Debug, Clone, Error)]
pub enum ScorerError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("scorer task panicked: {0}")]
    Panicked(String),
    #[error("computation failed: {0}")]
    Computation(String),
}

/// What the aggregator does with a scorer error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailurePolicy {
    /// Fail the whole request with `ScoreError::Scorer`.
    Propagate,
    /// Substitute this value and log the failure.
    Fallback(ScoreValue),
}

/// Request-scoped scorer input: raw text plus the processed token stream.
#[derive(Debug, Clone)]
pub struct Article {
    pub raw: String,
    pub processed: ProcessedTokens,
}

impl Article {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let processed = preprocess(&raw);
        Self { raw, processed }
    }
}

/// One rubric entry: maps an article to a `ScoreValue`.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Rubric key, also the display label.
    fn name(&self) -> &'static str;

    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError>;

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Propagate
    }
}

/// Rubric + composite classifier: everything needed to score one article text.
pub struct CredibilityEngine {
    rubric: Rubric,
    classifier: Arc<dyn CompositeClassifier>,
}

impl CredibilityEngine {
    pub fn new(rubric: Rubric, classifier: Arc<dyn CompositeClassifier>) -> Self {
        Self { rubric, classifier }
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Run the rubric and the classifier on `text` and fuse the results.
    pub async fn evaluate(&self, text: &str) -> Result<(RubricMapping, FusionResult), ScoreError> {
        let mapping = self.rubric.evaluate(text).await?;
        let probability = self.classifier.predict_probability(text);
        histogram!("classifier_probability").record(probability);
        let fusion = fuse(&mapping, probability);
        Ok((mapping, fusion))
    }

    /// Full pipeline for one fetched article.
    pub async fn assess(
        &self,
        url: &str,
        title: Option<String>,
        text: &str,
    ) -> Result<ScoreResponse, ScoreError> {
        let (mapping, fusion) = self.evaluate(text).await?;
        Ok(assemble(url, title, &mapping, &fusion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_value_clamps_and_rejects_nan() {
        assert_eq!(ScoreValue::new(1.7).get(), 1.0);
        assert_eq!(ScoreValue::new(-0.2).get(), 0.0);
        assert_eq!(ScoreValue::new(f64::NAN).get(), 0.0);
        assert_eq!(ScoreValue::new(0.25).get(), 0.25);
    }

    #[test]
    fn article_derives_processed_tokens_once() {
        let a = Article::new("The Mayor spoke briefly.");
        let toks: Vec<&str> = a.processed.iter().collect();
        assert_eq!(toks, vec!["mayor", "spoke", "briefly"]);
    }
}
