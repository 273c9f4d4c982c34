// src/analyze/rubric.rs
//! Rubric aggregator: runs every scorer in its own task, then reassembles the outputs in the
//! canonical rubric order. Completion order never matters.
//!
//! Failure handling per scorer (error, timeout or panic):
//! - `FailurePolicy::Fallback(v)` → `v` is used, logged and counted
//! - `FailurePolicy::Propagate`   → the request fails with `ScoreError::Scorer`
//!
//! All tasks are awaited before any failure is resolved, so one scorer never cancels another.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::ai_adapter::LabelServices;
use super::heuristics::{
    Bias, EmotionalLanguage, ExtremeStatements, LanguageStyle, Objectivity, SentenceComplexity,
    TopicConsistency,
};
use super::model_scorers::{AuthorCredibility, BalancedCoverage, FactualAccuracy};
use super::readability::Readability;
use super::{Article, FailurePolicy, ScoreValue, Scorer, ScorerError};
use crate::config::ScoringConfig;
use crate::error::ScoreError;
use crate::sentiment::SentimentAnalyzer;

/// Ordered scorer name → value mapping for one article.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RubricMapping {
    entries: Vec<(&'static str, ScoreValue)>,
}

impl RubricMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; insertion order is display order.
    pub fn push(&mut self, name: &'static str, value: ScoreValue) {
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<ScoreValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ScoreValue)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Arithmetic mean of all values; 0 for an empty rubric.
    pub fn average(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.entries.iter().map(|(_, v)| v.get()).sum();
        sum / self.entries.len() as f64
    }
}

impl FromIterator<(&'static str, ScoreValue)> for RubricMapping {
    fn from_iter<I: IntoIterator<Item = (&'static str, ScoreValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The fixed, ordered set of scorers.
pub struct Rubric {
    scorers: Vec<Arc<dyn Scorer>>,
    scorer_timeout: Duration,
}

impl Rubric {
    pub fn new(scorers: Vec<Arc<dyn Scorer>>, scorer_timeout: Duration) -> Self {
        Self {
            scorers,
            scorer_timeout,
        }
    }

    /// The standard eleven-entry rubric.
    pub fn standard(cfg: &ScoringConfig, services: &LabelServices) -> Self {
        let scorers: Vec<Arc<dyn Scorer>> = vec![
            Arc::new(EmotionalLanguage::new(SentimentAnalyzer::new())),
            Arc::new(Objectivity),
            Arc::new(Bias),
            Arc::new(ExtremeStatements),
            Arc::new(Readability),
            Arc::new(TopicConsistency),
            Arc::new(SentenceComplexity {
                min_len: cfg.sentence_min_len,
                max_len: cfg.sentence_max_len,
            }),
            Arc::new(FactualAccuracy::new(services.zero_shot.clone())),
            Arc::new(AuthorCredibility::new(services.ner.clone())),
            Arc::new(LanguageStyle),
            Arc::new(BalancedCoverage::new(services.zero_shot.clone())),
        ];
        Self::new(scorers, Duration::from_millis(cfg.scorer_timeout_ms))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.scorers.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    /// Score `text` with every scorer concurrently.
    pub async fn evaluate(&self, text: &str) -> Result<RubricMapping, ScoreError> {
        let article = Arc::new(Article::new(text));
        let limit = self.scorer_timeout;

        let handles: Vec<_> = self
            .scorers
            .iter()
            .map(|scorer| {
                let scorer = Arc::clone(scorer);
                let article = Arc::clone(&article);
                tokio::spawn(async move {
                    match timeout(limit, scorer.score(&article)).await {
                        Ok(res) => res,
                        Err(_) => Err(ScorerError::Timeout(limit)),
                    }
                })
            })
            .collect();

        // Handles are awaited in canonical order; the tasks themselves already run in parallel.
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let outcome = match handle.await {
                Ok(res) => res,
                Err(join) => Err(ScorerError::Panicked(join.to_string())),
            };
            outcomes.push(outcome);
        }

        let mut mapping = RubricMapping::new();
        for (scorer, outcome) in self.scorers.iter().zip(outcomes) {
            let value = match outcome {
                Ok(v) => v,
                Err(e) => resolve_failure(scorer.as_ref(), e)?,
            };
            mapping.push(scorer.name(), value);
        }
        Ok(mapping)
    }
}

fn resolve_failure(scorer: &dyn Scorer, err: ScorerError) -> Result<ScoreValue, ScoreError> {
    match scorer.failure_policy() {
        FailurePolicy::Fallback(v) => {
            // Unavailable services are announced once at startup
            if matches!(err, ScorerError::Unavailable(_)) {
                debug!(scorer = scorer.name(), error = %err, fallback = v.get(), "scorer fell back");
            } else {
                warn!(scorer = scorer.name(), error = %err, fallback = v.get(), "scorer fell back");
            }
            counter!("scorer_fallbacks_total", "scorer" => scorer.name()).increment(1);
            Ok(v)
        }
        FailurePolicy::Propagate => Err(ScoreError::Scorer {
            name: scorer.name(),
            source: err,
        }),
    }
}
