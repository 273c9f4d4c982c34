// src/analyze/model_scorers.rs
//! Scorers backed by external label services. A failed call falls back to a neutral 0.5
//! (declared through `failure_policy`); the aggregator applies it.

use async_trait::async_trait;

use super::ai_adapter::{DynEntityRecognizer, DynZeroShot, EntityKind, LabelScore};
use super::{Article, FailurePolicy, ScoreValue, Scorer, ScorerError};

pub const FACTUAL_ACCURACY: &str = "Factual Accuracy";
pub const AUTHOR_CREDIBILITY: &str = "Author Credibility";
pub const BALANCED_COVERAGE: &str = "Balanced Coverage";

const FACTUAL_LABELS: [&str; 2] = ["fact", "opinion"];
const COVERAGE_LABELS: [&str; 2] = ["balanced", "biased"];
const COVERAGE_TEMPLATE: &str = "This article is {}.";

/// Named people at which author credibility saturates.
const PERSON_SATURATION: f64 = 3.0;

/// Probability assigned to `wanted` (case-insensitive); 0.5 if the label is absent.
pub fn label_probability(scores: &[LabelScore], wanted: &str) -> ScoreValue {
    scores
        .iter()
        .find(|s| s.label.eq_ignore_ascii_case(wanted))
        .map(|s| ScoreValue::new(s.score))
        .unwrap_or(ScoreValue::NEUTRAL)
}

/// `min(persons / 3, 1)`.
pub fn author_credibility(person_count: usize) -> ScoreValue {
    ScoreValue::new((person_count as f64 / PERSON_SATURATION).min(1.0))
}

pub struct FactualAccuracy {
    classifier: DynZeroShot,
}

impl FactualAccuracy {
    pub fn new(classifier: DynZeroShot) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Scorer for FactualAccuracy {
    fn name(&self) -> &'static str {
        FACTUAL_ACCURACY
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        let scores = self
            .classifier
            .classify(&article.raw, &FACTUAL_LABELS, None)
            .await?;
        Ok(label_probability(&scores, "fact"))
    }
    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Fallback(ScoreValue::NEUTRAL)
    }
}

pub struct BalancedCoverage {
    classifier: DynZeroShot,
}

impl BalancedCoverage {
    pub fn new(classifier: DynZeroShot) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Scorer for BalancedCoverage {
    fn name(&self) -> &'static str {
        BALANCED_COVERAGE
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        let scores = self
            .classifier
            .classify(&article.raw, &COVERAGE_LABELS, Some(COVERAGE_TEMPLATE))
            .await?;
        Ok(label_probability(&scores, "balanced"))
    }
    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Fallback(ScoreValue::NEUTRAL)
    }
}

pub struct AuthorCredibility {
    ner: DynEntityRecognizer,
}

impl AuthorCredibility {
    pub fn new(ner: DynEntityRecognizer) -> Self {
        Self { ner }
    }
}

#[async_trait]
impl Scorer for AuthorCredibility {
    fn name(&self) -> &'static str {
        AUTHOR_CREDIBILITY
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        let entities = self.ner.extract_entities(&article.raw).await?;
        let people = entities
            .iter()
            .filter(|e| e.kind == EntityKind::Person)
            .count();
        Ok(author_credibility(people))
    }
    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Fallback(ScoreValue::NEUTRAL)
    }
}
