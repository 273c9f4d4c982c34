// tests/common/mod.rs
// Shared stubs for the integration tests: article source, classifier and label services.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use credibility_scorer::ai_adapter::{
    Entity, EntityKind, EntityRecognizer, LabelScore, LabelServices, ZeroShotClassifier,
};
use credibility_scorer::ai_bootstrap::ArtifactPaths;
use credibility_scorer::analyze::{CredibilityEngine, Rubric, ScorerError};
use credibility_scorer::classifier::CompositeClassifier;
use credibility_scorer::config::ScoringConfig;
use credibility_scorer::ingest::{ArticleSource, FetchError, FetchedArticle};
use credibility_scorer::AppState;

/// 161 characters, no absolutist/extreme keywords, no contractions.
pub const BASELINE_TEXT: &str = "The council published the annual report on science funding. \
The report lists health programs and business grants. \
Officials reviewed the science budget in March.";

pub const BASELINE_URL: &str = "https://news.example.com/council-report";

pub const BODY_LIMIT: usize = 1024 * 1024;

pub struct FixedClassifier(pub f64);

impl CompositeClassifier for FixedClassifier {
    fn predict_probability(&self, _text: &str) -> f64 {
        self.0
    }
}

/// fact 0.8 / opinion 0.2, balanced 0.7 / biased 0.3.
pub struct StubZeroShot;

#[async_trait]
impl ZeroShotClassifier for StubZeroShot {
    async fn classify(
        &self,
        _text: &str,
        candidate_labels: &[&str],
        _hypothesis_template: Option<&str>,
    ) -> Result<Vec<LabelScore>, ScorerError> {
        let table = [("fact", 0.8), ("opinion", 0.2), ("balanced", 0.7), ("biased", 0.3)];
        Ok(table
            .iter()
            .filter(|(l, _)| candidate_labels.contains(l))
            .map(|(l, s)| LabelScore {
                label: l.to_string(),
                score: *s,
            })
            .collect())
    }
    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

/// Two people and one organisation.
pub struct StubNer;

#[async_trait]
impl EntityRecognizer for StubNer {
    async fn extract_entities(&self, _text: &str) -> Result<Vec<Entity>, ScorerError> {
        Ok(vec![
            Entity {
                text: "Jane Doe".into(),
                kind: EntityKind::Person,
            },
            Entity {
                text: "John Roe".into(),
                kind: EntityKind::Person,
            },
            Entity {
                text: "City Council".into(),
                kind: EntityKind::Organization,
            },
        ])
    }
    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

pub fn stub_services() -> LabelServices {
    LabelServices::new(Arc::new(StubZeroShot), Arc::new(StubNer))
}

/// Serves canned pages by URL; unknown URLs answer 404.
#[derive(Default)]
pub struct StubSource {
    pages: HashMap<String, FetchedArticle>,
}

impl StubSource {
    pub fn with_page(mut self, url: &str, text: &str, title: Option<&str>) -> Self {
        self.pages.insert(
            url.to_string(),
            FetchedArticle {
                text: text.to_string(),
                title: title.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl ArticleSource for StubSource {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle, FetchError> {
        self.pages.get(url).cloned().ok_or(FetchError::Status(404))
    }
    fn name(&self) -> &'static str {
        "stub"
    }
}

pub fn engine(services: &LabelServices, probability: f64) -> CredibilityEngine {
    let rubric = Rubric::standard(&ScoringConfig::default(), services);
    CredibilityEngine::new(rubric, Arc::new(FixedClassifier(probability)))
}

pub fn state_with(source: StubSource, artifacts_dir: PathBuf) -> AppState {
    AppState {
        engine: Arc::new(engine(&stub_services(), 0.5)),
        source: Arc::new(source),
        artifacts: ArtifactPaths {
            vectorizer: artifacts_dir.join("bow_vectorizer.json"),
            classifier: artifacts_dir.join("random_forest_model.json"),
        },
        min_text_len: 100,
    }
}
