//! External label-scoring services: zero-shot classification and named-entity recognition.
//!
//! The scorers only see the `ZeroShotClassifier` / `EntityRecognizer` traits. Production
//! wiring talks to the Hugging Face inference API; each remote endpoint sits behind a
//! `LazyHandle`, so its HTTP client is built on first use and then shared for the life of
//! the process.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ScorerError;
use crate::config::InferenceConfig;

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

/// One candidate label and the probability the service assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Person,
    Organization,
    Location,
    Misc,
    Other(String),
}

impl EntityKind {
    /// Parse CoNLL-style tags ("PER", "B-PER", "PERSON", "ORG", ...).
    pub fn from_tag(tag: &str) -> Self {
        let t = tag
            .trim()
            .trim_start_matches("B-")
            .trim_start_matches("I-")
            .to_ascii_uppercase();
        match t.as_str() {
            "PER" | "PERSON" => EntityKind::Person,
            "ORG" | "ORGANIZATION" => EntityKind::Organization,
            "LOC" | "LOCATION" | "GPE" => EntityKind::Location,
            "MISC" => EntityKind::Misc,
            _ => EntityKind::Other(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub text: String,
    pub kind: EntityKind,
}

#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Score `text` against `candidate_labels`; returns (label, score) pairs, best first.
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
        hypothesis_template: Option<&str>,
    ) -> Result<Vec<LabelScore>, ScorerError>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, ScorerError>;
    fn provider_name(&self) -> &'static str;
}

pub type DynZeroShot = Arc<dyn ZeroShotClassifier>;
pub type DynEntityRecognizer = Arc<dyn EntityRecognizer>;

/// The pair of external services the model-backed scorers depend on.
#[derive(Clone)]
pub struct LabelServices {
    pub zero_shot: DynZeroShot,
    pub ner: DynEntityRecognizer,
}

impl LabelServices {
    pub fn new(zero_shot: DynZeroShot, ner: DynEntityRecognizer) -> Self {
        Self { zero_shot, ner }
    }

    /// Both services report `Unavailable`; model-backed scorers fall back to 0.5.
    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledServices), Arc::new(DisabledServices))
    }

    /// True when neither service can ever answer.
    pub fn is_disabled(&self) -> bool {
        self.zero_shot.provider_name() == DISABLED && self.ner.provider_name() == DISABLED
    }

    /// Factory: build services according to config and environment variables.
    ///
    /// * If `INFERENCE_TEST_MODE=mock`, returns deterministic mock services.
    /// * Else `provider` selects "huggingface", "mock" or (anything else) disabled.
    pub fn from_config(cfg: &InferenceConfig) -> Self {
        let mock_env = std::env::var("INFERENCE_TEST_MODE")
            .map(|v| v == "mock")
            .unwrap_or(false);
        if mock_env {
            return Self::new(Arc::new(MockServices), Arc::new(MockServices));
        }

        match cfg.provider.as_str() {
            "huggingface" => {
                let zs_cfg = cfg.clone();
                let zero_shot = LazyHandle::new("huggingface", move || {
                    HfEndpoint::build(&zs_cfg, &zs_cfg.zero_shot_model).map(HfZeroShot)
                });
                let ner_cfg = cfg.clone();
                let ner = LazyHandle::new("huggingface", move || {
                    HfEndpoint::build(&ner_cfg, &ner_cfg.ner_model).map(HfNer)
                });
                info!(
                    zero_shot_model = %cfg.zero_shot_model,
                    ner_model = %cfg.ner_model,
                    "label services: huggingface (lazy)"
                );
                Self::new(Arc::new(zero_shot), Arc::new(ner))
            }
            "mock" => Self::new(Arc::new(MockServices), Arc::new(MockServices)),
            _ => Self::disabled(),
        }
    }
}

// ------------------------------------------------------------
// Lazily-initialized holder
// ------------------------------------------------------------

type InitFn<T> = Box<dyn Fn() -> Result<T, ScorerError> + Send + Sync>;

/// Builds its inner service on first use and caches it. A failed build is not cached,
/// so the next call retries.
pub struct LazyHandle<T> {
    provider: &'static str,
    cell: OnceCell<Arc<T>>,
    init: InitFn<T>,
}

impl<T> LazyHandle<T> {
    pub fn new<F>(provider: &'static str, init: F) -> Self
    where
        F: Fn() -> Result<T, ScorerError> + Send + Sync + 'static,
    {
        Self {
            provider,
            cell: OnceCell::new(),
            init: Box::new(init),
        }
    }

    pub fn get(&self) -> Result<Arc<T>, ScorerError> {
        self.cell
            .get_or_try_init(|| {
                debug!(provider = self.provider, "initializing label service handle");
                (self.init)().map(Arc::new)
            })
            .cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[async_trait]
impl<T: ZeroShotClassifier + 'static> ZeroShotClassifier for LazyHandle<T> {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
        hypothesis_template: Option<&str>,
    ) -> Result<Vec<LabelScore>, ScorerError> {
        let inner = self.get()?;
        inner
            .classify(text, candidate_labels, hypothesis_template)
            .await
    }
    fn provider_name(&self) -> &'static str {
        self.provider
    }
}

#[async_trait]
impl<T: EntityRecognizer + 'static> EntityRecognizer for LazyHandle<T> {
    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, ScorerError> {
        let inner = self.get()?;
        inner.extract_entities(text).await
    }
    fn provider_name(&self) -> &'static str {
        self.provider
    }
}

// ------------------------------------------------------------
// Hugging Face inference API
// ------------------------------------------------------------

struct HfEndpoint {
    http: reqwest::Client,
    url: String,
    api_token: String,
    max_input_chars: usize,
}

impl HfEndpoint {
    fn build(cfg: &InferenceConfig, model: &str) -> Result<Self, ScorerError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("article-credibility-scorer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ScorerError::Unavailable(format!("http client: {e}")))?;
        let url = format!("{}/models/{}", cfg.base_url.trim_end_matches('/'), model);
        Ok(Self {
            http,
            url,
            api_token: cfg.api_token.clone(),
            max_input_chars: cfg.max_input_chars,
        })
    }

    async fn post<B, R>(&self, body: &B) -> Result<R, ScorerError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let mut req = self.http.post(&self.url).json(body);
        if !self.api_token.is_empty() {
            req = req.bearer_auth(&self.api_token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| ScorerError::Upstream(format!("request: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScorerError::Upstream(format!("{} returned {status}", self.url)));
        }
        resp.json::<R>()
            .await
            .map_err(|e| ScorerError::Upstream(format!("decode: {e}")))
    }
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

struct HfZeroShot(HfEndpoint);

#[async_trait]
impl ZeroShotClassifier for HfZeroShot {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
        hypothesis_template: Option<&str>,
    ) -> Result<Vec<LabelScore>, ScorerError> {
        #[derive(Serialize)]
        struct Params<'a> {
            candidate_labels: &'a [&'a str],
            #[serde(skip_serializing_if = "Option::is_none")]
            hypothesis_template: Option<&'a str>,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            inputs: &'a str,
            parameters: Params<'a>,
            options: InferenceOptions,
        }
        // The hosted API has answered in both shapes.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Resp {
            Columns { labels: Vec<String>, scores: Vec<f64> },
            Rows(Vec<LabelScore>),
        }

        let req = Req {
            inputs: truncate_chars(text, self.0.max_input_chars),
            parameters: Params {
                candidate_labels,
                hypothesis_template,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };
        let out = match self.0.post::<_, Resp>(&req).await? {
            Resp::Columns { labels, scores } => labels
                .into_iter()
                .zip(scores)
                .map(|(label, score)| LabelScore { label, score })
                .collect(),
            Resp::Rows(rows) => rows,
        };
        Ok(out)
    }
    fn provider_name(&self) -> &'static str {
        "huggingface"
    }
}

struct HfNer(HfEndpoint);

#[async_trait]
impl EntityRecognizer for HfNer {
    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>, ScorerError> {
        #[derive(Serialize)]
        struct Params {
            aggregation_strategy: &'static str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            inputs: &'a str,
            parameters: Params,
            options: InferenceOptions,
        }
        #[derive(Deserialize)]
        struct Row {
            #[serde(default)]
            entity_group: Option<String>,
            #[serde(default)]
            entity: Option<String>,
            #[serde(default)]
            word: String,
        }

        let req = Req {
            inputs: truncate_chars(text, self.0.max_input_chars),
            parameters: Params {
                aggregation_strategy: "simple",
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };
        let rows: Vec<Row> = self.0.post(&req).await?;
        let entities = rows
            .into_iter()
            .filter_map(|r| {
                let tag = r.entity_group.or(r.entity)?;
                Some(Entity {
                    text: r.word,
                    kind: EntityKind::from_tag(&tag),
                })
            })
            .collect();
        Ok(entities)
    }
    fn provider_name(&self) -> &'static str {
        "huggingface"
    }
}

// ------------------------------------------------------------
// Disabled and mock providers
// ------------------------------------------------------------

const DISABLED: &str = "disabled";

/// Always `Unavailable`; used when inference is turned off.
pub struct DisabledServices;

#[async_trait]
impl ZeroShotClassifier for DisabledServices {
    async fn classify(
        &self,
        _text: &str,
        _candidate_labels: &[&str],
        _hypothesis_template: Option<&str>,
    ) -> Result<Vec<LabelScore>, ScorerError> {
        Err(ScorerError::Unavailable("zero-shot inference disabled".into()))
    }
    fn provider_name(&self) -> &'static str {
        DISABLED
    }
}

#[async_trait]
impl EntityRecognizer for DisabledServices {
    async fn extract_entities(&self, _text: &str) -> Result<Vec<Entity>, ScorerError> {
        Err(ScorerError::Unavailable("entity recognition disabled".into()))
    }
    fn provider_name(&self) -> &'static str {
        DISABLED
    }
}

/// Deterministic stand-in for local runs: uniform label scores, no entities.
pub struct MockServices;

#[async_trait]
impl ZeroShotClassifier for MockServices {
    async fn classify(
        &self,
        _text: &str,
        candidate_labels: &[&str],
        _hypothesis_template: Option<&str>,
    ) -> Result<Vec<LabelScore>, ScorerError> {
        let n = candidate_labels.len().max(1) as f64;
        Ok(candidate_labels
            .iter()
            .map(|l| LabelScore {
                label: (*l).to_string(),
                score: 1.0 / n,
            })
            .collect())
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl EntityRecognizer for MockServices {
    async fn extract_entities(&self, _text: &str) -> Result<Vec<Entity>, ScorerError> {
        Ok(Vec::new())
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

// ------------------------------------------------------------
// Helpers
// ------------------------------------------------------------

/// Cut `text` to at most `max` characters, on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => {
            warn!(max, "inference input truncated");
            &text[..idx]
        }
        None => text,
    }
}
