// src/config/scorer.rs
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/scorer.toml";
pub const ENV_CONFIG_PATH: &str = "SCORER_CONFIG_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub models: ModelsConfig,
    pub inference: InferenceConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Shortest article (in characters) that is scored.
    pub min_text_len: usize,
    /// Sentence Complexity maps average sentence length from [min, max] onto [0, 1].
    pub sentence_min_len: f64,
    pub sentence_max_len: f64,
    pub scorer_timeout_ms: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_text_len: 100,
            sentence_min_len: 1.0,
            sentence_max_len: 50.0,
            scorer_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub dir: PathBuf,
    pub vectorizer_file: String,
    pub classifier_file: String,
    /// Downloaded once when the file is absent.
    pub vectorizer_url: Option<String>,
    pub classifier_url: Option<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            vectorizer_file: "bow_vectorizer.json".into(),
            classifier_file: "random_forest_model.json".into(),
            vectorizer_url: None,
            classifier_url: None,
        }
    }
}

impl ModelsConfig {
    pub fn vectorizer_path(&self) -> PathBuf {
        self.dir.join(&self.vectorizer_file)
    }
    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(&self.classifier_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// "disabled" | "huggingface" | "mock" (case-insensitive)
    pub provider: String,
    pub base_url: String,
    /// "ENV" means: read from HF_API_TOKEN
    pub api_token: String,
    pub zero_shot_model: String,
    pub ner_model: String,
    pub timeout_secs: u64,
    pub max_input_chars: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".into(),
            base_url: "https://api-inference.huggingface.co".into(),
            api_token: "ENV".into(),
            zero_shot_model: "facebook/bart-large-mnli".into(),
            ner_model: "dslim/bert-base-NER".into(),
            timeout_secs: 30,
            max_input_chars: 4000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (compatible; article-credibility-scorer/0.1)".into(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading scorer config from {}", path.display()))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("parsing scorer config {}", path.display()))?;
        cfg.finish()
    }

    /// Load using env var + fallbacks:
    /// 1) $SCORER_CONFIG_PATH (must exist)
    /// 2) config/scorer.toml
    /// 3) built-in defaults
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                anyhow::bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
            }
            return Self::load_from_file(&pb);
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load_from_file(&default);
        }
        AppConfig::default().finish()
    }

    fn finish(mut self) -> anyhow::Result<Self> {
        self.apply_env_overrides();
        self.sanitize();
        self.resolve_api_token()?;
        Ok(self)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("MODEL_CACHE") {
            self.models.dir = PathBuf::from(dir);
        }
        if let Ok(url) = env::var("BOW_URL") {
            self.models.vectorizer_url = Some(url);
        }
        if let Ok(url) = env::var("RF_URL") {
            self.models.classifier_url = Some(url);
        }
        if let Ok(p) = env::var("INFERENCE_PROVIDER") {
            self.inference.provider = p;
        }
    }

    fn sanitize(&mut self) {
        let d = ScoringConfig::default();
        let s = &mut self.scoring;
        if s.min_text_len == 0 {
            s.min_text_len = d.min_text_len;
        }
        if !s.sentence_min_len.is_finite() || !s.sentence_max_len.is_finite() {
            s.sentence_min_len = d.sentence_min_len;
            s.sentence_max_len = d.sentence_max_len;
        }
        if s.sentence_min_len > s.sentence_max_len {
            // swap to keep a valid interval
            std::mem::swap(&mut s.sentence_min_len, &mut s.sentence_max_len);
        }
        if s.sentence_min_len == s.sentence_max_len {
            warn!(
                len = s.sentence_min_len,
                "sentence length bounds are equal; using defaults"
            );
            s.sentence_min_len = d.sentence_min_len;
            s.sentence_max_len = d.sentence_max_len;
        }
        if s.scorer_timeout_ms == 0 {
            s.scorer_timeout_ms = d.scorer_timeout_ms;
        }

        let inf = &mut self.inference;
        inf.provider = inf.provider.trim().to_lowercase();
        if !matches!(inf.provider.as_str(), "disabled" | "huggingface" | "mock") {
            warn!(provider = %inf.provider, "unknown inference provider; disabling");
            inf.provider = "disabled".into();
        }
        if inf.timeout_secs == 0 {
            inf.timeout_secs = InferenceConfig::default().timeout_secs;
        }
        if inf.max_input_chars == 0 {
            inf.max_input_chars = InferenceConfig::default().max_input_chars;
        }

        if self.fetch.timeout_secs == 0 {
            self.fetch.timeout_secs = FetchConfig::default().timeout_secs;
        }
    }

    fn resolve_api_token(&mut self) -> anyhow::Result<()> {
        let inf = &mut self.inference;
        if !inf.api_token.trim().eq_ignore_ascii_case("env") {
            return Ok(());
        }
        inf.api_token = match env::var("HF_API_TOKEN") {
            Ok(tok) => tok,
            Err(_) if inf.provider == "huggingface" => {
                anyhow::bail!("Missing HF_API_TOKEN env var")
            }
            Err(_) => String::new(),
        };
        Ok(())
    }
}
