//! Result assembler: rubric + fusion → public response.
//!
//! Every category carries the same display weight, `0.7 / n`. The 70% rubric share is split
//! evenly for presentation; each category's real influence comes through the rubric mean.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::scoring::{round_to, FusionResult, MODEL_VERSION, RUBRIC_WEIGHT};
use super::RubricMapping;

static NON_ALNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("slug regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCategory {
    pub id: String,
    pub label: String,
    /// Display weight, 0..1.
    pub weight: f64,
    /// 0..100, two decimals.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    pub categories: Vec<ScoreCategory>,
    /// 0..100 fused score.
    pub total: f64,
    pub rf_prob: Option<f64>,
    pub classification: Option<bool>,
    pub classification_label: Option<String>,
    pub model_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Lower-case, collapse non-alphanumeric runs to '-', trim '-' at both ends.
pub fn slugify(label: &str) -> String {
    let lower = label.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Equal split of the rubric share over `n` categories.
pub fn display_weight(n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        RUBRIC_WEIGHT / n as f64
    }
}

pub fn assemble(
    url: &str,
    title: Option<String>,
    rubric: &RubricMapping,
    fusion: &FusionResult,
) -> ScoreResponse {
    let weight = display_weight(rubric.len());
    let categories = rubric
        .iter()
        .map(|(label, value)| ScoreCategory {
            id: slugify(label),
            label: label.to_string(),
            weight,
            score: round_to(value.get() * 100.0, 2),
            details: None,
        })
        .collect();

    ScoreResponse {
        url: url.to_string(),
        title,
        categories,
        total: fusion.composite_score,
        rf_prob: Some(round_to(fusion.probability, 4)),
        classification: Some(fusion.verdict),
        classification_label: Some(if fusion.verdict { "True" } else { "False" }.to_string()),
        model_version: Some(MODEL_VERSION.to_string()),
        notes: None,
    }
}
