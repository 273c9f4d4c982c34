//! Fusion of the rubric average with the composite classifier probability.
//!
//! combined = 0.7 * mean(rubric) + 0.3 * probability
//! score    = round(combined * 100, 2)
//! verdict  = combined >= 0.6
//!
//! Weights and threshold are fixed: the response's `modelVersion` names this formula.

use serde::Serialize;

use super::RubricMapping;

pub const RUBRIC_WEIGHT: f64 = 0.7;
pub const CLASSIFIER_WEIGHT: f64 = 0.3;
pub const VERDICT_THRESHOLD: f64 = 0.6;
/// Version tag of the blend above.
pub const MODEL_VERSION: &str = "rubric-rf-70-30";

/// Output of one fusion. Pure value, lives for one request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FusionResult {
    /// Fused score on 0..100, two decimals.
    pub composite_score: f64,
    /// Classifier probability that went in (clamped to [0, 1]).
    pub probability: f64,
    pub verdict: bool,
    /// Unrounded blend in [0, 1].
    pub combined: f64,
}

impl FusionResult {
    /// Build the result from an already blended value.
    pub fn from_combined(combined: f64, probability: f64) -> Self {
        Self {
            composite_score: round_to(combined * 100.0, 2),
            probability,
            verdict: verdict_for(combined),
            combined,
        }
    }
}

/// Threshold is inclusive.
#[inline]
pub fn verdict_for(combined: f64) -> bool {
    combined >= VERDICT_THRESHOLD
}

pub fn fuse(rubric: &RubricMapping, probability: f64) -> FusionResult {
    let probability = clamp_probability(probability);
    let combined = RUBRIC_WEIGHT * rubric.average() + CLASSIFIER_WEIGHT * probability;
    FusionResult::from_combined(combined, probability)
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(x: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (x * f).round() / f
}
