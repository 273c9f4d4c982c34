// src/analyze/readability.rs
//! Flesch-Kincaid grade level mapped onto a "sweet spot" score.
//!
//! The grade is scaled by 1/20 and scored by distance from 0.5 (grade 10), so grade 10 scores
//! 1.0 and grades 0 and 20 score 0.0. If the grade cannot be computed (no words, no sentences,
//! non-finite result) the scorer returns 0.5. That fallback belongs to this scorer only.

use async_trait::async_trait;
use tracing::debug;

use super::{Article, ScoreValue, Scorer, ScorerError};

pub const READABILITY: &str = "Readability";

const GRADE_SCALE: f64 = 20.0;

/// Flesch-Kincaid grade level of `text`.
pub fn flesch_kincaid_grade(text: &str) -> Result<f64, ScorerError> {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .collect();
    if words.is_empty() {
        return Err(ScorerError::Computation("no words".into()));
    }

    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphabetic))
        .count();
    if sentences == 0 {
        return Err(ScorerError::Computation("no sentences".into()));
    }

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let wps = words.len() as f64 / sentences as f64;
    let spw = syllables as f64 / words.len() as f64;
    let grade = 0.39 * wps + 11.8 * spw - 15.59;

    if grade.is_finite() {
        Ok(grade)
    } else {
        Err(ScorerError::Computation(format!("non-finite grade {grade}")))
    }
}

/// Vowel-group syllable estimate. Silent final "e" and non-syllabic "-ed" are dropped;
/// every word has at least one syllable.
pub fn count_syllables(word: &str) -> usize {
    let w: String = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if w.is_empty() {
        return 0;
    }

    let mut groups = 0usize;
    let mut prev_vowel = false;
    for c in w.chars() {
        let v = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if v && !prev_vowel {
            groups += 1;
        }
        prev_vowel = v;
    }

    if groups > 1 && w.ends_with('e') && !w.ends_with("le") {
        groups -= 1;
    }
    if groups > 1 && w.ends_with("ed") && !w.ends_with("ted") && !w.ends_with("ded") {
        groups -= 1;
    }
    groups.max(1)
}

/// Readability score in [0, 1]; 0.5 when the grade cannot be computed.
pub fn readability(text: &str) -> ScoreValue {
    match flesch_kincaid_grade(text) {
        Ok(grade) => {
            let scaled = grade / GRADE_SCALE;
            ScoreValue::new(1.0 - (scaled - 0.5).abs() * 2.0)
        }
        Err(e) => {
            debug!(error = %e, "readability fallback");
            ScoreValue::NEUTRAL
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Readability;

#[async_trait]
impl Scorer for Readability {
    fn name(&self) -> &'static str {
        READABILITY
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        Ok(readability(&article.raw))
    }
}
