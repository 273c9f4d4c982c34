// src/analyze/heuristics.rs
//! Keyword, lexicon and shape heuristics. Each scorer is a pure, total function over the
//! article; the free functions are the contract, the `Scorer` impls only adapt them.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::{Article, ScoreValue, Scorer, ScorerError};
use crate::normalize::{word_tokens, ProcessedTokens};
use crate::sentiment::SentimentAnalyzer;

pub const EMOTIONAL_LANGUAGE: &str = "Emotional Language";
pub const OBJECTIVITY: &str = "Objectivity";
pub const BIAS: &str = "Bias";
pub const EXTREME_STATEMENTS: &str = "Extreme Statements";
pub const TOPIC_CONSISTENCY: &str = "Topic Consistency";
pub const SENTENCE_COMPLEXITY: &str = "Sentence Complexity";
pub const LANGUAGE_STYLE: &str = "Language Style";

const ABSOLUTIST_WORDS: &[&str] = &["always", "never", "completely", "totally", "only"];
const EXTREME_WORDS: &[&str] = &["worst", "best", "amazing", "horrible"];

/// Hits at which the bias score bottoms out.
const BIAS_SATURATION: f64 = 10.0;
const EXTREME_SATURATION: f64 = 5.0;
const CONTRACTION_SATURATION: f64 = 5.0;

static TOPIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(computer|technology|politics|economics|science|culture|health|business)\b",
    )
    .expect("topic regex")
});

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+\s").expect("sentence split regex"));

static CONTRACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(can't|won't|n't|it's|i'm|he's|she's)\b").expect("contraction regex")
});

/* ----------------------------
Pure scoring functions
---------------------------- */

/// Net sentiment (pos - neg) rescaled from [-1, 1] to [0, 1].
pub fn emotional_language(analyzer: &SentimentAnalyzer, text: &str) -> ScoreValue {
    let p = analyzer.polarity(text);
    ScoreValue::new((p.pos - p.neg + 1.0) / 2.0)
}

/// Share of processed tokens that do not look like adverbs/adjectives ("-ly", "-ive").
pub fn objectivity(tokens: &ProcessedTokens) -> ScoreValue {
    if tokens.is_empty() {
        return ScoreValue::ZERO;
    }
    let marked = tokens
        .iter()
        .filter(|w| w.ends_with("ly") || w.ends_with("ive"))
        .count();
    ScoreValue::new(1.0 - marked as f64 / tokens.len() as f64)
}

fn keyword_hits(text: &str, keywords: &[&str]) -> usize {
    let set: HashSet<&str> = keywords.iter().copied().collect();
    let lower = text.to_lowercase();
    word_tokens(&lower).filter(|t| set.contains(t)).count()
}

/// Absolutist wording; ten or more hits score 0.
pub fn bias(text: &str) -> ScoreValue {
    let hits = keyword_hits(text, ABSOLUTIST_WORDS) as f64;
    ScoreValue::new(1.0 - (hits / BIAS_SATURATION).min(1.0))
}

/// Superlatives; five or more hits score 0.
pub fn extreme_statements(text: &str) -> ScoreValue {
    let hits = keyword_hits(text, EXTREME_WORDS) as f64;
    ScoreValue::new(1.0 - (hits / EXTREME_SATURATION).min(1.0))
}

/// Distinct topic keywords over total topic keyword occurrences.
pub fn topic_consistency(text: &str) -> ScoreValue {
    let topics: Vec<String> = TOPIC_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    if topics.is_empty() {
        return ScoreValue::ZERO;
    }
    let distinct: HashSet<&str> = topics.iter().map(String::as_str).collect();
    ScoreValue::new(distinct.len() as f64 / topics.len() as f64)
}

/// Average words per sentence, mapped linearly from `[min_len, max_len]` to `[0, 1]`.
pub fn sentence_complexity(text: &str, min_len: f64, max_len: f64) -> ScoreValue {
    let lens: Vec<usize> = SENTENCE_SPLIT_RE
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.split_whitespace().count())
        .collect();
    if lens.is_empty() {
        return ScoreValue::ZERO;
    }
    let avg = lens.iter().sum::<usize>() as f64 / lens.len() as f64;
    let span = max_len - min_len;
    if span <= 0.0 {
        return ScoreValue::ZERO;
    }
    ScoreValue::new((avg - min_len) / span)
}

/// Formality: five or more contractions score 0.
pub fn language_formality(text: &str) -> ScoreValue {
    let hits = CONTRACTION_RE.find_iter(&text.to_lowercase()).count() as f64;
    ScoreValue::new(1.0 - (hits / CONTRACTION_SATURATION).min(1.0))
}

/* ----------------------------
Scorer adapters
---------------------------- */

#[derive(Debug, Clone, Default)]
pub struct EmotionalLanguage {
    analyzer: SentimentAnalyzer,
}

impl EmotionalLanguage {
    pub fn new(analyzer: SentimentAnalyzer) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl Scorer for EmotionalLanguage {
    fn name(&self) -> &'static str {
        EMOTIONAL_LANGUAGE
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        Ok(emotional_language(&self.analyzer, &article.raw))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Objectivity;

#[async_trait]
impl Scorer for Objectivity {
    fn name(&self) -> &'static str {
        OBJECTIVITY
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        Ok(objectivity(&article.processed))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bias;

#[async_trait]
impl Scorer for Bias {
    fn name(&self) -> &'static str {
        BIAS
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        Ok(bias(&article.raw))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtremeStatements;

#[async_trait]
impl Scorer for ExtremeStatements {
    fn name(&self) -> &'static str {
        EXTREME_STATEMENTS
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        Ok(extreme_statements(&article.raw))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TopicConsistency;

#[async_trait]
impl Scorer for TopicConsistency {
    fn name(&self) -> &'static str {
        TOPIC_CONSISTENCY
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        Ok(topic_consistency(&article.raw))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SentenceComplexity {
    pub min_len: f64,
    pub max_len: f64,
}

impl Default for SentenceComplexity {
    fn default() -> Self {
        Self {
            min_len: 1.0,
            max_len: 50.0,
        }
    }
}

#[async_trait]
impl Scorer for SentenceComplexity {
    fn name(&self) -> &'static str {
        SENTENCE_COMPLEXITY
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        Ok(sentence_complexity(&article.raw, self.min_len, self.max_len))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageStyle;

#[async_trait]
impl Scorer for LanguageStyle {
    fn name(&self) -> &'static str {
        LANGUAGE_STYLE
    }
    async fn score(&self, article: &Article) -> Result<ScoreValue, ScorerError> {
        Ok(language_formality(&article.raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::preprocess;

    fn in_unit(v: ScoreValue) -> bool {
        (0.0..=1.0).contains(&v.get())
    }

    #[test]
    fn empty_text_edge_cases() {
        assert_eq!(bias("").get(), 1.0);
        assert_eq!(extreme_statements("").get(), 1.0);
        assert_eq!(objectivity(&preprocess("")).get(), 0.0);
        assert_eq!(topic_consistency("").get(), 0.0);
        assert_eq!(sentence_complexity("", 1.0, 50.0).get(), 0.0);
        assert_eq!(language_formality("").get(), 1.0);
        assert_eq!(emotional_language(&SentimentAnalyzer::new(), "").get(), 0.5);
    }

    #[test]
    fn bias_counts_whole_words_case_insensitive() {
        let t = "They ALWAYS win. Never lose. Only the totally completely best.";
        // always, never, only, totally, completely
        assert!((bias(t).get() - 0.5).abs() < 1e-12);
        // "onlyness" is not "only"
        assert_eq!(bias("onlyness").get(), 1.0);
    }

    #[test]
    fn bias_saturates_at_ten_hits() {
        let t = "never ".repeat(25);
        assert_eq!(bias(&t).get(), 0.0);
    }

    #[test]
    fn extreme_statements_scale_by_five() {
        assert!((extreme_statements("the best and the worst").get() - 0.6).abs() < 1e-12);
        assert_eq!(extreme_statements(&"amazing ".repeat(9)).get(), 0.0);
    }

    #[test]
    fn objectivity_counts_ly_and_ive_suffixes() {
        let toks = preprocess("Officials quickly released decisive figures today.");
        // officials, quickly, released, decisive, figures, today -> 2 of 6 marked
        assert!((objectivity(&toks).get() - (1.0 - 2.0 / 6.0)).abs() < 1e-12);
    }

    #[test]
    fn topic_consistency_is_distinct_over_total() {
        let t = "Science and SCIENCE, health and business.";
        assert!((topic_consistency(t).get() - 0.75).abs() < 1e-12);
        assert_eq!(topic_consistency("politics").get(), 1.0);
    }

    #[test]
    fn sentence_complexity_rescales_average_length() {
        // 9, 8, 7 words -> avg 8 -> (8-1)/49
        let t = "The council published the annual report on science funding. \
                 The report lists health programs and business grants. \
                 Officials reviewed the science budget in March.";
        let v = sentence_complexity(t, 1.0, 50.0).get();
        assert!((v - 7.0 / 49.0).abs() < 1e-12);
    }

    #[test]
    fn sentence_complexity_clips_long_sentences() {
        let t = format!("{}.", "word ".repeat(120));
        assert_eq!(sentence_complexity(&t, 1.0, 50.0).get(), 1.0);
    }

    #[test]
    fn formality_penalises_contractions() {
        let t = "It's clear he's right and she's not, but I'm sure we can't know.";
        // it's, he's, she's, i'm, can't
        assert_eq!(language_formality(t).get(), 0.0);
        assert!((language_formality("It's fine.").get() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn emotional_language_moves_with_sentiment() {
        let a = SentimentAnalyzer::new();
        assert!(emotional_language(&a, "A wonderful, happy success.").get() > 0.5);
        assert!(emotional_language(&a, "A horrible, violent disaster.").get() < 0.5);
    }

    #[test]
    fn emotional_language_reads_broad_vocabulary() {
        let a = SentimentAnalyzer::new();
        let upbeat = "The triumphant, thrilled crowd celebrated the delightful, magnificent victory.";
        assert!(emotional_language(&a, upbeat).get() > 0.5);
        let grim = "The devastated, miserable town mourned the terrible, tragic losses.";
        assert!(emotional_language(&a, grim).get() < 0.5);
        // plain reporting stays neutral
        let plain = "Officials reviewed the science budget in March.";
        assert_eq!(emotional_language(&a, plain).get(), 0.5);
    }

    #[test]
    fn hyphenated_compounds_are_not_keyword_hits() {
        assert_eq!(bias("an only-child").get(), 1.0);
        assert_eq!(extreme_statements("a best-selling author").get(), 1.0);
        assert!((bias("only an only-child").get() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn all_heuristics_stay_in_unit_range() {
        let a = SentimentAnalyzer::new();
        for t in [
            "",
            "!!!",
            "worst worst worst worst worst worst worst",
            "never never never never never never never never never never never never",
            "It's can't won't I'm he's she's it's it's",
            "love love love love love love",
            "hate hate hate hate hate",
        ] {
            let toks = preprocess(t);
            assert!(in_unit(emotional_language(&a, t)));
            assert!(in_unit(objectivity(&toks)));
            assert!(in_unit(bias(t)));
            assert!(in_unit(extreme_statements(t)));
            assert!(in_unit(topic_consistency(t)));
            assert!(in_unit(sentence_complexity(t, 1.0, 50.0)));
            assert!(in_unit(language_formality(t)));
        }
    }
}
