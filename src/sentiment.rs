use serde::Serialize;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Proportions of positive, negative and neutral sentiment in a text, plus a
/// normalized compound score in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Polarity {
    pub pos: f64,
    pub neg: f64,
    pub neu: f64,
    pub compound: f64,
}

/// VADER polarity: full lexicon with booster words, negation, ALL-CAPS and
/// punctuation emphasis.
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn polarity(&self, text: &str) -> Polarity {
        if text.trim().is_empty() {
            return Polarity::default();
        }
        // The analyzer only borrows the crate's static lexicons.
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let get = |k: &str| scores.get(k).copied().filter(|v| v.is_finite()).unwrap_or(0.0);
        Polarity {
            pos: get("pos"),
            neg: get("neg"),
            neu: get("neu"),
            compound: get("compound").clamp(-1.0, 1.0),
        }
    }
}
