//! Count vectorizer: token pattern + fixed vocabulary → sparse term counts.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde::Deserialize;

fn default_token_pattern() -> String {
    r"(?u)\b\w\w+\b".to_string()
}
fn default_lowercase() -> bool {
    true
}

/// Term index → count.
pub type SparseCounts = BTreeMap<usize, f64>;

#[derive(Debug, Deserialize)]
pub struct BagOfWords {
    vocabulary: HashMap<String, usize>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default = "default_token_pattern")]
    token_pattern: String,
    #[serde(skip)]
    token_re: Option<Regex>,
}

impl BagOfWords {
    /// Compile the token pattern and check that term indices are dense.
    pub fn compile(mut self) -> Result<Self, String> {
        let re = Regex::new(&self.token_pattern)
            .map_err(|e| format!("bad token_pattern {:?}: {e}", self.token_pattern))?;
        let n = self.vocabulary.len();
        if let Some((term, idx)) = self.vocabulary.iter().find(|(_, idx)| **idx >= n) {
            return Err(format!("term {term:?} has index {idx} outside 0..{n}"));
        }
        self.token_re = Some(re);
        Ok(self)
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn transform(&self, text: &str) -> SparseCounts {
        let mut counts = SparseCounts::new();
        let Some(re) = self.token_re.as_ref() else {
            return counts;
        };
        let folded;
        let text = if self.lowercase {
            folded = text.to_lowercase();
            folded.as_str()
        } else {
            text
        };
        for m in re.find_iter(text) {
            if let Some(&idx) = self.vocabulary.get(m.as_str()) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        counts
    }
}
