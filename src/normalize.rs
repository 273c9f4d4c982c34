// src/normalize.rs
//! Text normalizer: word tokenizer, English stop-word set and the "processed" token stream.
//!
//! `preprocess` lower-cases the text, tokenizes it and keeps only purely alphabetic tokens
//! that are not stop words. The result is derived once per article and shared read-only
//! with the scorers that need it.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Word runs (hyphenated compounds stay whole), or single punctuation characters.
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\w+(?:-\w+)*|[^\w\s]").expect("word tokenizer regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORD_LIST.iter().copied().collect());

const STOP_WORD_LIST: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Ordered, lower-case, alphabetic, stop-word-free tokens of one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedTokens(Vec<String>);

impl ProcessedTokens {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Tokenize `text` as-is (no case folding). Punctuation marks come out as separate tokens.
pub fn word_tokens(text: &str) -> impl Iterator<Item = &str> {
    WORD_RE.find_iter(text).map(|m| m.as_str())
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Lower-case, tokenize, drop non-alphabetic tokens and stop words.
pub fn preprocess(text: &str) -> ProcessedTokens {
    let lower = text.to_lowercase();
    let tokens = word_tokens(&lower)
        .filter(|t| t.chars().all(char::is_alphabetic) && !is_stop_word(t))
        .map(str::to_string)
        .collect();
    ProcessedTokens(tokens)
}
