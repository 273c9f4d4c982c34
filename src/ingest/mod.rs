// src/ingest/mod.rs
//! Article source boundary: fetch a page, pull out its paragraph text and title.

pub mod http;
pub mod types;

pub use crate::ingest::http::HttpArticleSource;
pub use crate::ingest::types::{ArticleSource, FetchError, FetchedArticle};

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("p selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("title selector"));

/// Normalize a markup fragment: strip tags, decode entities, then [`tidy_text`].
pub fn normalize_text(s: &str) -> String {
    // Leave a space so adjacent words don't merge
    let out = RE_TAGS.replace_all(s, " ");
    let out = html_escape::decode_html_entities(&out);
    tidy_text(&out)
}

/// Fold typographic quotes to ASCII and collapse whitespace.
pub fn tidy_text(s: &str) -> String {
    // “ ” ‘ ’ « »
    let out = s
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");
    RE_WS.replace_all(&out, " ").trim().to_string()
}

// Text nodes of one element, each trimmed, joined by single spaces.
fn element_text(el: ElementRef<'_>) -> String {
    let joined = el
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    tidy_text(&joined)
}

/// Text of every `<p>` element joined by single spaces, plus the page `<title>`.
pub fn extract_article(html: &str) -> FetchedArticle {
    let doc = Html::parse_document(html);

    let paragraphs: Vec<String> = doc
        .select(&PARAGRAPH)
        .map(element_text)
        .filter(|p| !p.is_empty())
        .collect();

    let title = doc
        .select(&TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    FetchedArticle {
        text: paragraphs.join(" "),
        title,
    }
}
