// src/ingest/http.rs
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::FetchConfig;
use crate::ingest::extract_article;
use crate::ingest::types::{ArticleSource, FetchError, FetchedArticle};

/// Fetches an article page over HTTP(S) and extracts its paragraph text.
pub struct HttpArticleSource {
    http: reqwest::Client,
}

impl HttpArticleSource {
    pub fn new(cfg: &FetchConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ArticleSource for HttpArticleSource {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle, FetchError> {
        let t0 = std::time::Instant::now();

        let resp = self
            .http
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let html = resp
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        let article = extract_article(&html);
        debug!(
            bytes = html.len(),
            chars = article.text.chars().count(),
            ms = t0.elapsed().as_millis() as u64,
            "article fetched"
        );
        Ok(article)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
