// src/ingest/types.rs
use thiserror::Error;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FetchedArticle {
    pub text: String, // normalized paragraph text
    pub title: Option<String>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("reading body: {0}")]
    Body(String),
}

#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle, FetchError>;
    fn name(&self) -> &'static str;
}
