// src/config/mod.rs
pub mod scorer;

pub use scorer::{AppConfig, FetchConfig, InferenceConfig, ModelsConfig, ScoringConfig};
