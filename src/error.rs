//! Typed errors for the language-model boundary.
//!
//! Extraction and highlighting are total and have no error type; only
//! building an analysis request and reading the model's reply can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Nothing to analyse
    #[error("article content is empty")]
    EmptyContent,

    /// The provider envelope carried no text
    #[error("model response is empty")]
    EmptyResponse,

    /// The reply is not JSON, even after trimming surrounding prose
    #[error("model response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The reply is JSON but not shaped like an analysis
    #[error("model response does not match the analysis schema: {reason}")]
    Schema { reason: String },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
