use reqwest::StatusCode;
use thiserror::Error;

/// Failures from the embedding provider.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("no API key configured for the embedding provider")]
    MissingApiKey,

    #[error("embedding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("embedding provider returned {code}")]
    Status { code: StatusCode },
}
