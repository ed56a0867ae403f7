use reqwest::StatusCode;
use thiserror::Error;

/// PDF retrieval failures. A failed fetch leaves the article without a
/// stored PDF; the analysis pipeline skips it.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("pdf download failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("pdf host returned {code}")]
    Status { code: StatusCode },

    #[error("pdf storage failed: {0}")]
    Io(#[from] std::io::Error),
}
