use reqwest::StatusCode;
use thiserror::Error;

/// Failures from a live OA lookup.
///
/// Callers treat every variant as "status unknown"; nothing here is surfaced
/// to HTTP clients.
#[derive(Debug, Error)]
pub enum OaError {
    #[error("unpaywall request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unpaywall returned {code}")]
    Status { code: StatusCode },
}
