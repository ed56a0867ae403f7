use reqwest::StatusCode;
use thiserror::Error;

/// Search adapter failures.
///
/// The discovery service treats these as "this adapter found nothing";
/// they never fail the request as a whole.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search index returned {code}")]
    Status { code: StatusCode },
}
