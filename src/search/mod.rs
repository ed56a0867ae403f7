//! Search adapters for upstream OA indexes.
//!
//! Each adapter turns a [`SearchQuery`] into a uniform list of
//! [`Article`](crate::pool::Article)s, gating results on OA verification and
//! storing PDFs locally as a side effect. Adapter failures are the adapter's
//! own problem: the discovery service logs them and proceeds with whatever
//! the other adapters returned.

pub mod doaj;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod openalex;

#[cfg(test)]
mod tests;

pub use doaj::DoajAdapter;
pub use error::SearchError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSearchAdapter;
pub use openalex::OpenAlexAdapter;

use async_trait::async_trait;

use crate::cache::sanitize_key;
use crate::pool::Article;

/// A search request as the adapters see it.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub query: String,
    /// Requested content type (`"all"` by default). Reserved for upstream
    /// filters; both current adapters return every matching work type.
    pub kind: String,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: "all".to_string(),
            ..Self::default()
        }
    }
}

/// One upstream OA index.
#[async_trait]
pub trait SearchAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Article>, SearchError>;
}

/// Local serving route for a stored PDF, shared by all adapters.
pub(crate) fn local_pdf_route(doi: &str) -> String {
    format!("/article/{}/pdf", sanitize_key(doi))
}

/// Strips `doi.org` URL prefixes; upstream records mix bare DOIs and URLs.
pub(crate) fn normalize_doi(raw: &str) -> String {
    let trimmed = raw.trim();
    for prefix in ["https://doi.org/", "http://doi.org/", "doi.org/"] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return rest.to_string();
        }
    }
    trimmed.to_string()
}
