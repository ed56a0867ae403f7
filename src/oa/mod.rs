//! Cached open-access verification.
//!
//! [`OaVerifier`] translates a DOI into an [`OaStatus`] using the Unpaywall
//! API, memoized through the [`CacheStore`](crate::cache::CacheStore). Lookup
//! failures resolve to "unknown" (`None`) and are never cached, so transient
//! upstream errors retry on the next call for the same DOI.

mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod unpaywall;


pub use error::OaError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockOaLookup;
pub use unpaywall::UnpaywallClient;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{CacheStore, sanitize_key};

/// Open-access status for a DOI, as reported by Unpaywall.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OaStatus {
    #[serde(default)]
    pub is_oa: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub journal_name: Option<String>,
    #[serde(default)]
    pub best_oa_location: Option<OaLocation>,
}

/// Best OA location reported alongside [`OaStatus`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OaLocation {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_for_pdf: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

impl OaStatus {
    /// Best direct-PDF URL, if one exists.
    pub fn pdf_url(&self) -> Option<&str> {
        self.best_oa_location.as_ref()?.url_for_pdf.as_deref()
    }

    /// Whether the article is OA with a resolvable PDF.
    pub fn is_downloadable(&self) -> bool {
        self.is_oa && self.pdf_url().is_some()
    }
}

/// One live OA lookup. Implemented by [`UnpaywallClient`] in production and
/// mocked in tests.
#[async_trait]
pub trait OaLookup: Send + Sync {
    async fn lookup(&self, doi: &str) -> Result<OaStatus, OaError>;
}

/// Cache-backed OA verification.
pub struct OaVerifier {
    lookup: Arc<dyn OaLookup>,
    cache: Arc<CacheStore>,
}

impl OaVerifier {
    pub fn new(lookup: Arc<dyn OaLookup>, cache: Arc<CacheStore>) -> Self {
        Self { lookup, cache }
    }

    fn cache_key(doi: &str) -> String {
        format!("unpaywall_{}", sanitize_key(doi))
    }

    /// Returns the OA status for `doi`, or `None` when it cannot be
    /// determined.
    ///
    /// Cache hits return without network activity. On a miss exactly one
    /// lookup runs; a successful response is cached, a failed one is not.
    pub async fn check(&self, doi: &str) -> Option<OaStatus> {
        let doi = doi.trim();
        if doi.is_empty() {
            return None;
        }

        let key = Self::cache_key(doi);
        if let Some(cached) = self.cache.get::<OaStatus>(&key) {
            return Some(cached);
        }

        match self.lookup.lookup(doi).await {
            Ok(status) => {
                self.cache.put(&key, &status);
                Some(status)
            }
            Err(e) => {
                debug!(doi, error = %e, "OA lookup failed, treating as unknown");
                None
            }
        }
    }
}
