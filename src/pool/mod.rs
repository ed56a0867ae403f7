//! Process-wide candidate pool.
//!
//! Discovered articles accumulate here across requests for the lifetime of
//! the process. The pool is append-only aside from dedup-on-insert and is
//! shared behind an [`std::sync::Arc`] by the clustering engine and ranker.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A discovered open-access article.
///
/// Identity is the lowercased DOI. Records are read-only once pooled; later
/// enrichment (analysis output) is attached to a copy, never in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub year: Option<i32>,
    pub doi: String,
    pub source: String,
    /// Local serving route for the stored PDF (`/article/<sanitized-doi>/pdf`).
    #[serde(default)]
    pub pdf_url: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
}

impl Article {
    /// Lowercased DOI used as pool identity.
    pub fn doi_key(&self) -> String {
        self.doi.trim().to_lowercase()
    }

    /// Case-insensitive DOI comparison against an optional exclusion.
    pub fn doi_matches(&self, other: Option<&str>) -> bool {
        match other {
            Some(doi) => self.doi_key() == doi.trim().to_lowercase(),
            None => false,
        }
    }
}

#[derive(Debug, Default)]
struct PoolInner {
    articles: Vec<Article>,
    seen: HashSet<String>,
}

/// Deduplicated, insertion-ordered collection of discovered articles.
#[derive(Debug, Default)]
pub struct CandidatePool {
    inner: RwLock<PoolInner>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `articles` into the pool.
    ///
    /// Articles without a DOI are dropped silently; duplicates (by lowercased
    /// DOI) are ignored, so the first-seen record's fields always win.
    /// Returns the number of newly inserted articles.
    pub fn add_candidates(&self, articles: &[Article]) -> usize {
        let mut inner = self.inner.write();
        let mut inserted = 0;

        for article in articles {
            let key = article.doi_key();
            if key.is_empty() || inner.seen.contains(&key) {
                continue;
            }
            inner.seen.insert(key);
            inner.articles.push(article.clone());
            inserted += 1;
        }

        if inserted > 0 {
            debug!(inserted, total = inner.articles.len(), "candidate pool grew");
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.inner.read().articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().articles.is_empty()
    }

    /// Clones the current contents in insertion order.
    ///
    /// Clustering and ranking work from a snapshot so concurrent inserts
    /// never invalidate an in-flight recompute; they accept that the snapshot
    /// may be stale by the time it is used.
    pub fn snapshot(&self) -> Vec<Article> {
        self.inner.read().articles.clone()
    }
}
