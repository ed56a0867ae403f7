//! Related-article ranking.
//!
//! Given a document's text and DOI, [`RelatedRanker`] finds the nearest topic
//! cluster, scores its members (or the whole pool as fallback) by cosine
//! similarity, and returns the OA-verified top-N.

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cluster::ClusterEngine;
use crate::embedding::CachedEmbedder;
use crate::oa::{OaStatus, OaVerifier};
use crate::pool::{Article, CandidatePool};

/// Default result window size for [`RelatedRanker::rank`].
pub const DEFAULT_TOP_N: usize = 10;

/// Sentinel similarity for incomparable vectors. Strictly below any real
/// cosine value's usefulness in a max-selection, so such pairs never win.
pub const SIMILARITY_FLOOR: f32 = -1.0;

/// Cosine similarity of two vectors.
///
/// Returns [`SIMILARITY_FLOOR`] when the inputs are empty, of unequal
/// length, or either magnitude is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return SIMILARITY_FLOOR;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        SIMILARITY_FLOOR
    } else {
        dot / (norm_a * norm_b)
    }
}

/// A ranked, OA-verified related article.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedArticle {
    pub title: String,
    pub doi: String,
    pub source: String,
    pub pdf_url: String,
}

impl RelatedArticle {
    /// Builds an entry for an OA-verified reference DOI, using only the
    /// lookup's fields.
    pub fn from_oa(doi: String, oa: &OaStatus) -> Self {
        Self {
            title: oa.title.clone().unwrap_or_else(|| "Unknown".to_string()),
            doi,
            source: oa
                .journal_name
                .clone()
                .unwrap_or_else(|| "OA Source".to_string()),
            pdf_url: oa.pdf_url().unwrap_or_default().to_string(),
        }
    }

    fn from_candidate(article: Article, oa: &OaStatus) -> Self {
        let title = if article.title.trim().is_empty() {
            oa.title.clone().unwrap_or_else(|| "Unknown".to_string())
        } else {
            article.title
        };
        let source = if article.source.trim().is_empty() {
            oa.journal_name
                .clone()
                .unwrap_or_else(|| "OA Source".to_string())
        } else {
            article.source
        };
        let pdf_url = if article.pdf_url.trim().is_empty() {
            oa.pdf_url().unwrap_or_default().to_string()
        } else {
            article.pdf_url
        };
        Self {
            title,
            doi: article.doi,
            source,
            pdf_url,
        }
    }
}

/// Nearest-cluster related-article ranking.
pub struct RelatedRanker {
    pool: Arc<CandidatePool>,
    clusters: Arc<ClusterEngine>,
    embedder: Arc<CachedEmbedder>,
    verifier: Arc<OaVerifier>,
}

impl RelatedRanker {
    pub fn new(
        pool: Arc<CandidatePool>,
        clusters: Arc<ClusterEngine>,
        embedder: Arc<CachedEmbedder>,
        verifier: Arc<OaVerifier>,
    ) -> Self {
        Self {
            pool,
            clusters,
            embedder,
            verifier,
        }
    }

    /// Ranks OA-verified articles related to `document_text`.
    ///
    /// The top-N window is fixed before OA filtering: candidates failing
    /// verification are dropped, not replaced by the next-best candidate.
    pub async fn rank(
        &self,
        document_text: &str,
        exclude_doi: Option<&str>,
        top_n: usize,
    ) -> Vec<RelatedArticle> {
        let Some(main_vector) = self
            .embedder
            .embed_for(exclude_doi, Some(document_text))
            .await
        else {
            return Vec::new();
        };

        let search_pool = self.build_search_pool(&main_vector, exclude_doi);

        let mut scored = self.score_candidates(&main_vector, search_pool, exclude_doi).await;

        // Stable sort: equal scores keep their original relative order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(top_n);

        let mut results = Vec::new();
        for (score, article) in scored {
            let Some(oa) = self.verifier.check(&article.doi).await else {
                continue;
            };
            if !oa.is_downloadable() {
                continue;
            }
            debug!(doi = %article.doi, score, "related article verified");
            results.push(RelatedArticle::from_candidate(article, &oa));
        }
        results
    }

    /// Members of the centroid-nearest cluster, or the whole pool when no
    /// cluster narrows the search.
    fn build_search_pool(&self, main_vector: &[f32], exclude_doi: Option<&str>) -> Vec<Article> {
        let state = self.clusters.state();

        let mut selected = None;
        let mut best = f32::NEG_INFINITY;
        for (index, centroid) in state.centroids.iter().enumerate() {
            let sim = cosine_similarity(main_vector, centroid);
            // Strict comparison: ties go to the lowest index.
            if sim > best {
                best = sim;
                selected = Some(index);
            }
        }

        let members = match selected {
            Some(cluster) => state.members_of(cluster, exclude_doi),
            None => Vec::new(),
        };

        if members.is_empty() {
            self.pool.snapshot()
        } else {
            members
        }
    }

    async fn score_candidates(
        &self,
        main_vector: &[f32],
        candidates: Vec<Article>,
        exclude_doi: Option<&str>,
    ) -> Vec<(f32, Article)> {
        let mut scored = Vec::new();
        for article in candidates {
            if article.doi.trim().is_empty() || article.doi_matches(exclude_doi) {
                continue;
            }

            // Embedding from cache by DOI, computed from the abstract on a
            // miss. No abstract and no cached vector excludes the candidate;
            // unlike pool-wide clustering, this path never embeds the title.
            let abstract_text = Some(article.abstract_text.as_str())
                .map(str::trim)
                .filter(|t| !t.is_empty());
            let Some(vector) = self
                .embedder
                .embed_for(Some(&article.doi), abstract_text)
                .await
            else {
                continue;
            };

            scored.push((cosine_similarity(main_vector, &vector), article));
        }
        scored
    }
}
