//! Per-article analysis: reference extraction and related-article ranking.


use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::oa::OaVerifier;
use crate::pdf::{PdfStore, extract_reference_dois};
use crate::pool::Article;
use crate::scoring::{DEFAULT_TOP_N, RelatedArticle, RelatedRanker};

/// A search result enriched with OA-verified references and semantically
/// related articles.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedArticle {
    #[serde(flatten)]
    pub article: Article,
    pub accessible_references: Vec<RelatedArticle>,
    pub ai_suggested_articles: Vec<RelatedArticle>,
}

/// Runs the analysis pipeline over deduplicated search results.
pub struct ArticleAnalyzer {
    pdf_store: Arc<PdfStore>,
    verifier: Arc<OaVerifier>,
    ranker: Arc<RelatedRanker>,
}

impl ArticleAnalyzer {
    pub fn new(
        pdf_store: Arc<PdfStore>,
        verifier: Arc<OaVerifier>,
        ranker: Arc<RelatedRanker>,
    ) -> Self {
        Self {
            pdf_store,
            verifier,
            ranker,
        }
    }

    /// Analyzes each article with a stored PDF.
    ///
    /// Articles whose PDF never landed (or does not parse) are skipped from
    /// the output rather than returned half-analyzed.
    pub async fn analyze(&self, articles: Vec<Article>) -> Vec<AnalyzedArticle> {
        let mut analyzed = Vec::new();

        for article in articles {
            let Some(text) = self.pdf_store.extract_text(&article.doi) else {
                debug!(doi = %article.doi, "no stored PDF, skipping analysis");
                continue;
            };

            let accessible_references = self.verify_references(&text).await;
            let ai_suggested_articles = self
                .ranker
                .rank(&text, Some(&article.doi), DEFAULT_TOP_N)
                .await;

            analyzed.push(AnalyzedArticle {
                article,
                accessible_references,
                ai_suggested_articles,
            });
        }

        analyzed
    }

    /// OA-verifies every reference DOI cited in `text`.
    async fn verify_references(&self, text: &str) -> Vec<RelatedArticle> {
        let mut accessible = Vec::new();
        for doi in extract_reference_dois(text) {
            let Some(oa) = self.verifier.check(&doi).await else {
                continue;
            };
            if oa.is_downloadable() {
                accessible.push(RelatedArticle::from_oa(doi, &oa));
            }
        }
        accessible
    }
}
