//! OpenAlex search adapter.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::error::SearchError;
use super::{SearchAdapter, SearchQuery, local_pdf_route, normalize_doi};
use crate::oa::OaVerifier;
use crate::pdf::PdfStore;
use crate::pool::Article;

/// Default OpenAlex API base.
pub const OPENALEX_API_BASE: &str = "https://api.openalex.org";

pub const SOURCE_NAME: &str = "OpenAlex";

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    doi: Option<String>,
    display_name: Option<String>,
    publication_year: Option<i32>,
    #[serde(default)]
    authorships: Vec<Authorship>,
    abstract_inverted_index: Option<HashMap<String, Vec<u32>>>,
}

#[derive(Debug, Deserialize)]
struct Authorship {
    author: Option<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    display_name: Option<String>,
}

/// Rebuilds the abstract from OpenAlex's inverted index, ordered by word
/// position.
pub(crate) fn reconstruct_abstract(index: &HashMap<String, Vec<u32>>) -> String {
    let mut positioned: Vec<(u32, &str)> = index
        .iter()
        .flat_map(|(word, positions)| positions.iter().map(move |&pos| (pos, word.as_str())))
        .collect();
    positioned.sort_by_key(|&(pos, _)| pos);

    positioned
        .into_iter()
        .map(|(_, word)| word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Searches OpenAlex works, restricted to OA articles with title matches.
pub struct OpenAlexAdapter {
    client: reqwest::Client,
    base_url: String,
    verifier: Arc<OaVerifier>,
    pdf_store: Arc<PdfStore>,
}

impl OpenAlexAdapter {
    pub fn new(
        client: reqwest::Client,
        verifier: Arc<OaVerifier>,
        pdf_store: Arc<PdfStore>,
    ) -> Self {
        Self {
            client,
            base_url: OPENALEX_API_BASE.to_string(),
            verifier,
            pdf_store,
        }
    }

    /// Overrides the API base URL (tests point this at a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_url(&self, query: &SearchQuery) -> String {
        let mut url = format!(
            "{}/works?filter=open_access.is_oa:true,title.search:{}",
            self.base_url,
            urlencoding::encode(&query.query)
        );
        if let Some(from) = query.year_from {
            url.push_str(&format!(",publication_year:>{}", from - 1));
        }
        if let Some(to) = query.year_to {
            url.push_str(&format!(",publication_year:<{}", to + 1));
        }
        url
    }

    fn work_to_article(work: Work, doi: String) -> Article {
        let authors = work
            .authorships
            .iter()
            .filter_map(|a| a.author.as_ref()?.display_name.as_deref())
            .collect::<Vec<_>>()
            .join(", ");
        let abstract_text = work
            .abstract_inverted_index
            .as_ref()
            .map(reconstruct_abstract)
            .unwrap_or_default();

        Article {
            title: work.display_name.unwrap_or_default(),
            authors,
            year: work.publication_year,
            pdf_url: local_pdf_route(&doi),
            doi,
            source: SOURCE_NAME.to_string(),
            abstract_text,
        }
    }
}

#[async_trait]
impl SearchAdapter for OpenAlexAdapter {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Article>, SearchError> {
        let resp = self.client.get(self.request_url(query)).send().await?;
        if !resp.status().is_success() {
            return Err(SearchError::Status {
                code: resp.status(),
            });
        }
        let body: WorksResponse = resp.json().await?;

        let mut articles = Vec::new();
        for work in body.results {
            let Some(doi) = work.doi.as_deref().map(normalize_doi) else {
                continue;
            };
            if doi.is_empty() {
                continue;
            }

            let Some(oa) = self.verifier.check(&doi).await else {
                continue;
            };
            let Some(pdf_url) = oa.pdf_url().filter(|_| oa.is_oa) else {
                continue;
            };

            self.pdf_store.fetch(&doi, pdf_url).await;
            articles.push(Self::work_to_article(work, doi));
        }

        debug!(hits = articles.len(), "OpenAlex search complete");
        Ok(articles)
    }
}
