//! DOAJ search adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::error::SearchError;
use super::{SearchAdapter, SearchQuery, local_pdf_route, normalize_doi};
use crate::oa::OaVerifier;
use crate::pdf::PdfStore;
use crate::pool::Article;

/// Default DOAJ API base.
pub const DOAJ_API_BASE: &str = "https://doaj.org/api/v2";

pub const SOURCE_NAME: &str = "DOAJ";

const PAGE_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    results: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct Record {
    bibjson: Option<Bibjson>,
}

#[derive(Debug, Deserialize)]
struct Bibjson {
    title: Option<String>,
    year: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    author: Vec<BibAuthor>,
    #[serde(default)]
    identifier: Vec<Identifier>,
}

#[derive(Debug, Deserialize)]
struct BibAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Identifier {
    #[serde(rename = "type")]
    pub(crate) kind: Option<String>,
    pub(crate) id: Option<String>,
}

/// Pulls the DOI out of a bibjson identifier list.
pub(crate) fn doi_from_identifiers(identifiers: &[Identifier]) -> Option<String> {
    identifiers
        .iter()
        .find(|i| i.kind.as_deref() == Some("doi"))
        .and_then(|i| i.id.as_deref())
        .map(normalize_doi)
        .filter(|doi| !doi.is_empty())
}

/// Searches DOAJ articles.
pub struct DoajAdapter {
    client: reqwest::Client,
    base_url: String,
    verifier: Arc<OaVerifier>,
    pdf_store: Arc<PdfStore>,
}

impl DoajAdapter {
    pub fn new(
        client: reqwest::Client,
        verifier: Arc<OaVerifier>,
        pdf_store: Arc<PdfStore>,
    ) -> Self {
        Self {
            client,
            base_url: DOAJ_API_BASE.to_string(),
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
        format!(
            "{}/search/articles/{}?pageSize={PAGE_SIZE}",
            self.base_url,
            urlencoding::encode(&query.query)
        )
    }

    fn bibjson_to_article(bibjson: Bibjson, doi: String) -> Article {
        let authors = bibjson
            .author
            .iter()
            .filter_map(|a| a.name.as_deref())
            .collect::<Vec<_>>()
            .join(", ");

        Article {
            title: bibjson.title.unwrap_or_default(),
            authors,
            year: bibjson.year.as_deref().and_then(|y| y.parse().ok()),
            pdf_url: local_pdf_route(&doi),
            doi,
            source: SOURCE_NAME.to_string(),
            abstract_text: bibjson.abstract_text.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl SearchAdapter for DoajAdapter {
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
        let body: ArticlesResponse = resp.json().await?;

        let mut articles = Vec::new();
        for record in body.results {
            let Some(bibjson) = record.bibjson else {
                continue;
            };
            let Some(doi) = doi_from_identifiers(&bibjson.identifier) else {
                continue;
            };

            let Some(oa) = self.verifier.check(&doi).await else {
                continue;
            };
            let Some(pdf_url) = oa.pdf_url().filter(|_| oa.is_oa) else {
                continue;
            };

            self.pdf_store.fetch(&doi, pdf_url).await;
            articles.push(Self::bibjson_to_article(bibjson, doi));
        }

        debug!(hits = articles.len(), "DOAJ search complete");
        Ok(articles)
    }
}
