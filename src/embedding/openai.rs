//! OpenAI embeddings backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::EmbeddingError;
use super::{EMBEDDING_DIM, EMBEDDING_MODEL, EmbeddingBackend};

/// Default API base used when no override is configured.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Remote embedding generation via `POST /v1/embeddings`.
///
/// When constructed without an API key every call fails with
/// [`EmbeddingError::MissingApiKey`]; the pipeline degrades to zero-vector
/// clustering and empty related-article lists instead of refusing to start.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_base: OPENAI_API_BASE.to_string(),
            api_key,
            model: EMBEDDING_MODEL.to_string(),
            dimension: EMBEDDING_DIM,
        }
    }

    /// Overrides the API base URL (tests point this at a local server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        let api_key = self.api_key.as_deref().ok_or(EmbeddingError::MissingApiKey)?;

        let resp = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(EmbeddingError::Status {
                code: resp.status(),
            });
        }

        let body: EmbeddingResponse = resp.json().await?;
        Ok(body.data.into_iter().next().map(|d| d.embedding))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
