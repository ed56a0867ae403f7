//! Unpaywall API client.

use async_trait::async_trait;

use super::error::OaError;
use super::{OaLookup, OaStatus};

/// Default Unpaywall API base used when no override is configured.
pub const UNPAYWALL_API_BASE: &str = "https://api.unpaywall.org/v2";

/// Live Unpaywall lookup (`GET /v2/{doi}?email=...`).
#[derive(Debug, Clone)]
pub struct UnpaywallClient {
    client: reqwest::Client,
    base_url: String,
    email: String,
}

impl UnpaywallClient {
    /// Creates a client against the public Unpaywall endpoint.
    ///
    /// Unpaywall requires a contact email on every request.
    pub fn new(client: reqwest::Client, email: impl Into<String>) -> Self {
        Self {
            client,
            base_url: UNPAYWALL_API_BASE.to_string(),
            email: email.into(),
        }
    }

    /// Overrides the API base URL (tests point this at a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_url(&self, doi: &str) -> String {
        format!(
            "{}/{}?email={}",
            self.base_url,
            urlencoding::encode(doi),
            self.email
        )
    }
}

#[async_trait]
impl OaLookup for UnpaywallClient {
    async fn lookup(&self, doi: &str) -> Result<OaStatus, OaError> {
        let resp = self.client.get(self.request_url(doi)).send().await?;

        if !resp.status().is_success() {
            return Err(OaError::Status {
                code: resp.status(),
            });
        }

        Ok(resp.json::<OaStatus>().await?)
    }
}
