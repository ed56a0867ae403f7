//! Request/response payloads for the gateway.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalyzedArticle;

/// Body of `POST /search_oa`.
#[derive(Debug, Deserialize)]
pub struct SearchOaRequest {
    pub query: String,

    /// Requested content type. Defaults to `"all"`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub year_from: Option<i32>,

    #[serde(default)]
    pub year_to: Option<i32>,

    /// Result-window cap. Defaults to the service-wide maximum.
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Body of the `POST /search_oa` response.
#[derive(Debug, Serialize)]
pub struct SearchOaResponse {
    pub results: Vec<AnalyzedArticle>,
}

/// Discovery manifest served at `/.well-known/mcp.json`.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<ManifestEndpoint>,
}

#[derive(Debug, Serialize)]
pub struct ManifestEndpoint {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: &'static str,
    pub output_schema: &'static str,
}
