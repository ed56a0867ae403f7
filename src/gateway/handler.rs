use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{Manifest, ManifestEndpoint, SearchOaRequest, SearchOaResponse};
use crate::gateway::state::AppState;
use crate::search::SearchQuery;
use crate::service::DEFAULT_MAX_RESULTS;

#[instrument(skip(state, request), fields(query = %request.query))]
pub async fn search_oa_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchOaRequest>,
) -> Result<Json<SearchOaResponse>, GatewayError> {
    let query_text = request.query.trim();
    if query_text.is_empty() {
        return Err(GatewayError::InvalidRequest("missing query".to_string()));
    }

    let query = SearchQuery {
        query: query_text.to_string(),
        kind: request.kind.unwrap_or_else(|| "all".to_string()),
        year_from: request.year_from,
        year_to: request.year_to,
    };
    let max_results = request.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

    let results = state.service.handle_search(&query, max_results).await;
    info!(results = results.len(), "search request served");

    Ok(Json(SearchOaResponse { results }))
}

/// Serves a stored PDF. The path segment is the sanitized DOI (slashes
/// replaced with underscores), matching the `pdf_url` the adapters return.
#[instrument(skip(state))]
pub async fn article_pdf_handler(
    State(state): State<AppState>,
    Path(doi): Path<String>,
) -> Result<Response, GatewayError> {
    let Some(bytes) = state.pdf_store.load_bytes(&doi) else {
        return Err(GatewayError::PdfNotFound(doi));
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        bytes,
    )
        .into_response())
}

#[instrument]
pub async fn manifest_handler() -> Json<Manifest> {
    Json(Manifest {
        name: "OA Verified Discovery",
        description: "Search OA articles, serve PDFs, analyze references, suggest related OA articles",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![ManifestEndpoint {
            name: "search_oa",
            description: "Search OA content with PDF retrieval and semantic analysis",
            input_schema: "/schemas/search_oa.json",
            output_schema: "/schemas/search_oa.json",
        }],
    })
}
