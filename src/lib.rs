//! OA discovery library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Article`], [`CandidatePool`] - Shared candidate pool
//! - [`CacheStore`] - File-backed JSON cache
//!
//! ## Semantic Engine
//! - [`CachedEmbedder`], [`OpenAiEmbedder`] - Embedding generation with cache memoization
//! - [`ClusterEngine`], [`ClusterState`] - Topic clustering over the candidate pool
//! - [`RelatedRanker`], [`cosine_similarity`] - Nearest-cluster related-article ranking
//!
//! ## Upstream Clients
//! - [`OaVerifier`], [`UnpaywallClient`] - Cached open-access verification
//! - [`OpenAlexAdapter`], [`DoajAdapter`] - Search adapters
//! - [`PdfStore`] - Local PDF retrieval and reference extraction
//!
//! ## Pipeline
//! - [`DiscoveryService`] - Pool growth, recompute, analysis sequencing
//! - [`ArticleAnalyzer`], [`AnalyzedArticle`] - Per-article reference/related analysis
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analysis;
pub mod cache;
pub mod cluster;
pub mod config;
pub mod embedding;
pub mod gateway;
pub mod oa;
pub mod pdf;
pub mod pool;
pub mod scoring;
pub mod search;
pub mod service;

pub use analysis::{AnalyzedArticle, ArticleAnalyzer};
pub use cache::{CacheStore, sanitize_key};
pub use cluster::{
    ClusterAssignment, ClusterEngine, ClusterError, ClusterState, MAX_CLUSTERS,
    MIN_POOL_FOR_CLUSTERING, cluster_count,
};
pub use config::{Config, ConfigError};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    ANON_EMBEDDING_KEY, CachedEmbedder, EMBEDDING_DIM, EMBEDDING_MODEL, EmbeddingBackend,
    EmbeddingError, OpenAiEmbedder,
};
#[cfg(any(test, feature = "mock"))]
pub use oa::MockOaLookup;
pub use oa::{OaError, OaLocation, OaLookup, OaStatus, OaVerifier, UnpaywallClient};
pub use pdf::{PdfError, PdfStore, extract_reference_dois};
pub use pool::{Article, CandidatePool};
pub use scoring::{DEFAULT_TOP_N, RelatedArticle, RelatedRanker, cosine_similarity};
#[cfg(any(test, feature = "mock"))]
pub use search::MockSearchAdapter;
pub use search::{DoajAdapter, OpenAlexAdapter, SearchAdapter, SearchError, SearchQuery};
pub use service::{DEFAULT_CLUSTER_REFRESH_SECS, DEFAULT_MAX_RESULTS, DiscoveryService};
