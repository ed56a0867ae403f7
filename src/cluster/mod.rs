//! Topic clustering over the candidate pool.
//!
//! [`ClusterEngine::recompute`] rebuilds assignments and centroids from
//! scratch on every call. This is O(full recompute) by design: pool sizes are
//! small (k is capped at [`MAX_CLUSTERS`]) and an incremental scheme is not
//! worth the bookkeeping.

mod error;


pub use error::ClusterError;

use std::sync::Arc;

use linfa::DatasetBase;
use linfa::dataset::AsTargets;
use linfa::traits::{Fit, Predict};
use linfa_clustering::KMeans;
use ndarray::{Array2, Axis};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::embedding::CachedEmbedder;
use crate::pool::{Article, CandidatePool};

/// Pools smaller than this skip clustering and clear any prior state.
pub const MIN_POOL_FOR_CLUSTERING: usize = 2;

/// Upper bound on the cluster count.
pub const MAX_CLUSTERS: usize = 5;

const KMEANS_MAX_ITERATIONS: u64 = 100;

const KMEANS_TOLERANCE: f64 = 1e-4;

/// Adaptive cluster count: `clamp(floor(sqrt(n / 2)), 1, MAX_CLUSTERS)`.
pub fn cluster_count(pool_size: usize) -> usize {
    ((pool_size as f64 / 2.0).sqrt().floor() as usize).clamp(1, MAX_CLUSTERS)
}

/// One article's cluster membership from the latest recompute.
#[derive(Debug, Clone)]
pub struct ClusterAssignment {
    pub cluster: usize,
    pub article: Article,
}

/// Snapshot of cluster assignments and centroids.
///
/// Invariant: every `assignments[i].cluster` indexes into `centroids`.
#[derive(Debug, Clone, Default)]
pub struct ClusterState {
    pub assignments: Vec<ClusterAssignment>,
    pub centroids: Vec<Vec<f32>>,
}

impl ClusterState {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.centroids.is_empty()
    }

    /// Articles assigned to `cluster`, excluding an optional DOI.
    pub fn members_of(&self, cluster: usize, exclude_doi: Option<&str>) -> Vec<Article> {
        self.assignments
            .iter()
            .filter(|a| a.cluster == cluster && !a.article.doi_matches(exclude_doi))
            .map(|a| a.article.clone())
            .collect()
    }
}

/// Recomputes k-means topic clusters from the current pool snapshot.
pub struct ClusterEngine {
    pool: Arc<CandidatePool>,
    embedder: Arc<CachedEmbedder>,
    state: RwLock<ClusterState>,
}

impl ClusterEngine {
    pub fn new(pool: Arc<CandidatePool>, embedder: Arc<CachedEmbedder>) -> Self {
        Self {
            pool,
            embedder,
            state: RwLock::new(ClusterState::default()),
        }
    }

    /// Clones the latest cluster state.
    ///
    /// A recompute may be replacing it concurrently; readers accept a stale
    /// snapshot rather than block.
    pub fn state(&self) -> ClusterState {
        self.state.read().clone()
    }

    #[cfg(any(test, feature = "mock"))]
    pub fn set_state(&self, state: ClusterState) {
        *self.state.write() = state;
    }

    /// Fully rebuilds assignments and centroids from the current pool.
    ///
    /// Embedding failures degrade to zero vectors for the affected articles;
    /// a k-means failure clears the state, which downgrades the ranker to
    /// pool-wide fallback ranking.
    pub async fn recompute(&self) {
        let articles = self.pool.snapshot();

        if articles.len() < MIN_POOL_FOR_CLUSTERING {
            debug!(
                pool_size = articles.len(),
                "pool below clustering floor, clearing cluster state"
            );
            *self.state.write() = ClusterState::default();
            return;
        }

        let dim = self.embedder.dimension();
        let mut embeddings = Vec::with_capacity(articles.len());
        for article in &articles {
            let text = if article.abstract_text.trim().is_empty() {
                &article.title
            } else {
                &article.abstract_text
            };
            let vector = self
                .embedder
                .embed_for(Some(&article.doi), Some(text))
                .await
                .filter(|v| v.len() == dim);
            // Zero-vector substitution keeps the input set rectangular.
            embeddings.push(vector.unwrap_or_else(|| vec![0.0; dim]));
        }

        let k = cluster_count(articles.len());

        match run_kmeans(&embeddings, k, dim) {
            Ok((labels, centroids)) => {
                let assignments = labels
                    .into_iter()
                    .zip(articles)
                    .map(|(cluster, article)| ClusterAssignment { cluster, article })
                    .collect();
                *self.state.write() = ClusterState {
                    assignments,
                    centroids,
                };
                info!(clusters = k, "semantic clusters rebuilt");
            }
            Err(e) => {
                warn!(error = %e, "clustering failed, clearing cluster state");
                *self.state.write() = ClusterState::default();
            }
        }
    }
}

fn run_kmeans(
    embeddings: &[Vec<f32>],
    k: usize,
    dim: usize,
) -> Result<(Vec<usize>, Vec<Vec<f32>>), ClusterError> {
    let mut data = Array2::<f64>::zeros((embeddings.len(), dim));
    for (i, embedding) in embeddings.iter().enumerate() {
        for (j, &value) in embedding.iter().enumerate() {
            data[[i, j]] = value as f64;
        }
    }

    let dataset = DatasetBase::from(data);

    let model = KMeans::params(k)
        .max_n_iterations(KMEANS_MAX_ITERATIONS)
        .tolerance(KMEANS_TOLERANCE)
        .fit(&dataset)
        .map_err(|e| ClusterError::Fit(format!("{e:?}")))?;

    let predictions = model.predict(&dataset);
    let labels: Vec<usize> = predictions.as_targets().iter().copied().collect();

    let centroids = model
        .centroids()
        .axis_iter(Axis(0))
        .map(|row| row.iter().map(|&v| v as f32).collect())
        .collect();

    Ok((labels, centroids))
}
