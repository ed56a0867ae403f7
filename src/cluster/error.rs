use thiserror::Error;

/// Clustering failures. Never surfaced to callers; a failed recompute clears
/// the cluster state and the ranker falls back to the whole pool.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("k-means fit failed: {0}")]
    Fit(String),
}
