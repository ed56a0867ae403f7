//! Discovery service: the coordinating component that owns the candidate
//! pool and cluster state.
//!
//! Sequencing is explicit here: pool update happens-before cluster recompute,
//! which happens-before analysis/ranking for the same request. Concurrent
//! requests still share the pool and may observe each other's growth; that
//! eventual consistency is accepted by design.


use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::analysis::{AnalyzedArticle, ArticleAnalyzer};
use crate::cluster::ClusterEngine;
use crate::pool::{Article, CandidatePool};
use crate::search::{SearchAdapter, SearchQuery};

/// Default cap on articles returned per search request.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Default background cluster-refresh interval (30 minutes).
pub const DEFAULT_CLUSTER_REFRESH_SECS: u64 = 30 * 60;

/// Coordinates search fan-out, pool growth, clustering, and analysis.
pub struct DiscoveryService {
    adapters: Vec<Arc<dyn SearchAdapter>>,
    pool: Arc<CandidatePool>,
    clusters: Arc<ClusterEngine>,
    analyzer: ArticleAnalyzer,
}

impl DiscoveryService {
    pub fn new(
        adapters: Vec<Arc<dyn SearchAdapter>>,
        pool: Arc<CandidatePool>,
        clusters: Arc<ClusterEngine>,
        analyzer: ArticleAnalyzer,
    ) -> Self {
        Self {
            adapters,
            pool,
            clusters,
            analyzer,
        }
    }

    pub fn pool(&self) -> &Arc<CandidatePool> {
        &self.pool
    }

    /// Runs one search request end to end.
    ///
    /// All adapters run concurrently; one adapter failing only loses that
    /// adapter's results. After the pool grows, clusters are recomputed
    /// synchronously so this request's ranking sees its own candidates.
    pub async fn handle_search(
        &self,
        query: &SearchQuery,
        max_results: usize,
    ) -> Vec<AnalyzedArticle> {
        let searches = self.adapters.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            let query = query.clone();
            async move { (adapter.name(), adapter.search(&query).await) }
        });

        let mut merged = Vec::new();
        for (name, outcome) in join_all(searches).await {
            match outcome {
                Ok(mut articles) => {
                    debug!(adapter = name, hits = articles.len(), "adapter finished");
                    merged.append(&mut articles);
                }
                Err(e) => warn!(adapter = name, error = %e, "search adapter failed"),
            }
        }

        self.pool.add_candidates(&merged);
        self.clusters.recompute().await;

        let deduped = dedup_by_doi(merged, max_results);
        info!(
            query = %query.query,
            results = deduped.len(),
            pool_size = self.pool.len(),
            "search complete, analyzing"
        );

        self.analyzer.analyze(deduped).await
    }

    /// Spawns the periodic background cluster refresh.
    ///
    /// Runs for the life of the process; each tick recomputes clusters if
    /// the pool is non-empty, independent of request activity.
    pub fn spawn_cluster_refresh(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            // The first tick fires immediately; skip it so the refresh only
            // runs after one full interval.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if service.pool.is_empty() {
                    continue;
                }
                debug!("recomputing semantic clusters in background");
                service.clusters.recompute().await;
            }
        })
    }
}

/// First-occurrence-wins dedup by lowercased DOI, capped at `max_results`.
fn dedup_by_doi(articles: Vec<Article>, max_results: usize) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::new();
    for article in articles {
        let key = article.doi_key();
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        deduped.push(article);
        if deduped.len() == max_results {
            break;
        }
    }
    deduped
}
