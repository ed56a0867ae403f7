use std::sync::Arc;

use tempfile::TempDir;

use super::{DEFAULT_TOP_N, RelatedRanker, SIMILARITY_FLOOR, cosine_similarity};
use crate::cache::CacheStore;
use crate::cluster::{ClusterAssignment, ClusterEngine, ClusterState};
use crate::embedding::{CachedEmbedder, MockEmbedder};
use crate::oa::{MockOaLookup, OaVerifier};
use crate::pool::{Article, CandidatePool};

mod cosine_tests {
    use super::*;

    #[test]
    fn test_symmetric() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![-0.5, 0.25, 4.0];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_self_similarity_is_one() {
        let a = vec![0.3, -1.2, 0.7, 2.5];
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_is_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_opposite_is_minus_one() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_length_mismatch_is_floor() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), SIMILARITY_FLOOR);
    }

    #[test]
    fn test_empty_is_floor() {
        assert_eq!(cosine_similarity(&[], &[]), SIMILARITY_FLOOR);
    }

    #[test]
    fn test_zero_magnitude_is_floor() {
        assert_eq!(
            cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]),
            SIMILARITY_FLOOR
        );
    }
}

fn article(doi: &str, abstract_text: &str) -> Article {
    Article {
        title: format!("Title {doi}"),
        authors: String::new(),
        year: Some(2022),
        doi: doi.to_string(),
        source: "OpenAlex".to_string(),
        pdf_url: String::new(),
        abstract_text: abstract_text.to_string(),
    }
}

struct Fixture {
    ranker: RelatedRanker,
    pool: Arc<CandidatePool>,
    clusters: Arc<ClusterEngine>,
    backend: MockEmbedder,
    oa: MockOaLookup,
    _dir: TempDir,
}

fn fixture(dim: usize) -> Fixture {
    let dir = TempDir::new().expect("tempdir");
    let cache = Arc::new(CacheStore::new(dir.path().to_path_buf()));
    let backend = MockEmbedder::new(dim);
    let embedder = Arc::new(CachedEmbedder::new(Arc::new(backend.clone()), cache.clone()));
    let pool = Arc::new(CandidatePool::new());
    let clusters = Arc::new(ClusterEngine::new(pool.clone(), embedder.clone()));
    let oa = MockOaLookup::new();
    let verifier = Arc::new(OaVerifier::new(Arc::new(oa.clone()), cache));
    let ranker = RelatedRanker::new(pool.clone(), clusters.clone(), embedder, verifier);

    Fixture {
        ranker,
        pool,
        clusters,
        backend,
        oa,
        _dir: dir,
    }
}

/// Pool = A([1,0]), B([1,0]), C([0,1]); query [1,0]; exclude A.
fn three_article_fixture() -> Fixture {
    let f = fixture(2);
    f.backend.insert("abstract a", vec![1.0, 0.0]);
    f.backend.insert("abstract b", vec![1.0, 0.0]);
    f.backend.insert("abstract c", vec![0.0, 1.0]);
    f.backend.insert("query document", vec![1.0, 0.0]);
    f.pool.add_candidates(&[
        article("10.1/d1", "abstract a"),
        article("10.1/d2", "abstract b"),
        article("10.1/d3", "abstract c"),
    ]);
    for doi in ["10.1/d1", "10.1/d2", "10.1/d3"] {
        f.oa
            .insert_oa(doi, &format!("https://example.org/{}.pdf", doi.replace('/', "_")));
    }
    f
}

#[tokio::test]
async fn test_rank_orders_by_descending_similarity() {
    let f = three_article_fixture();

    let ranked = f
        .ranker
        .rank("query document", Some("10.1/d1"), DEFAULT_TOP_N)
        .await;

    let dois: Vec<&str> = ranked.iter().map(|r| r.doi.as_str()).collect();
    assert_eq!(dois, vec!["10.1/d2", "10.1/d3"]);
}

#[tokio::test]
async fn test_rank_never_returns_excluded_doi() {
    let f = three_article_fixture();

    let ranked = f
        .ranker
        .rank("query document", Some("10.1/d1"), DEFAULT_TOP_N)
        .await;
    assert!(ranked.iter().all(|r| r.doi != "10.1/d1"));

    // Also when the exclusion is cased differently.
    let ranked = f
        .ranker
        .rank("query document", Some("10.1/D1"), DEFAULT_TOP_N)
        .await;
    assert!(ranked.iter().all(|r| !r.doi.eq_ignore_ascii_case("10.1/d1")));
}

#[tokio::test]
async fn test_unobtainable_main_vector_returns_empty() {
    let f = fixture(2);
    f.pool.add_candidates(&[article("10.1/d1", "abstract a")]);

    // No vector registered for the document text.
    let ranked = f.ranker.rank("unseen document", None, DEFAULT_TOP_N).await;
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn test_unreachable_oa_verifier_returns_empty_not_error() {
    let f = three_article_fixture();
    f.oa.fail_all();

    let ranked = f
        .ranker
        .rank("query document", Some("10.1/d1"), DEFAULT_TOP_N)
        .await;
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn test_candidates_without_abstract_or_cached_vector_are_skipped() {
    let f = three_article_fixture();
    // A fourth article with no abstract: never scored, even though its title
    // would embed fine in the clustering path.
    f.backend.insert("Title 10.1/d4", vec![1.0, 0.0]);
    f.pool.add_candidates(&[article("10.1/d4", "")]);
    f.oa.insert_oa("10.1/d4", "https://example.org/d4.pdf");

    let ranked = f
        .ranker
        .rank("query document", Some("10.1/d1"), DEFAULT_TOP_N)
        .await;
    assert!(ranked.iter().all(|r| r.doi != "10.1/d4"));
}

#[tokio::test]
async fn test_top_n_window_is_fixed_before_oa_filter() {
    let f = fixture(2);
    f.backend.insert("query document", vec![1.0, 0.0]);
    for (i, sim_x) in [(1, 1.0f32), (2, 0.9), (3, 0.8)] {
        let text = format!("abstract {i}");
        f.backend.insert(&text, vec![sim_x, (1.0 - sim_x * sim_x).sqrt()]);
        f.pool.add_candidates(&[article(&format!("10.1/d{i}"), &text)]);
    }
    // Only the best-scoring candidate is OA; the runner-up in the window
    // fails verification and the third never enters the window.
    f.oa.insert_oa("10.1/d1", "https://example.org/d1.pdf");
    f.oa.insert_oa("10.1/d3", "https://example.org/d3.pdf");

    let ranked = f.ranker.rank("query document", None, 2).await;

    let dois: Vec<&str> = ranked.iter().map(|r| r.doi.as_str()).collect();
    assert_eq!(dois, vec!["10.1/d1"]);
}

#[tokio::test]
async fn test_cluster_narrowing_prefers_nearest_centroid() {
    let f = three_article_fixture();

    // Hand-built state: d2 alone in cluster 0 near the query, d3 in cluster 1.
    f.clusters.set_state(ClusterState {
        assignments: vec![
            ClusterAssignment {
                cluster: 0,
                article: article("10.1/d2", "abstract b"),
            },
            ClusterAssignment {
                cluster: 1,
                article: article("10.1/d3", "abstract c"),
            },
        ],
        centroids: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
    });

    let ranked = f
        .ranker
        .rank("query document", Some("10.1/d1"), DEFAULT_TOP_N)
        .await;

    let dois: Vec<&str> = ranked.iter().map(|r| r.doi.as_str()).collect();
    assert_eq!(dois, vec!["10.1/d2"]);
}

#[tokio::test]
async fn test_centroid_tie_breaks_to_lowest_index() {
    let f = three_article_fixture();

    // Two identical centroids: the lower index must win, so only cluster 0's
    // member is ranked.
    f.clusters.set_state(ClusterState {
        assignments: vec![
            ClusterAssignment {
                cluster: 0,
                article: article("10.1/d2", "abstract b"),
            },
            ClusterAssignment {
                cluster: 1,
                article: article("10.1/d3", "abstract c"),
            },
        ],
        centroids: vec![vec![1.0, 0.0], vec![1.0, 0.0]],
    });

    let ranked = f
        .ranker
        .rank("query document", Some("10.1/d1"), DEFAULT_TOP_N)
        .await;

    let dois: Vec<&str> = ranked.iter().map(|r| r.doi.as_str()).collect();
    assert_eq!(dois, vec!["10.1/d2"]);
}

#[tokio::test]
async fn test_empty_cluster_falls_back_to_whole_pool() {
    let f = three_article_fixture();

    // The nearest cluster contains only the excluded article.
    f.clusters.set_state(ClusterState {
        assignments: vec![ClusterAssignment {
            cluster: 0,
            article: article("10.1/d1", "abstract a"),
        }],
        centroids: vec![vec![1.0, 0.0]],
    });

    let ranked = f
        .ranker
        .rank("query document", Some("10.1/d1"), DEFAULT_TOP_N)
        .await;

    let dois: Vec<&str> = ranked.iter().map(|r| r.doi.as_str()).collect();
    assert_eq!(dois, vec!["10.1/d2", "10.1/d3"]);
}
