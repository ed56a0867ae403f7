use std::sync::Arc;

use tempfile::TempDir;

use super::{ANON_EMBEDDING_KEY, CachedEmbedder, MockEmbedder};
use crate::cache::CacheStore;

fn cached_with_mock(dim: usize) -> (CachedEmbedder, MockEmbedder, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let cache = Arc::new(CacheStore::new(dir.path().to_path_buf()));
    let backend = MockEmbedder::new(dim);
    let embedder = CachedEmbedder::new(Arc::new(backend.clone()), cache);
    (embedder, backend, dir)
}

#[tokio::test]
async fn test_empty_text_short_circuits() {
    let (embedder, backend, _dir) = cached_with_mock(2);

    assert!(embedder.embed_for(Some("10.1/a"), None).await.is_none());
    assert!(embedder.embed_for(Some("10.1/a"), Some("")).await.is_none());
    assert!(
        embedder
            .embed_for(Some("10.1/a"), Some("   "))
            .await
            .is_none()
    );
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_miss_generates_and_caches() {
    let (embedder, backend, _dir) = cached_with_mock(2);
    backend.insert("some abstract", vec![0.5, 0.5]);

    let first = embedder
        .embed_for(Some("10.1/a"), Some("some abstract"))
        .await;
    assert_eq!(first, Some(vec![0.5, 0.5]));
    assert_eq!(backend.call_count(), 1);

    // Hit: the backend is not consulted again, even with different text.
    let second = embedder
        .embed_for(Some("10.1/a"), Some("different text"))
        .await;
    assert_eq!(second, Some(vec![0.5, 0.5]));
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_no_vector_is_not_cached() {
    let (embedder, backend, _dir) = cached_with_mock(2);

    assert!(
        embedder
            .embed_for(Some("10.1/a"), Some("unknown text"))
            .await
            .is_none()
    );
    assert!(embedder.cached_vector(Some("10.1/a")).is_none());

    // Registering the vector later makes the retry succeed.
    backend.insert("unknown text", vec![1.0, 0.0]);
    assert_eq!(
        embedder
            .embed_for(Some("10.1/a"), Some("unknown text"))
            .await,
        Some(vec![1.0, 0.0])
    );
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn test_anonymous_key_when_no_id() {
    let (embedder, backend, _dir) = cached_with_mock(2);
    backend.insert("ad-hoc document", vec![0.1, 0.9]);

    let vector = embedder.embed_for(None, Some("ad-hoc document")).await;
    assert_eq!(vector, Some(vec![0.1, 0.9]));
    assert_eq!(
        embedder.cached_vector(Some(ANON_EMBEDDING_KEY)),
        Some(vec![0.1, 0.9])
    );
}

#[tokio::test]
async fn test_doi_slashes_do_not_leak_into_file_names() {
    let (embedder, backend, dir) = cached_with_mock(2);
    backend.insert("text", vec![1.0, 1.0]);

    embedder.embed_for(Some("10.1234/ab/cd"), Some("text")).await;

    assert!(dir.path().join("embedding_10.1234_ab_cd.json").exists());
}
