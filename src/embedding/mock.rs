//! Mock embedding backend for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::EmbeddingError;
use super::EmbeddingBackend;

/// In-memory [`EmbeddingBackend`] mapping exact texts to fixed vectors.
///
/// Texts without a registered vector yield `Ok(None)`, mirroring a provider
/// that produced no embedding.
#[derive(Clone)]
pub struct MockEmbedder {
    vectors: Arc<RwLock<HashMap<String, Vec<f32>>>>,
    dimension: usize,
    calls: Arc<AtomicUsize>,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: Arc::new(RwLock::new(HashMap::new())),
            dimension,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn insert(&self, text: &str, vector: Vec<f32>) {
        self.vectors.write().insert(text.to_string(), vector);
    }

    /// Number of embed calls that reached the backend (cache hits do not).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vectors.read().get(text).cloned())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
