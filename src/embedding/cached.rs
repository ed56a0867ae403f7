use std::sync::Arc;

use tracing::warn;

use super::EmbeddingBackend;
use crate::cache::{CacheStore, sanitize_key};

/// Cache-key token used when a document has no DOI.
pub const ANON_EMBEDDING_KEY: &str = "anon";

/// Memoizing wrapper around an [`EmbeddingBackend`].
///
/// Vectors are cached under `embedding_<sanitized id>` where the id is the
/// DOI (or [`ANON_EMBEDDING_KEY`]). A backend failure or empty result is
/// returned as `None` and never cached, so the next call retries.
pub struct CachedEmbedder {
    backend: Arc<dyn EmbeddingBackend>,
    cache: Arc<CacheStore>,
}

impl CachedEmbedder {
    pub fn new(backend: Arc<dyn EmbeddingBackend>, cache: Arc<CacheStore>) -> Self {
        Self { backend, cache }
    }

    /// Expected vector length of the underlying backend.
    pub fn dimension(&self) -> usize {
        self.backend.dimension()
    }

    fn cache_key(id: Option<&str>) -> String {
        let id = match id {
            Some(id) if !id.trim().is_empty() => id.trim(),
            _ => ANON_EMBEDDING_KEY,
        };
        format!("embedding_{}", sanitize_key(id))
    }

    /// Probes the cache for an identifier's vector without generating one.
    pub fn cached_vector(&self, id: Option<&str>) -> Option<Vec<f32>> {
        self.cache.get::<Vec<f32>>(&Self::cache_key(id))
    }

    /// Returns the vector for `(id, text)`, generating and caching on a miss.
    ///
    /// A missing or empty `text` short-circuits to `None` without invoking
    /// the backend. Cache hits ignore `text` entirely.
    pub async fn embed_for(&self, id: Option<&str>, text: Option<&str>) -> Option<Vec<f32>> {
        let key = Self::cache_key(id);
        if let Some(vector) = self.cache.get::<Vec<f32>>(&key) {
            return Some(vector);
        }

        let text = text.map(str::trim).filter(|t| !t.is_empty())?;

        match self.backend.embed(text).await {
            Ok(Some(vector)) => {
                self.cache.put(&key, &vector);
                Some(vector)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "embedding generation failed");
                None
            }
        }
    }
}
