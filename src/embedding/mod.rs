//! Text-to-vector embedding with cache memoization.
//!
//! - [`OpenAiEmbedder`] calls the OpenAI embeddings endpoint.
//! - [`CachedEmbedder`] memoizes vectors in the file cache, keyed by the
//!   article identifier.

mod cached;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod openai;

#[cfg(test)]
mod tests;

pub use cached::{ANON_EMBEDDING_KEY, CachedEmbedder};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use openai::OpenAiEmbedder;

use async_trait::async_trait;

/// Dimensionality of the production embedding model.
pub const EMBEDDING_DIM: usize = 1536;

/// Embedding model requested from the provider.
pub const EMBEDDING_MODEL: &str = "text-embedding-3-large";

/// Generates one embedding vector for a text.
///
/// `Ok(None)` means the provider produced no vector for this input; callers
/// treat it the same as an error (no vector, retried next time) but without
/// log noise.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingError>;

    /// Expected vector length, used for zero-vector substitution.
    fn dimension(&self) -> usize;
}
