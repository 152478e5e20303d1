//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. The query embedding must come from the same model that was
/// used to populate the vector index, otherwise similarity scores are
/// meaningless.
///
/// # Example
///
/// ```rust,ignore
/// use medibot_rag::EmbeddingProvider;
///
/// let provider = HuggingFaceEmbeddingProvider::new(None)?;
/// let embedding = provider.embed("what is paracetamol?").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
