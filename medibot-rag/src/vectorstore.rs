//! Vector store trait for similarity search over a pre-populated index.

use async_trait::async_trait;

use crate::document::SearchResult;
use crate::error::Result;

/// A read-only view of one named collection of embedded [`Chunk`]s.
///
/// Population of the collection happens elsewhere; the service only issues
/// nearest-neighbour queries against it.
///
/// [`Chunk`]: crate::document::Chunk
///
/// # Example
///
/// ```rust,ignore
/// use medibot_rag::{VectorStore, PineconeVectorStore};
///
/// let store = PineconeVectorStore::connect(api_key, "medicalbot").await?;
/// let results = store.search(&query_embedding, 3).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending similarity score.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;
}
