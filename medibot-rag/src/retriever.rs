//! Top-k retrieval: embed the question, then query the vector store.

use std::sync::Arc;

use tracing::{debug, error};

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// Issues a similarity query for each question. Every call re-embeds and
/// re-queries; there is no cache.
#[derive(Clone)]
pub struct Retriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        top_k: usize,
    ) -> Self {
        Self { embedding_provider, vector_store, top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Return at most `top_k` chunks ordered by descending similarity.
    ///
    /// # Errors
    ///
    /// Propagates the embedding or vector store error unchanged.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        let embedding = self.embedding_provider.embed(question).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during retrieval");
        })?;

        let mut results =
            self.vector_store.search(&embedding, self.top_k).await.inspect_err(|e| {
                error!(error = %e, "vector store search failed");
            })?;

        // Ranked and bounded here even if a backend is not.
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(self.top_k);

        debug!(result_count = results.len(), "retrieval completed");
        Ok(results)
    }
}
