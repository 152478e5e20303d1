//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] holds a single collection in a `HashMap` behind a
//! `tokio::sync::RwLock`. It backs the test suite and local runs without a
//! Pinecone account.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// An in-memory vector store using cosine similarity for search.
///
/// # Example
///
/// ```rust,ignore
/// use medibot_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new(384);
/// store.upsert(&chunks).await?;
/// let results = store.search(&query, 3).await?;
/// ```
#[derive(Debug)]
pub struct InMemoryVectorStore {
    dimensions: usize,
    chunks: RwLock<HashMap<String, Chunk>>,
}

impl InMemoryVectorStore {
    /// Create a new empty store accepting embeddings of `dimensions` length.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, chunks: RwLock::new(HashMap::new()) }
    }

    /// Insert or replace chunks by id.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] if a chunk's embedding length
    /// differs from the store's dimensionality.
    pub async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        if let Some(bad) = chunks.iter().find(|c| c.embedding.len() != self.dimensions) {
            return Err(RagError::VectorStoreError {
                backend: "InMemory".to_string(),
                message: format!(
                    "chunk '{}' has {} dimensions, expected {}",
                    bad.id,
                    bad.embedding.len(),
                    self.dimensions
                ),
            });
        }

        let mut store = self.chunks.write().await;
        for chunk in chunks {
            store.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    /// Number of stored chunks.
    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if embedding.len() != self.dimensions {
            return Err(RagError::VectorStoreError {
                backend: "InMemory".to_string(),
                message: format!(
                    "query has {} dimensions, expected {}",
                    embedding.len(),
                    self.dimensions
                ),
            });
        }

        let store = self.chunks.read().await;
        let mut scored: Vec<SearchResult> = store
            .values()
            .map(|chunk| {
                let score = cosine_similarity(&chunk.embedding, embedding);
                SearchResult { chunk: chunk.clone(), score }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}
