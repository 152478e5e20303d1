//! # medibot-rag
//!
//! Retrieval-augmented answering for the medibot chat service.
//!
//! A question is embedded, the closest chunks are fetched from a
//! pre-populated vector index, and the chunks plus the question are handed to
//! a hosted language model. The external services sit behind three traits:
//!
//! - [`EmbeddingProvider`], implemented by [`HuggingFaceEmbeddingProvider`]
//! - [`VectorStore`], implemented by [`PineconeVectorStore`] and [`InMemoryVectorStore`]
//! - [`LanguageModel`], implemented by [`GeminiClient`]
//!
//! [`AnswerPipeline`] sequences them.

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod gemini;
pub mod huggingface;
pub mod inmemory;
pub mod llm;
pub mod pinecone;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod vectorstore;

pub use config::{AnswerConfig, AnswerConfigBuilder};
pub use document::{Answer, Chunk, Prompt, Query, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use gemini::GeminiClient;
pub use huggingface::HuggingFaceEmbeddingProvider;
pub use inmemory::InMemoryVectorStore;
pub use llm::{GenerationSettings, LanguageModel};
pub use pinecone::PineconeVectorStore;
pub use pipeline::{AnswerPipeline, AnswerPipelineBuilder};
pub use prompt::compose;
pub use retriever::Retriever;
pub use vectorstore::VectorStore;
