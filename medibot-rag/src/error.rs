//! Error types for the `medibot-rag` crate.

use thiserror::Error;

/// Errors that can occur while answering a question.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred while generating a completion.
    #[error("LLM error ({provider}): {message}")]
    LlmError {
        /// The language model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RagError {
    /// Whether this error was raised by one of the external services
    /// (embedding provider, vector index or language model).
    pub fn is_service_unavailable(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingError { .. } | Self::VectorStoreError { .. } | Self::LlmError { .. }
        )
    }
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
