//! Answer pipeline orchestrator.
//!
//! The [`AnswerPipeline`] runs the three request-time steps in order:
//! retrieve the closest chunks, compose the prompt, ask the language model.
//!
//! # Example
//!
//! ```rust,ignore
//! use medibot_rag::{AnswerConfig, AnswerPipeline, InMemoryVectorStore};
//!
//! let pipeline = AnswerPipeline::builder()
//!     .config(AnswerConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new(384)))
//!     .language_model(Arc::new(my_llm))
//!     .build()?;
//!
//! let answer = pipeline.answer("What is paracetamol used for?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::config::AnswerConfig;
use crate::document::Answer;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::llm::LanguageModel;
use crate::prompt::compose;
use crate::retriever::Retriever;
use crate::vectorstore::VectorStore;

/// The answer pipeline: retrieve → compose → complete.
///
/// Construct one via [`AnswerPipeline::builder()`]. All collaborators are
/// shared read-only handles, so one pipeline serves every request.
pub struct AnswerPipeline {
    config: AnswerConfig,
    retriever: Retriever,
    language_model: Arc<dyn LanguageModel>,
}

impl AnswerPipeline {
    /// Create a new [`AnswerPipelineBuilder`].
    pub fn builder() -> AnswerPipelineBuilder {
        AnswerPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &AnswerConfig {
        &self.config
    }

    /// Return a reference to the retriever.
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer a question using the retrieved context.
    ///
    /// A question with no matching chunks is still answered, with an empty
    /// context. Nothing is retried and no partial answer is produced.
    ///
    /// # Errors
    ///
    /// Returns the embedding, vector store or LLM error of the first step
    /// that fails.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        // 1. Retrieve
        let results = self.retriever.retrieve(question).await?;

        // 2. Compose
        let texts: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
        let prompt = compose(question, &texts);

        // 3. Complete
        let settings = self.config.generation_settings();
        let text = self.language_model.complete(&prompt, &settings).await.inspect_err(|e| {
            error!(model = self.language_model.name(), error = %e, "completion failed");
        })?;

        info!(
            model = self.language_model.name(),
            context_chunks = results.len(),
            answer_len = text.len(),
            "answer completed"
        );

        Ok(Answer { text })
    }
}

/// Builder for constructing an [`AnswerPipeline`].
///
/// `config` defaults to [`AnswerConfig::default()`]; the three collaborators
/// are required.
#[derive(Default)]
pub struct AnswerPipelineBuilder {
    config: Option<AnswerConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    language_model: Option<Arc<dyn LanguageModel>>,
}

impl AnswerPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: AnswerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the language model.
    pub fn language_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.language_model = Some(model);
        self
    }

    /// Build the [`AnswerPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing or
    /// the configuration fails [`AnswerConfig::validate`].
    pub fn build(self) -> Result<AnswerPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let language_model = self
            .language_model
            .ok_or_else(|| RagError::ConfigError("language_model is required".to_string()))?;

        let retriever = Retriever::new(embedding_provider, vector_store, config.top_k);
        Ok(AnswerPipeline { config, retriever, language_model })
    }
}
