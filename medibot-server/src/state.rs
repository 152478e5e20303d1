//! Application context shared by all request handlers.

use std::sync::Arc;

use medibot_rag::{
    AnswerPipeline, GeminiClient, HuggingFaceEmbeddingProvider, PineconeVectorStore,
    Result as RagResult,
};
use tracing::info;

use crate::config::Config;

/// Handles built once at start-up and shared read-only for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnswerPipeline>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(pipeline: AnswerPipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }

    /// Build the Hugging Face embedder, Pinecone store and Gemini client
    /// described by `config`.
    ///
    /// When no index host is configured it is resolved through the Pinecone
    /// control plane, so an unknown index fails here rather than on the first
    /// request.
    pub async fn from_config(config: &Config) -> RagResult<Self> {
        let mut embedder = HuggingFaceEmbeddingProvider::new(config.hf_token.clone());
        if let Some(endpoint) = &config.embedding_endpoint {
            embedder = embedder.with_endpoint(endpoint);
        }

        let mut store = match &config.pinecone_index_host {
            Some(host) => PineconeVectorStore::with_host(&config.pinecone_api_key, host)?,
            None => {
                PineconeVectorStore::connect(&config.pinecone_api_key, &config.pinecone_index_name)
                    .await?
            }
        };
        if let Some(namespace) = &config.pinecone_namespace {
            store = store.with_namespace(namespace);
        }

        let llm = GeminiClient::new(&config.gemini_api_key, &config.answer.model)?;

        let host = store.host().to_string();
        let pipeline = AnswerPipeline::builder()
            .config(config.answer.clone())
            .embedding_provider(Arc::new(embedder))
            .vector_store(Arc::new(store))
            .language_model(Arc::new(llm))
            .build()?;

        let answer = pipeline.config();
        info!(
            index = %config.pinecone_index_name,
            %host,
            model = %answer.model,
            top_k = answer.top_k,
            temperature = answer.temperature,
            max_output_tokens = answer.max_output_tokens,
            "answer pipeline initialized"
        );

        Ok(Self::new(pipeline))
    }
}
