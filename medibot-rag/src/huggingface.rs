//! Hugging Face embedding provider using the feature-extraction inference API.
//!
//! The medical index was populated with `sentence-transformers/all-MiniLM-L6-v2`,
//! so queries must be embedded with the same model. The endpoint can point at
//! the hosted inference router or at a self-hosted text-embeddings-inference
//! server exposing the same request shape.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default feature-extraction endpoint for `all-MiniLM-L6-v2`.
pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction";

/// The dimensionality of `all-MiniLM-L6-v2` embeddings.
pub const DEFAULT_DIMENSIONS: usize = 384;

/// An [`EmbeddingProvider`] backed by a Hugging Face feature-extraction endpoint.
///
/// # Configuration
///
/// - `endpoint` – defaults to [`DEFAULT_ENDPOINT`].
/// - `token` – optional access token, sent as a bearer token.
/// - `dimensions` – expected vector length, defaults to [`DEFAULT_DIMENSIONS`].
///   Responses of any other length are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use medibot_rag::huggingface::HuggingFaceEmbeddingProvider;
///
/// let provider = HuggingFaceEmbeddingProvider::new(Some("hf_...".into()));
/// let embedding = provider.embed("symptoms of anemia").await?;
/// ```
pub struct HuggingFaceEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    dimensions: usize,
}

impl HuggingFaceEmbeddingProvider {
    /// Create a provider for the default endpoint.
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            dimensions: DEFAULT_DIMENSIONS,
        }
    }

    /// Point the provider at a different feature-extraction endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the expected embedding dimensionality.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self
    }

    fn err(message: impl Into<String>) -> RagError {
        RagError::EmbeddingError { provider: "HuggingFace".into(), message: message.into() }
    }
}

// ── Inference API request/response types ───────────────────────────

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
}

/// Sentence-transformer pipelines return a pooled vector; raw token
/// pipelines return one row per input.
#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Pooled(Vec<f32>),
    Rows(Vec<Vec<f32>>),
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "HuggingFace", text_len = text.len(), "embedding single text");

        let mut request =
            self.client.post(&self.endpoint).json(&FeatureExtractionRequest { inputs: text });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = "HuggingFace", error = %e, "request failed");
            Self::err(format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);

            error!(provider = "HuggingFace", %status, "API error");
            return Err(Self::err(format!("API returned {status}: {detail}")));
        }

        let parsed: FeatureExtractionResponse = response.json().await.map_err(|e| {
            error!(provider = "HuggingFace", error = %e, "failed to parse response");
            Self::err(format!("failed to parse response: {e}"))
        })?;

        let embedding = match parsed {
            FeatureExtractionResponse::Pooled(values) => values,
            FeatureExtractionResponse::Rows(rows) => rows
                .into_iter()
                .next()
                .ok_or_else(|| Self::err("API returned empty response"))?,
        };

        if embedding.len() != self.dimensions {
            return Err(Self::err(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
