//! Pinecone vector store backend.
//!
//! Provides [`PineconeVectorStore`], a read-only [`VectorStore`] over an
//! existing Pinecone index, talking to the REST data plane with `reqwest`.
//!
//! # Example
//!
//! ```rust,ignore
//! use medibot_rag::pinecone::PineconeVectorStore;
//!
//! let store = PineconeVectorStore::connect(api_key, "medicalbot").await?;
//! let results = store.search(&query_embedding, 3).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The Pinecone control plane, used to resolve an index name to its host.
pub const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

/// The REST API version sent with every request.
const API_VERSION: &str = "2025-01";

/// Metadata key holding the chunk text, as written by the indexing job.
const TEXT_KEY: &str = "text";

/// A [`VectorStore`] backed by an existing [Pinecone](https://www.pinecone.io/) index.
///
/// Metadata values other than strings (page numbers, flags) are rendered to
/// strings when copied into [`Chunk::metadata`].
pub struct PineconeVectorStore {
    client: reqwest::Client,
    api_key: String,
    host: String,
    namespace: Option<String>,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<ScoredVector>,
}

#[derive(Deserialize)]
struct ScoredVector {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

impl PineconeVectorStore {
    /// Create a store for an index whose data-plane host is already known.
    ///
    /// `host` may be given with or without a scheme; `https://` is assumed
    /// when none is present.
    pub fn with_host(api_key: impl Into<String>, host: impl AsRef<str>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Self::err("API key must not be empty"));
        }
        let host = host.as_ref().trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(Self::err("index host must not be empty"));
        }
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };

        Ok(Self { client: reqwest::Client::new(), api_key, host, namespace: None })
    }

    /// Resolve `index_name` through the Pinecone control plane and connect to it.
    pub async fn connect(api_key: impl Into<String>, index_name: &str) -> Result<Self> {
        Self::connect_via(CONTROL_PLANE_URL, api_key, index_name).await
    }

    /// Like [`connect`](Self::connect), against an explicit control-plane URL.
    pub async fn connect_via(
        control_plane: &str,
        api_key: impl Into<String>,
        index_name: &str,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Self::err("API key must not be empty"));
        }

        let url = format!("{}/indexes/{index_name}", control_plane.trim_end_matches('/'));
        debug!(backend = "pinecone", index = index_name, "resolving index host");

        let response = reqwest::Client::new()
            .get(&url)
            .header("Api-Key", &api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| {
                error!(backend = "pinecone", error = %e, "describe index request failed");
                Self::err(format!("request failed: {e}"))
            })?;
        let response = Self::check_response(response).await?;

        let described: DescribeIndexResponse = response
            .json()
            .await
            .map_err(|e| Self::err(format!("failed to parse describe_index response: {e}")))?;

        info!(backend = "pinecone", index = index_name, host = %described.host, "resolved index host");
        Self::with_host(api_key, described.host)
    }

    /// Query a specific namespace instead of the index's default one.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// The data-plane base URL this store queries.
    pub fn host(&self) -> &str {
        &self.host
    }

    fn err(message: impl Into<String>) -> RagError {
        RagError::VectorStoreError { backend: "pinecone".to_string(), message: message.into() }
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!(backend = "pinecone", %status, "API error");
        Err(Self::err(format!("API returned {status}: {body}")))
    }

    fn metadata_to_string(value: Value) -> String {
        match value {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    fn into_search_result(scored: ScoredVector) -> SearchResult {
        let mut metadata = scored.metadata.unwrap_or_default();
        let text = metadata.remove(TEXT_KEY).map(Self::metadata_to_string).unwrap_or_default();
        let metadata: HashMap<String, String> =
            metadata.into_iter().map(|(k, v)| (k, Self::metadata_to_string(v))).collect();

        SearchResult {
            chunk: Chunk { id: scored.id, text, embedding: vec![], metadata },
            score: scored.score,
        }
    }
}

#[async_trait]
impl VectorStore for PineconeVectorStore {
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let request = QueryRequest {
            vector: embedding,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(backend = "pinecone", error = %e, "query request failed");
                Self::err(format!("request failed: {e}"))
            })?;
        let response = Self::check_response(response).await?;

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Self::err(format!("failed to parse query response: {e}")))?;

        let mut results: Vec<SearchResult> =
            parsed.matches.into_iter().map(Self::into_search_result).collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        debug!(backend = "pinecone", count = results.len(), "query completed");
        Ok(results)
    }
}
