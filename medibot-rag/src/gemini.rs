//! Gemini language model client over the `generateContent` REST endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::document::Prompt;
use crate::error::{RagError, Result};
use crate::llm::{GenerationSettings, LanguageModel};

/// The default Generative Language API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// A [`LanguageModel`] backed by the Gemini API.
///
/// The prompt's instruction and retrieved context are sent as the system
/// instruction, the question as a single user turn.
///
/// # Example
///
/// ```rust,ignore
/// use medibot_rag::gemini::GeminiClient;
///
/// let client = GeminiClient::new("your-api-key", "gemini-1.5-pro")?;
/// ```
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for `model` using the default base URL.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Self::err("API key must not be empty"));
        }
        let model = model.into();
        // Accept both "gemini-1.5-pro" and "models/gemini-1.5-pro".
        let model = model.strip_prefix("models/").map(str::to_string).unwrap_or(model);
        if model.is_empty() {
            return Err(Self::err("model name must not be empty"));
        }

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self { client: reqwest::Client::new(), api_key, model, base_url })
    }

    fn err(message: impl Into<String>) -> RagError {
        RagError::LlmError { provider: "Gemini".into(), message: message.into() }
    }

    fn endpoint(&self) -> String {
        format!("{}models/{}:generateContent", self.base_url, self.model)
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GenerateContentRequest {
    fn new(prompt: &Prompt, settings: &GenerationSettings) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: Some(prompt.system_text()) }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt.question.clone()) }],
            }],
            generation_config: GenerationConfig {
                temperature: settings.temperature,
                max_output_tokens: settings.max_output_tokens,
            },
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        Some(candidate.content.parts.into_iter().filter_map(|p| p.text).collect())
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, prompt: &Prompt, settings: &GenerationSettings) -> Result<String> {
        let request = GenerateContentRequest::new(prompt, settings);
        debug!(
            temperature = settings.temperature,
            max_output_tokens = settings.max_output_tokens,
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "request failed");
                Self::err(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(%status, "API error");
            return Err(Self::err(format!("API returned {status}: {detail}")));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse response");
            Self::err(format!("failed to parse response: {e}"))
        })?;

        parsed.into_text().ok_or_else(|| Self::err("response contained no candidates"))
    }
}
