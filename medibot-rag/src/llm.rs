//! Language model trait for prompt completion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::Prompt;
use crate::error::Result;

/// Sampling parameters applied to a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// A hosted language model that turns a [`Prompt`] into answer text.
///
/// # Example
///
/// ```rust,ignore
/// use medibot_rag::{GeminiClient, LanguageModel};
///
/// let llm = GeminiClient::new(api_key, "gemini-1.5-pro")?;
/// let text = llm.complete(&prompt, &settings).await?;
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// The model identifier, used in logs.
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn complete(&self, prompt: &Prompt, settings: &GenerationSettings) -> Result<String>;
}
