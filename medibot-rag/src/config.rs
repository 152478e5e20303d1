//! Configuration for the answer pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::llm::GenerationSettings;

/// Default hosted model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Configuration parameters for the answer pipeline, fixed at process start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerConfig {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// LLM sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Identifier of the hosted model.
    pub model: String,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self { top_k: 3, temperature: 0.4, max_output_tokens: 500, model: DEFAULT_MODEL.to_string() }
    }
}

impl AnswerConfig {
    /// Create a new builder for constructing an [`AnswerConfig`].
    pub fn builder() -> AnswerConfigBuilder {
        AnswerConfigBuilder::default()
    }

    /// The sampling parameters passed to the language model.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// Check that the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `top_k == 0`
    /// - `temperature` is outside `0.0..=2.0`
    /// - `max_output_tokens == 0`
    /// - `model` is blank
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RagError::ConfigError(format!(
                "temperature ({}) must be between 0.0 and 2.0",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(RagError::ConfigError(
                "max_output_tokens must be greater than zero".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(RagError::ConfigError("model must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`AnswerConfig`].
#[derive(Debug, Clone, Default)]
pub struct AnswerConfigBuilder {
    config: AnswerConfig,
}

impl AnswerConfigBuilder {
    /// Set the number of chunks retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the maximum number of generated tokens.
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = tokens;
        self
    }

    /// Set the hosted model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Build the [`AnswerConfig`], validating that parameters are usable.
    ///
    /// # Errors
    ///
    /// See [`AnswerConfig::validate`].
    pub fn build(self) -> Result<AnswerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
