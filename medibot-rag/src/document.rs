//! Data types for chunks, search results, prompts and answers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A stored segment of source text with its vector embedding.
///
/// Chunks are written to the index by an offline process and are never
/// mutated by this service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Backends that do not
    /// return stored vectors leave this empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
    /// Key-value metadata stored alongside the chunk (source file, page, ...).
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// A user question as received by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
}

/// The prompt sent to the language model for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    /// Fixed instruction describing how the model should answer.
    pub system_instruction: String,
    /// Retrieved chunk texts, in rank order, separated by blank lines.
    pub context: String,
    /// The literal user question.
    pub question: String,
}

impl Prompt {
    /// The system turn: instruction followed by the retrieved context.
    pub fn system_text(&self) -> String {
        if self.context.is_empty() {
            self.system_instruction.clone()
        } else {
            format!("{}\n\n{}", self.system_instruction, self.context)
        }
    }

    /// Flatten the prompt into a single string ending with the question.
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.system_text(), self.question)
    }
}

/// A synthesized answer returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
}
