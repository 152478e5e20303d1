//! Prompt assembly from retrieved chunks and the user question.

use crate::document::Prompt;

/// Instruction given to the model ahead of the retrieved context.
pub const SYSTEM_INSTRUCTION: &str = "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. \
If you don't know the answer, say that you don't know. \
Use three sentences maximum and keep the answer concise.";

/// Separator placed between consecutive chunk texts.
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Build the prompt for `question` from chunk texts in rank order.
///
/// Pure string assembly: no truncation, so oversized context is left for the
/// model endpoint to reject.
pub fn compose(question: &str, chunks: &[&str]) -> Prompt {
    Prompt {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        context: chunks.join(CHUNK_SEPARATOR),
        question: question.to_string(),
    }
}
