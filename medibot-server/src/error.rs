//! Error types for the medibot front end.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medibot_rag::RagError;
use thiserror::Error;

/// Start-up failures. Any of these aborts the process before it binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is absent, or a variable holds an unusable value.
    #[error("Misconfiguration: {var} {reason}")]
    Misconfiguration {
        /// The offending environment variable.
        var: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Per-request failures of the `/get` route.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A required form field was not supplied.
    #[error("missing required form field '{name}'")]
    MissingParameter { name: &'static str },

    /// Retrieval or generation failed.
    #[error(transparent)]
    ServiceUnavailable(#[from] RagError),
}

impl IntoResponse for ChatError {
    /// Bodies are generic: callers cannot tell which downstream step failed.
    fn into_response(self) -> Response {
        let status = match self {
            ChatError::MissingParameter { .. } => StatusCode::BAD_REQUEST,
            ChatError::ServiceUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}
