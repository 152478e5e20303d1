//! `medibot-server` serves the medical chat page and answers questions
//! through the retrieval-augmented pipeline in `medibot-rag`.

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::{Config, LogFormat};
pub use error::{ChatError, ConfigError};
pub use server::{app_router, run_server};
pub use state::AppState;
pub use telemetry::init_tracing;
