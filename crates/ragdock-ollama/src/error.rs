//! Error types for Ollama operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to an Ollama server.
#[derive(Debug, Error)]
pub enum OllamaError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned a non-success response.
    #[error("Ollama API error: {status}: {body}")]
    Api { status: u16, body: String },

    /// Server is not running or not reachable.
    #[error("Ollama server not running at {0}. Start it with: ollama serve")]
    ServerNotRunning(String),

    /// The pull stream reported an error.
    #[error("pull of '{model}' failed: {message}")]
    PullFailed { model: String, message: String },

    /// The pull stream ended without a success status.
    #[error("pull of '{0}' ended before reporting success")]
    PullIncomplete(String),

    /// Modelfile could not be parsed.
    #[error("invalid Modelfile: {0}")]
    InvalidModelfile(String),

    /// Modelfile could not be read.
    #[error("failed to read Modelfile {}: {source}", path.display())]
    Modelfile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
