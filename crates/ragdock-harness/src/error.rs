//! Harness error taxonomy.

use std::path::PathBuf;

use ragdock_ollama::OllamaError;
use thiserror::Error;

/// Errors from the bootstrap and smoke flows.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The readiness probe never succeeded within its budget.
    #[error("{target} not ready after {attempts} attempts")]
    DependencyUnavailable { target: String, attempts: u32 },

    /// The base model could not be pulled.
    #[error("failed to pull base model '{model}': {source}")]
    RequiredArtifactMissing {
        model: String,
        #[source]
        source: OllamaError,
    },

    /// The derived model could not be created. Logged by the bootstrap,
    /// never returned from a run.
    #[error("failed to create derived model '{model}': {source}")]
    DerivedArtifactCreationFailed {
        model: String,
        #[source]
        source: OllamaError,
    },

    /// A smoke check response lacked a required field.
    #[error("check '{check}' failed: response missing '{field}' (saved to {})", artifact.display())]
    ResponseMissingField {
        check: String,
        field: String,
        artifact: PathBuf,
    },

    /// A smoke check request got no response at all.
    #[error("check '{check}' request failed: {message}")]
    Request { check: String, message: String },

    /// Writing a response artifact failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}
