//! Client for the Ollama runtime API.
//!
//! Covers the small surface ragdock needs to provision a local runtime:
//! readiness via `/api/tags`, pulling a base model, creating a derived
//! model from a Modelfile, and listing what is installed.

mod client;
mod error;
pub mod host;
mod modelfile;
mod pull;

pub use client::OllamaClient;
pub use error::OllamaError;
pub use modelfile::Modelfile;
pub use pull::{LineBuffer, PullStatus};

/// Default Ollama server URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default base model pulled from the registry.
pub const DEFAULT_BASE_MODEL: &str = "qwen2.5-coder:1.5b";

/// Default name of the model derived from the base model and a Modelfile.
pub const DEFAULT_DERIVED_MODEL: &str = "qwen2.5-fastapi-python";
