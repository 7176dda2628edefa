//! Model runtime seam used by the bootstrap.

use std::path::Path;

use async_trait::async_trait;
use ragdock_ollama::{OllamaClient, OllamaError};

use crate::probe::HealthProbe;

/// Operations the bootstrap performs against an LLM runtime.
#[async_trait]
pub trait ModelRuntime: HealthProbe {
    /// Fetch a model from the registry.
    async fn pull(&self, model: &str) -> Result<(), OllamaError>;

    /// Build a model from a local Modelfile.
    async fn create(&self, name: &str, modelfile: &Path) -> Result<(), OllamaError>;

    /// Names of the installed models.
    async fn list(&self) -> Result<Vec<String>, OllamaError>;
}

/// Ollama client with pull progress rendering toggled.
pub struct OllamaRuntime {
    client: OllamaClient,
    show_progress: bool,
}

impl OllamaRuntime {
    pub fn new(client: OllamaClient, show_progress: bool) -> Self {
        Self {
            client,
            show_progress,
        }
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }
}

#[async_trait]
impl HealthProbe for OllamaRuntime {
    fn target(&self) -> String {
        self.client.target()
    }

    async fn probe(&self) -> Result<(), String> {
        self.client.probe().await
    }
}

#[async_trait]
impl ModelRuntime for OllamaRuntime {
    async fn pull(&self, model: &str) -> Result<(), OllamaError> {
        self.client.pull_model(model, self.show_progress).await
    }

    async fn create(&self, name: &str, modelfile: &Path) -> Result<(), OllamaError> {
        self.client.create_model(name, modelfile).await
    }

    async fn list(&self) -> Result<Vec<String>, OllamaError> {
        self.client.list_models().await
    }
}
