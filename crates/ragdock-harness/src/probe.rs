//! Health probes used by the readiness gate.

use std::time::Duration;

use async_trait::async_trait;
use ragdock_ollama::OllamaClient;

/// Per-request timeout for a single probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// A lightweight readiness check against a dependency.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Human-readable name of what is being probed.
    fn target(&self) -> String;

    /// Succeeds once the dependency answers with a 2xx status.
    async fn probe(&self) -> Result<(), String>;
}

#[async_trait]
impl HealthProbe for OllamaClient {
    fn target(&self) -> String {
        format!("Ollama at {}", self.base_url())
    }

    async fn probe(&self) -> Result<(), String> {
        self.check_health().await.map_err(|e| e.to_string())
    }
}

/// Probe for an arbitrary URL, e.g. ChromaDB's `/api/v1/heartbeat`.
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    fn target(&self) -> String {
        self.url.clone()
    }

    async fn probe(&self) -> Result<(), String> {
        let response = self
            .client
            .get(&self.url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!("status {}", status))
        }
    }
}
