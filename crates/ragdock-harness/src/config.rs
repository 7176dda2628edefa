//! Bootstrap and smoke test configuration.

use std::path::PathBuf;
use std::time::Duration;

use ragdock_ollama::host::normalize_base_url;
use ragdock_ollama::{DEFAULT_BASE_MODEL, DEFAULT_DERIVED_MODEL, DEFAULT_OLLAMA_URL};

/// Default orchestration API base URL.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Configuration for the runtime bootstrap.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Ollama base URL
    pub ollama_url: String,
    /// Model pulled from the registry
    pub base_model: String,
    /// Model created from the Modelfile
    pub derived_model: String,
    /// Modelfile defining the derived model
    pub modelfile: PathBuf,
    /// Readiness probe attempts before giving up
    pub max_attempts: u32,
    /// Fixed wait between readiness probes
    pub interval: Duration,
    /// Render a progress bar while pulling
    pub show_progress: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            base_model: DEFAULT_BASE_MODEL.to_string(),
            derived_model: DEFAULT_DERIVED_MODEL.to_string(),
            modelfile: PathBuf::from("Modelfile"),
            max_attempts: 60,
            interval: Duration::from_secs(1),
            show_progress: true,
        }
    }
}

impl BootstrapConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let ollama_url = lookup("OLLAMA_HOST")
            .filter(|v| !v.trim().is_empty())
            .map(|v| normalize_base_url(&v))
            .unwrap_or(defaults.ollama_url);

        let max_attempts = lookup("RAGDOCK_MAX_ATTEMPTS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_attempts);

        let interval = lookup("RAGDOCK_INTERVAL_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.interval);

        Self {
            ollama_url,
            base_model: lookup("RAGDOCK_BASE_MODEL").unwrap_or(defaults.base_model),
            derived_model: lookup("OLLAMA_MODEL").unwrap_or(defaults.derived_model),
            modelfile: lookup("RAGDOCK_MODELFILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.modelfile),
            max_attempts,
            interval,
            show_progress: defaults.show_progress,
        }
    }

    /// Create a builder for configuration.
    pub fn builder() -> BootstrapConfigBuilder {
        BootstrapConfigBuilder::default()
    }
}

/// Builder for bootstrap configuration.
#[derive(Debug, Default)]
pub struct BootstrapConfigBuilder {
    config: BootstrapConfig,
}

impl BootstrapConfigBuilder {
    pub fn ollama_url(mut self, url: impl AsRef<str>) -> Self {
        self.config.ollama_url = normalize_base_url(url.as_ref());
        self
    }

    pub fn base_model(mut self, model: impl Into<String>) -> Self {
        self.config.base_model = model.into();
        self
    }

    pub fn derived_model(mut self, model: impl Into<String>) -> Self {
        self.config.derived_model = model.into();
        self
    }

    pub fn modelfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.modelfile = path.into();
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    pub fn build(self) -> BootstrapConfig {
        self.config
    }
}

impl From<BootstrapConfig> for BootstrapConfigBuilder {
    fn from(config: BootstrapConfig) -> Self {
        Self { config }
    }
}

/// Configuration for the smoke test run.
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    /// Orchestration API base URL
    pub api_base: String,
    /// Directory receiving one raw response file per check
    pub output_dir: PathBuf,
    /// Per-request timeout
    pub timeout: Duration,
    /// Require top-level JSON keys instead of substring presence
    pub strict: bool,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            output_dir: PathBuf::from("smoke-output"),
            timeout: Duration::from_secs(180),
            strict: false,
        }
    }
}

impl SmokeConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base = lookup("API_BASE")
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);

        let timeout = lookup("RAGDOCK_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let strict = lookup("RAGDOCK_STRICT")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(defaults.strict);

        Self {
            api_base,
            output_dir: lookup("RAGDOCK_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            timeout,
            strict,
        }
    }
}
