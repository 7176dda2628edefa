//! Readiness-gated runtime bootstrap.
//!
//! `Waiting -> Ready -> BaseFetched -> DerivedEnsured -> Done`. The only
//! fatal exits are the gate timing out and the base pull failing; a failed
//! derived-model creation is logged and the run still reaches `Done`.

use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::BootstrapConfig;
use crate::error::HarnessError;
use crate::gate::{ReadinessGate, Sleeper, TokioSleeper};
use crate::runtime::ModelRuntime;

/// Bootstrap progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Waiting,
    Ready,
    BaseFetched,
    DerivedEnsured,
    Done,
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Waiting => "waiting",
            Self::Ready => "ready",
            Self::BaseFetched => "base-fetched",
            Self::DerivedEnsured => "derived-ensured",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What happened to the derived model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedOutcome {
    Created,
    /// Creation failed and was tolerated; the model may already exist.
    Skipped { reason: String },
}

/// Summary of a completed bootstrap.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub attempts: u32,
    pub derived: DerivedOutcome,
    /// Installed models at the end of the run; `None` if listing failed.
    pub models: Option<Vec<String>>,
    pub states: Vec<BootstrapState>,
}

impl BootstrapReport {
    pub fn final_state(&self) -> BootstrapState {
        self.states
            .last()
            .copied()
            .unwrap_or(BootstrapState::Waiting)
    }
}

/// Provisions a model runtime once it is reachable.
pub struct Bootstrap<R, S = TokioSleeper> {
    runtime: R,
    gate: ReadinessGate<S>,
    base_model: String,
    derived_model: String,
    modelfile: PathBuf,
}

impl<R: ModelRuntime> Bootstrap<R, TokioSleeper> {
    pub fn new(runtime: R, config: &BootstrapConfig) -> Self {
        let gate = ReadinessGate::new(config.max_attempts, config.interval);
        Self::with_gate(runtime, gate, config)
    }
}

impl<R: ModelRuntime, S: Sleeper> Bootstrap<R, S> {
    pub fn with_gate(runtime: R, gate: ReadinessGate<S>, config: &BootstrapConfig) -> Self {
        Self {
            runtime,
            gate,
            base_model: config.base_model.clone(),
            derived_model: config.derived_model.clone(),
            modelfile: config.modelfile.clone(),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Run the full sequence.
    pub async fn run(&self) -> Result<BootstrapReport, HarnessError> {
        let mut states = vec![BootstrapState::Waiting];

        let attempts = self.gate.await_ready(&self.runtime).await?;
        advance(&mut states, BootstrapState::Ready);

        self.ensure_base_artifact_present(&self.base_model).await?;
        advance(&mut states, BootstrapState::BaseFetched);

        let derived = self
            .ensure_derived_artifact_present(&self.derived_model, &self.modelfile)
            .await;
        advance(&mut states, BootstrapState::DerivedEnsured);

        let models = match self.runtime.list().await {
            Ok(models) => Some(models),
            Err(e) => {
                warn!("Could not list models: {}", e);
                None
            }
        };
        advance(&mut states, BootstrapState::Done);

        Ok(BootstrapReport {
            attempts,
            derived,
            models,
            states,
        })
    }

    /// Pull the base model. Fatal on failure.
    pub async fn ensure_base_artifact_present(&self, model: &str) -> Result<(), HarnessError> {
        self.runtime
            .pull(model)
            .await
            .map_err(|source| HarnessError::RequiredArtifactMissing {
                model: model.to_string(),
                source,
            })
    }

    /// Create the derived model, tolerating any failure.
    pub async fn ensure_derived_artifact_present(
        &self,
        name: &str,
        modelfile: &std::path::Path,
    ) -> DerivedOutcome {
        match self.runtime.create(name, modelfile).await {
            Ok(()) => {
                info!("Derived model '{}' created", name);
                DerivedOutcome::Created
            }
            Err(source) => {
                let err = HarnessError::DerivedArtifactCreationFailed {
                    model: name.to_string(),
                    source,
                };
                warn!("{} (continuing; it may already exist)", err);
                DerivedOutcome::Skipped {
                    reason: err.to_string(),
                }
            }
        }
    }
}

fn advance(states: &mut Vec<BootstrapState>, next: BootstrapState) {
    if let Some(prev) = states.last() {
        info!("bootstrap: {} -> {}", prev, next);
    }
    states.push(next);
}
