//! Runs a plan check by check, saving every response.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::plan::{SmokeCheck, SmokePlan};
use super::predicate::{first_missing, JsonKeyPredicate, ResponsePredicate, SubstringPredicate};
use super::transport::{ReqwestTransport, Transport};
use crate::config::SmokeConfig;
use crate::error::HarnessError;

/// Outcome of one passed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeCheckRecord {
    pub name: String,
    pub status: u16,
    pub artifact: PathBuf,
}

/// Executes smoke checks in order, stopping at the first failure.
pub struct SmokeRunner<T = ReqwestTransport> {
    transport: T,
    api_base: String,
    output_dir: PathBuf,
    predicate: Box<dyn ResponsePredicate>,
}

impl SmokeRunner<ReqwestTransport> {
    pub fn from_config(config: &SmokeConfig) -> Self {
        let predicate: Box<dyn ResponsePredicate> = if config.strict {
            Box::new(JsonKeyPredicate)
        } else {
            Box::new(SubstringPredicate)
        };
        Self::new(
            ReqwestTransport::new(config.timeout),
            &config.api_base,
            &config.output_dir,
        )
        .with_predicate(predicate)
    }
}

impl<T: Transport> SmokeRunner<T> {
    pub fn new(transport: T, api_base: &str, output_dir: &Path) -> Self {
        Self {
            transport,
            api_base: api_base.trim_end_matches('/').to_string(),
            output_dir: output_dir.to_path_buf(),
            predicate: Box::new(SubstringPredicate),
        }
    }

    pub fn with_predicate(mut self, predicate: Box<dyn ResponsePredicate>) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Where the response of a check named `name` is written.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.json", name))
    }

    /// Run every check in order. The first failing check aborts the run.
    pub async fn run(&self, plan: &SmokePlan) -> Result<Vec<SmokeCheckRecord>, HarnessError> {
        info!(
            "Running {} smoke checks against {} ({} predicate)",
            plan.checks().len(),
            self.api_base,
            self.predicate.name()
        );

        let mut records = Vec::with_capacity(plan.checks().len());
        for check in plan.checks() {
            records.push(self.run_check(check).await?);
        }
        Ok(records)
    }

    /// Send one request, persist the raw body, then look for each field.
    pub async fn run_check(&self, check: &SmokeCheck) -> Result<SmokeCheckRecord, HarnessError> {
        let url = format!("{}{}", self.api_base, check.path);
        debug!("{} {} {}", check.name, check.method, url);

        let response = self
            .transport
            .send(check.method.clone(), &url, check.body.as_ref())
            .await
            .map_err(|message| HarnessError::Request {
                check: check.name.clone(),
                message,
            })?;

        if !(200..300).contains(&response.status) {
            warn!("{} returned status {}", check.name, response.status);
        }

        let artifact = self.artifact_path(&check.name);
        self.save(&artifact, &response.body)?;

        let missing = first_missing(
            self.predicate.as_ref(),
            &response.body,
            &check.required_fields,
        );
        if let Some(field) = missing {
            return Err(HarnessError::ResponseMissingField {
                check: check.name.clone(),
                field: field.to_string(),
                artifact,
            });
        }

        info!("{} OK (saved to {})", check.name, artifact.display());
        Ok(SmokeCheckRecord {
            name: check.name.clone(),
            status: response.status,
            artifact,
        })
    }

    fn save(&self, path: &Path, body: &str) -> Result<(), HarnessError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| HarnessError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        std::fs::write(path, body).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
