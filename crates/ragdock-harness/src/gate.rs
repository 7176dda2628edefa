//! Fixed-interval readiness gate.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::HarnessError;
use crate::probe::HealthProbe;

/// Source of delay between probe attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real delays on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polls a probe until it succeeds or the attempt budget runs out.
#[derive(Debug, Clone)]
pub struct ReadinessGate<S = TokioSleeper> {
    max_attempts: u32,
    interval: Duration,
    sleeper: S,
}

impl ReadinessGate<TokioSleeper> {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self::with_sleeper(max_attempts, interval, TokioSleeper)
    }
}

impl<S: Sleeper> ReadinessGate<S> {
    pub fn with_sleeper(max_attempts: u32, interval: Duration, sleeper: S) -> Self {
        Self {
            max_attempts,
            interval,
            sleeper,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until `probe` succeeds. Returns the attempt it succeeded on.
    pub async fn await_ready(&self, probe: &dyn HealthProbe) -> Result<u32, HarnessError> {
        if self.max_attempts == 0 {
            return Err(HarnessError::Config(
                "max attempts must be at least 1".to_string(),
            ));
        }

        let target = probe.target();
        info!("Waiting for {} to become ready...", target);

        for attempt in 1..=self.max_attempts {
            match probe.probe().await {
                Ok(()) => {
                    info!("{} is ready (attempt {})", target, attempt);
                    return Ok(attempt);
                }
                Err(reason) => {
                    debug!(
                        "{} not ready ({}/{}): {}",
                        target, attempt, self.max_attempts, reason
                    );
                    if attempt < self.max_attempts {
                        self.sleeper.sleep(self.interval).await;
                    }
                }
            }
        }

        Err(HarnessError::DependencyUnavailable {
            target,
            attempts: self.max_attempts,
        })
    }
}
