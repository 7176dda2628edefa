//! Wait command - block until an HTTP endpoint is ready.

use std::time::Duration;

use ragdock_harness::{BootstrapConfig, HttpProbe, ReadinessGate};

/// Attempt budget and interval: flags first, then the bootstrap env values.
pub(crate) fn resolve(
    max_attempts: Option<u32>,
    interval_secs: Option<u64>,
    env: &BootstrapConfig,
) -> (u32, Duration) {
    (
        max_attempts.unwrap_or(env.max_attempts),
        interval_secs
            .map(Duration::from_secs)
            .unwrap_or(env.interval),
    )
}

pub(crate) async fn run(
    url: &str,
    max_attempts: Option<u32>,
    interval_secs: Option<u64>,
) -> miette::Result<()> {
    let (max_attempts, interval) =
        resolve(max_attempts, interval_secs, &BootstrapConfig::from_env());
    let gate = ReadinessGate::new(max_attempts, interval);
    let probe = HttpProbe::new(url);

    let attempts = gate
        .await_ready(&probe)
        .await
        .map_err(|e| miette::miette!("{}", e))?;

    println!("{} ready after {} attempt(s)", probe.url(), attempts);
    Ok(())
}
