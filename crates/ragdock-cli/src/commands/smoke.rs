//! Smoke command - seed, query and generate against the running API.

use std::path::PathBuf;
use std::time::Duration;

use ragdock_harness::{SmokeConfig, SmokePlan, SmokeRunner};

/// Flag overrides on top of the environment.
#[derive(Debug, Default)]
pub(crate) struct Args {
    pub api_base: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub strict: bool,
}

pub(crate) fn resolve(args: Args, mut config: SmokeConfig) -> SmokeConfig {
    if let Some(base) = args.api_base {
        config.api_base = base.trim_end_matches('/').to_string();
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    config.strict |= args.strict;
    config
}

pub(crate) async fn run(args: Args) -> miette::Result<()> {
    let config = resolve(args, SmokeConfig::from_env());
    let plan = SmokePlan::default_plan().map_err(|e| miette::miette!("{}", e))?;

    println!("Smoke testing {}", config.api_base);
    println!("Responses go to {}", config.output_dir.display());
    println!();

    let runner = SmokeRunner::from_config(&config);
    let records = runner.run(&plan).await.map_err(|e| {
        println!("FAIL");
        miette::miette!("{}", e)
    })?;

    for record in &records {
        println!(
            "  PASS {:<9} (HTTP {}) -> {}",
            record.name,
            record.status,
            record.artifact.display()
        );
    }
    println!();
    println!("All {} checks passed.", records.len());

    Ok(())
}
