//! Bootstrap command - gate on Ollama readiness, then provision models.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use ragdock_harness::{Bootstrap, BootstrapConfig, DerivedOutcome, OllamaRuntime};
use ragdock_ollama::OllamaClient;

/// Flag overrides on top of the environment.
#[derive(Debug, Default)]
pub(crate) struct Args {
    pub max_attempts: Option<u32>,
    pub interval_secs: Option<u64>,
    pub base_model: Option<String>,
    pub derived_model: Option<String>,
    pub modelfile: Option<PathBuf>,
    pub no_progress: bool,
}

pub(crate) fn resolve(args: Args, config: BootstrapConfig) -> BootstrapConfig {
    let mut builder = ragdock_harness::BootstrapConfigBuilder::from(config);
    if let Some(attempts) = args.max_attempts {
        builder = builder.max_attempts(attempts);
    }
    if let Some(secs) = args.interval_secs {
        builder = builder.interval(Duration::from_secs(secs));
    }
    if let Some(model) = args.base_model {
        builder = builder.base_model(model);
    }
    if let Some(model) = args.derived_model {
        builder = builder.derived_model(model);
    }
    if let Some(path) = args.modelfile {
        builder = builder.modelfile(path);
    }
    if args.no_progress {
        builder = builder.show_progress(false);
    }
    builder.build()
}

pub(crate) async fn run(args: Args) -> miette::Result<()> {
    let mut config = resolve(args, BootstrapConfig::from_env());
    config.show_progress &= std::io::stderr().is_terminal();

    let runtime = OllamaRuntime::new(
        OllamaClient::with_url(&config.ollama_url),
        config.show_progress,
    );
    let report = Bootstrap::new(runtime, &config)
        .run()
        .await
        .map_err(|e| miette::miette!("Bootstrap failed: {}", e))?;

    println!("Ollama ready after {} attempt(s)", report.attempts);
    println!("Base model:    {}", config.base_model);
    match &report.derived {
        DerivedOutcome::Created => println!("Derived model: {} (created)", config.derived_model),
        DerivedOutcome::Skipped { reason } => {
            println!("Derived model: {} (skipped: {})", config.derived_model, reason)
        }
    }

    if let Some(models) = &report.models {
        println!();
        println!("Installed models:");
        for model in models {
            println!("  - {}", model);
        }
    }

    Ok(())
}
