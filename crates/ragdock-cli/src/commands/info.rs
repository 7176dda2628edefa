//! Info command - show the configuration resolved from the environment.

use ragdock_harness::{BootstrapConfig, SmokeConfig};

pub(crate) fn run() -> miette::Result<()> {
    let bootstrap = BootstrapConfig::from_env();
    let smoke = SmokeConfig::from_env();

    println!("ragdock {}", env!("CARGO_PKG_VERSION"));
    println!("==============");
    println!();

    println!("Bootstrap:");
    println!("  Ollama:        {}", bootstrap.ollama_url);
    println!("  Base model:    {}", bootstrap.base_model);
    println!("  Derived model: {}", bootstrap.derived_model);
    println!(
        "  Modelfile:     {} (exists: {})",
        bootstrap.modelfile.display(),
        bootstrap.modelfile.exists()
    );
    println!(
        "  Readiness:     {} attempts, {}s apart",
        bootstrap.max_attempts,
        bootstrap.interval.as_secs()
    );
    println!();

    println!("Smoke:");
    println!("  API base:      {}", smoke.api_base);
    println!("  Output dir:    {}", smoke.output_dir.display());
    println!("  Timeout:       {}s", smoke.timeout.as_secs());
    println!(
        "  Predicate:     {}",
        if smoke.strict { "json-key" } else { "substring" }
    );

    Ok(())
}
