//! Model listing command.

use ragdock_harness::BootstrapConfig;
use ragdock_ollama::OllamaClient;

/// List installed models.
pub(crate) async fn run() -> miette::Result<()> {
    let config = BootstrapConfig::from_env();
    let client = OllamaClient::with_url(&config.ollama_url);

    let models = client
        .list_models()
        .await
        .map_err(|e| miette::miette!("Failed to list models: {}", e))?;

    if models.is_empty() {
        println!("No models installed at {}.", client.base_url());
        println!();
        println!("To provision the default models, run:");
        println!("  ragdock bootstrap");
        return Ok(());
    }

    println!("Installed models:");
    for model in models {
        println!("  - {}", model);
    }

    Ok(())
}
