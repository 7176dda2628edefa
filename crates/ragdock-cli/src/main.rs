//! ragdock CLI - bootstrap and smoke checks for a local RAG demo stack.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// ragdock - provision Ollama and smoke-test the RAG API
#[derive(Parser)]
#[command(name = "ragdock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for Ollama, pull the base model and create the derived model
    Bootstrap {
        /// Readiness probe attempts (env: RAGDOCK_MAX_ATTEMPTS)
        #[arg(long)]
        max_attempts: Option<u32>,
        /// Seconds between probes (env: RAGDOCK_INTERVAL_SECS)
        #[arg(long)]
        interval_secs: Option<u64>,
        /// Base model to pull (env: RAGDOCK_BASE_MODEL)
        #[arg(long)]
        base_model: Option<String>,
        /// Derived model to create (env: OLLAMA_MODEL)
        #[arg(long)]
        derived_model: Option<String>,
        /// Modelfile for the derived model (env: RAGDOCK_MODELFILE)
        #[arg(long)]
        modelfile: Option<PathBuf>,
        /// Do not render pull progress
        #[arg(long)]
        no_progress: bool,
    },

    /// Run the seed, query and generate checks against the API
    Smoke {
        /// API base URL (env: API_BASE)
        #[arg(long)]
        api_base: Option<String>,
        /// Directory for saved responses (env: RAGDOCK_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Per-request timeout in seconds (env: RAGDOCK_TIMEOUT_SECS)
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Require top-level JSON keys instead of substring matches
        #[arg(long)]
        strict: bool,
    },

    /// Wait until a URL answers with a 2xx status
    Wait {
        /// URL to probe, e.g. http://chroma:8000/api/v1/heartbeat
        url: String,
        /// Probe attempts (env: RAGDOCK_MAX_ATTEMPTS)
        #[arg(long)]
        max_attempts: Option<u32>,
        /// Seconds between probes (env: RAGDOCK_INTERVAL_SECS)
        #[arg(long)]
        interval_secs: Option<u64>,
    },

    /// List models installed in Ollama
    Models,

    /// Show the resolved configuration
    Info,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| miette::miette!("Failed to start async runtime: {}", e))?;

    match cli.command {
        Commands::Bootstrap {
            max_attempts,
            interval_secs,
            base_model,
            derived_model,
            modelfile,
            no_progress,
        } => {
            let args = commands::bootstrap::Args {
                max_attempts,
                interval_secs,
                base_model,
                derived_model,
                modelfile,
                no_progress,
            };
            runtime.block_on(commands::bootstrap::run(args))
        }
        Commands::Smoke {
            api_base,
            output_dir,
            timeout_secs,
            strict,
        } => {
            let args = commands::smoke::Args {
                api_base,
                output_dir,
                timeout_secs,
                strict,
            };
            runtime.block_on(commands::smoke::run(args))
        }
        Commands::Wait {
            url,
            max_attempts,
            interval_secs,
        } => runtime.block_on(commands::wait::run(&url, max_attempts, interval_secs)),
        Commands::Models => runtime.block_on(commands::models::run()),
        Commands::Info => commands::info::run(),
    }
}
