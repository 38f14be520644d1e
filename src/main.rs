//! Binary entry point for kvgate.
//!
//! Loads the JSON config, connects every configured backend, and serves the
//! HTTP routes until SIGINT or SIGTERM.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Startup failures are reported before logging exists.
#![allow(clippy::print_stderr)]
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use kvgate::config::AppConfig;
use kvgate::observability::{self, InitOptions};
use kvgate::server::{self, ServerConfig};
use kvgate::services::BackendSet;
use std::path::PathBuf;
use std::process::ExitCode;

/// kvgate - HTTP facade over key-value stores and a record aggregation query.
#[derive(Parser)]
#[command(name = "kvgate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "./config.json")]
    config: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load_from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let _observability = match observability::init_from_config(
        &config.observability,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error initializing observability: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "kvgate exited with an error");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

async fn run(config: &AppConfig) -> kvgate::Result<()> {
    let backends = BackendSet::from_descriptors(&config.databases).await?;
    if backends.is_empty() {
        tracing::warn!("No backends configured; every route will answer not configured");
    }

    let router = server::build_router(&backends);
    server::serve(&ServerConfig::from_settings(&config.application), router).await
}
