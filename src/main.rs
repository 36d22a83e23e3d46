//! Main application entry point (server binary).
//!
//! This is a thin wrapper around the `query_export` library that handles:
//! - Environment seeding from the host application's `.env` file
//! - Command-line argument parsing
//! - Logger initialization
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::process;

use query_export::config::{env_file_path, seed_env_from_file, EnvSeed, Opt};
use query_export::initialization::init_logger_with;
use query_export::{start_export_server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Must run before parsing: DB_* options fall back to the environment
    let env_seed = seed_env_from_file(&env_file_path());

    let config = Config::from(Opt::parse());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match env_seed {
        EnvSeed::AlreadySet => debug!("Database settings taken from the environment"),
        EnvSeed::Loaded(path) => info!("Loaded environment from {}", path.display()),
        EnvSeed::Failed(path, e) => {
            warn!("Could not load env file {}: {}", path.display(), e)
        }
    }

    if let Err(e) = config.validate() {
        eprintln!("query_export error: {}", e);
        process::exit(2);
    }
    debug!("Starting with {:?}", config);

    if let Err(e) = start_export_server(config).await {
        eprintln!("query_export error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
