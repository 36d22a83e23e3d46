//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, file naming, NULL rendering)
//! - CLI option types and parsing
//! - Environment seeding from an external `.env` file

mod constants;
mod env;
mod types;

// Re-export all constants
pub use constants::*;
pub use env::{env_file_path, seed_env_from_file, EnvSeed};
pub use types::{Config, DatabaseConfig, DbDriver, LogFormat, LogLevel, Opt};
