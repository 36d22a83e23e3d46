//! Environment seeding from a key/value file.

use std::path::{Path, PathBuf};

use crate::config::constants::{DB_USERNAME_VAR, DEFAULT_ENV_FILE, ENV_FILE_VAR};

/// Outcome of [`seed_env_from_file`].
#[derive(Debug)]
pub enum EnvSeed {
    /// Database settings were already present; the file was not read.
    AlreadySet,
    /// Variables were loaded from the file (existing ones are never overridden).
    Loaded(PathBuf),
    /// The file could not be read or parsed.
    Failed(PathBuf, dotenvy::Error),
}

/// Path of the env file: `EXPORT_ENV_FILE` if set, otherwise `../.env`.
pub fn env_file_path() -> PathBuf {
    std::env::var_os(ENV_FILE_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE))
}

/// Loads `path` into the process environment unless `DB_USERNAME` is already set.
///
/// Runs before the logger exists, so the outcome is returned for the caller to
/// report once logging is up.
pub fn seed_env_from_file(path: &Path) -> EnvSeed {
    let already_set = std::env::var_os(DB_USERNAME_VAR).is_some_and(|value| !value.is_empty());
    if already_set {
        return EnvSeed::AlreadySet;
    }
    match dotenvy::from_path(path) {
        Ok(()) => EnvSeed::Loaded(path.to_path_buf()),
        Err(e) => EnvSeed::Failed(path.to_path_buf(), e),
    }
}
