//! Configuration constants.
//!
//! Defaults used by the CLI and by `Config::default()`.

/// Address the export server listens on.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Directory receiving exported CSV files (the host application's storage area).
pub const DEFAULT_EXPORT_DIR: &str = "../storage/app/exports";

/// Prefix of the public URL under which exported files are served.
pub const DEFAULT_PUBLIC_URL_PREFIX: &str = "/storage/exports";

/// Key/value file consulted when the database environment is not set.
pub const DEFAULT_ENV_FILE: &str = "../.env";

/// Environment variable overriding [`DEFAULT_ENV_FILE`].
pub const ENV_FILE_VAR: &str = "EXPORT_ENV_FILE";

/// Environment variable whose presence means the database settings are already loaded.
pub const DB_USERNAME_VAR: &str = "DB_USERNAME";

pub const DEFAULT_DB_HOST: &str = "127.0.0.1";
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Prefix of file names synthesized when the request names no output file.
pub const DEFAULT_FILE_PREFIX: &str = "export_";

/// Extension of every exported file.
pub const CSV_EXTENSION: &str = "csv";

/// Text written for SQL NULL cells.
pub const NULL_CELL: &str = "NULL";
