//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_DB_HOST, DEFAULT_DB_PORT, DEFAULT_EXPORT_DIR, DEFAULT_LISTEN_ADDR,
    DEFAULT_PUBLIC_URL_PREFIX,
};
use crate::error_handling::ConfigValidationError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Database engine the exports run against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DbDriver {
    /// MySQL / MariaDB server reached over TCP
    #[value(name = "mysql")]
    MySql,
    /// SQLite database file (`DB_DATABASE` holds the path)
    Sqlite,
}

/// Connection parameters for the export database.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub driver: DbDriver,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Schema name for MySQL, file path for SQLite
    pub database: String,
}

// Hand-written so the password never reaches the logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DbDriver::MySql,
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            username: String::new(),
            password: String::new(),
            database: String::new(),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// Built once at process start and shared read-only by every request.
///
/// # Examples
///
/// ```no_run
/// use query_export::config::{DatabaseConfig, DbDriver};
/// use query_export::Config;
///
/// let config = Config {
///     database: DatabaseConfig {
///         driver: DbDriver::Sqlite,
///         database: "./app.db".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection parameters
    pub database: DatabaseConfig,

    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,

    /// Directory receiving the CSV files
    pub export_dir: PathBuf,

    /// Prefix of the public URL returned for each file
    pub public_url_prefix: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            public_url_prefix: DEFAULT_PUBLIC_URL_PREFIX.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks the values that would otherwise only fail on the first request.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.database.trim().is_empty() {
            return Err(ConfigValidationError {
                field: "db-database",
                message: "must be set (DB_DATABASE): a schema name for mysql or a file path for sqlite"
                    .to_string(),
            });
        }
        if self.database.driver == DbDriver::MySql {
            if self.database.host.trim().is_empty() {
                return Err(ConfigValidationError {
                    field: "db-host",
                    message: "must be set (DB_HOST) when using mysql".to_string(),
                });
            }
            if self.database.port == 0 {
                return Err(ConfigValidationError {
                    field: "db-port",
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if self.export_dir.as_os_str().is_empty() {
            return Err(ConfigValidationError {
                field: "export-dir",
                message: "must not be empty".to_string(),
            });
        }
        if !self.public_url_prefix.starts_with('/') {
            return Err(ConfigValidationError {
                field: "public-url-prefix",
                message: format!(
                    "must start with '/', got '{}'",
                    self.public_url_prefix
                ),
            });
        }
        Ok(())
    }
}

/// Command-line options and configuration.
///
/// Every database option falls back to the matching `DB_*` environment
/// variable, so a Laravel-style `.env` file configures the service unchanged.
///
/// # Examples
///
/// ```bash
/// # Settings from the environment / .env file
/// query_export
///
/// # Local SQLite database on a custom port
/// query_export --db-connection sqlite --db-database ./app.db --listen-addr 0.0.0.0:9000
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "query_export",
    about = "Runs ad-hoc SQL queries over HTTP and exports the results as CSV files."
)]
pub struct Opt {
    /// Address to listen on
    #[arg(long, env = "EXPORT_LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Directory the CSV files are written to (created if missing)
    #[arg(long, env = "EXPORT_DIR", value_parser, default_value = DEFAULT_EXPORT_DIR)]
    pub export_dir: PathBuf,

    /// Prefix of the public URL returned for each export
    #[arg(long, env = "EXPORT_PUBLIC_URL_PREFIX", default_value = DEFAULT_PUBLIC_URL_PREFIX)]
    pub public_url_prefix: String,

    /// Database engine: mysql|sqlite
    #[arg(long, env = "DB_CONNECTION", value_enum, default_value_t = DbDriver::MySql)]
    pub db_connection: DbDriver,

    /// Database host
    #[arg(long, env = "DB_HOST", default_value = DEFAULT_DB_HOST)]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = DEFAULT_DB_PORT)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USERNAME", default_value = "")]
    pub db_username: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database name (file path for sqlite)
    #[arg(long, env = "DB_DATABASE", default_value = "")]
    pub db_database: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            database: DatabaseConfig {
                driver: opt.db_connection,
                host: opt.db_host,
                port: opt.db_port,
                username: opt.db_username,
                password: opt.db_password,
                database: opt.db_database,
            },
            listen_addr: opt.listen_addr,
            export_dir: opt.export_dir,
            public_url_prefix: opt.public_url_prefix,
            log_level: opt.log_level,
            log_format: opt.log_format,
        }
    }
}
