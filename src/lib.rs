//! query_export library: ad-hoc SQL queries exported to CSV files
//!
//! This library runs an arbitrary query against a MySQL or SQLite database and
//! streams the result set into a CSV file, one row at a time. It backs a small
//! HTTP service used by a host application that needs query results as a
//! downloadable file rather than as an API payload.
//!
//! # Example
//!
//! ```no_run
//! use query_export::config::{DatabaseConfig, DbDriver};
//! use query_export::{run_export, Config, ExportRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     database: DatabaseConfig {
//!         driver: DbDriver::Sqlite,
//!         database: "./app.db".to_string(),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let request = ExportRequest {
//!     query: "SELECT id, email FROM users".to_string(),
//!     output_file: Some("users.csv".to_string()),
//! };
//! let result = run_export(&config, &request).await?;
//! println!("Wrote {} rows to {}", result.rows_written, result.file_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod config;
pub mod database;
pub mod error_handling;
pub mod export;
mod export_server;
pub mod initialization;

// Re-export public API
pub use config::Config;
pub use error_handling::{ExportError, ExportErrorKind};
pub use export::{handle_export, run_export, ExportRequest, ExportResult};
pub use export_server::{router, start_export_server, ExportResponse};
