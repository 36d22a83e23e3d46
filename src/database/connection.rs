//! Per-request database connections.
//!
//! Every export opens its own connection and closes it when done; nothing is
//! pooled or shared between requests.

use std::str::FromStr;

use log::{debug, error, warn};
use sqlx::mysql::MySqlConnectOptions;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection, MySqlConnection, SqliteConnection};

use crate::config::{DatabaseConfig, DbDriver};
use crate::error_handling::ExportError;

/// A live connection to one of the supported engines.
#[derive(Debug)]
pub enum DbConnection {
    MySql(MySqlConnection),
    Sqlite(SqliteConnection),
}

impl DbConnection {
    /// Opens a connection and verifies it with a ping round-trip.
    ///
    /// Any failure, including a failed ping, is reported as
    /// [`ExportError::Connection`]; a connection that fails the ping is
    /// dropped before returning.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, ExportError> {
        let mut connection = match config.driver {
            DbDriver::MySql => {
                let options = MySqlConnectOptions::new()
                    .host(&config.host)
                    .port(config.port)
                    .username(&config.username)
                    .password(&config.password)
                    .database(&config.database);
                DbConnection::MySql(options.connect().await.map_err(connection_error)?)
            }
            DbDriver::Sqlite => {
                let options = sqlite_options(&config.database)?;
                DbConnection::Sqlite(options.connect().await.map_err(connection_error)?)
            }
        };

        connection.ping().await?;
        debug!("Opened {:?} connection to '{}'", config.driver, config.database);
        Ok(connection)
    }

    async fn ping(&mut self) -> Result<(), ExportError> {
        let result = match self {
            DbConnection::MySql(conn) => conn.ping().await,
            DbConnection::Sqlite(conn) => conn.ping().await,
        };
        result.map_err(connection_error)
    }

    /// Closes the connection gracefully. Failures are logged, not returned:
    /// the export outcome is already decided by the time this runs.
    pub async fn close(self) {
        let result = match self {
            DbConnection::MySql(conn) => conn.close().await,
            DbConnection::Sqlite(conn) => conn.close().await,
        };
        if let Err(e) = result {
            warn!("Failed to close database connection cleanly: {e}");
        }
    }
}

/// SQLite databases are opened read-write but never created: a missing file is
/// a connection error, not an empty database.
fn sqlite_options(path: &str) -> Result<SqliteConnectOptions, ExportError> {
    if path == ":memory:" {
        return SqliteConnectOptions::from_str("sqlite::memory:").map_err(connection_error);
    }
    Ok(SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(false))
}

fn connection_error(e: sqlx::Error) -> ExportError {
    error!("Failed to connect to database: {e}");
    ExportError::Connection(e.to_string())
}
