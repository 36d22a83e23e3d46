//! Error type definitions.
//!
//! This module defines the errors raised while servicing an export request and
//! while initializing the process.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// A configuration value that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid configuration for '{field}': {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field (CLI flag name without dashes)
    pub field: &'static str,
    /// What is wrong and what a valid value looks like
    pub message: String,
}

/// Failure of a single export request.
///
/// The `Display` output is the plain-text body returned to the caller. Engine
/// messages are passed through unchanged.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Transport verb other than POST.
    #[error("Invalid request method")]
    BadMethod,

    /// Body could not be decoded, or a field holds an unusable value.
    #[error("{0}")]
    BadRequest(String),

    /// The `query` field was empty or absent.
    #[error("Missing 'query' parameter")]
    MissingParameter,

    /// The database could not be opened or did not answer the ping.
    #[error("Failed to connect to database: {0}")]
    Connection(String),

    /// The output file could not be created.
    #[error("Failed to create output file: {0}")]
    FileCreate(String),

    /// Writing or flushing the CSV sink failed mid-export.
    #[error("Failed to write output file: {0}")]
    FileWrite(String),

    /// The engine rejected the query.
    #[error("Query execution failed: {0}")]
    Query(String),

    /// The cursor failed after streaming had started.
    #[error("Error reading rows: {0}")]
    RowIteration(String),
}

/// Machine-distinguishable category of an [`ExportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ExportErrorKind {
    BadMethod,
    BadRequest,
    MissingParameter,
    ConnectionError,
    FileError,
    QueryError,
    RowIterationError,
}

impl ExportError {
    /// Builds the error returned for an undecodable request body.
    pub fn invalid_json() -> Self {
        ExportError::BadRequest("Invalid JSON request".to_string())
    }

    pub fn kind(&self) -> ExportErrorKind {
        match self {
            ExportError::BadMethod => ExportErrorKind::BadMethod,
            ExportError::BadRequest(_) => ExportErrorKind::BadRequest,
            ExportError::MissingParameter => ExportErrorKind::MissingParameter,
            ExportError::Connection(_) => ExportErrorKind::ConnectionError,
            ExportError::FileCreate(_) | ExportError::FileWrite(_) => ExportErrorKind::FileError,
            ExportError::Query(_) => ExportErrorKind::QueryError,
            ExportError::RowIteration(_) => ExportErrorKind::RowIterationError,
        }
    }
}

impl std::fmt::Display for ExportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportErrorKind::BadMethod => "bad method",
            ExportErrorKind::BadRequest => "bad request",
            ExportErrorKind::MissingParameter => "missing parameter",
            ExportErrorKind::ConnectionError => "connection error",
            ExportErrorKind::FileError => "file error",
            ExportErrorKind::QueryError => "query error",
            ExportErrorKind::RowIterationError => "row iteration error",
        }
    }

    /// HTTP status code reported for this kind of failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ExportErrorKind::BadMethod => 405,
            ExportErrorKind::BadRequest | ExportErrorKind::MissingParameter => 400,
            ExportErrorKind::ConnectionError
            | ExportErrorKind::FileError
            | ExportErrorKind::QueryError
            | ExportErrorKind::RowIterationError => 500,
        }
    }

    /// Client-side failures are rejected before any resource is acquired.
    pub fn is_validation(&self) -> bool {
        self.status_code() < 500
    }
}
