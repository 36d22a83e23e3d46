//! Error handling.
//!
//! This module provides:
//! - The export error taxonomy and its mapping to HTTP status codes
//! - Initialization and configuration validation errors
//!
//! Export errors are categorized into:
//! - **Validation**: rejected before any resource is acquired (4xx)
//! - **Resource**: connection, file, query and cursor failures (5xx)

mod types;

// Re-export public API
pub use types::{ConfigValidationError, ExportError, ExportErrorKind, InitializationError};
