//! Database access layer.
//!
//! This module provides:
//! - Per-request connections to MySQL or SQLite, verified with a ping
//! - The closed set of cell values a result row decodes into

mod connection;
mod value;

pub use connection::DbConnection;
pub use value::{DecodeCells, RowValue};
