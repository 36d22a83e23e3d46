//! Query-to-CSV export.
//!
//! This module provides the export pipeline:
//! - Request decoding and validation (`request`)
//! - Result streaming from a live cursor into a CSV sink (`streamer`)
//! - Orchestration of one request from connection to response (`coordinator`)

mod coordinator;
mod request;
mod streamer;
mod types;

pub use coordinator::{handle_export, public_url, run_export};
pub use request::{default_file_name, ExportRequest};
pub use streamer::{stream, write_header, write_rows};
pub use types::{ExportResult, StreamSummary};
