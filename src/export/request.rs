//! Export request decoding and validation.

use std::ffi::OsStr;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::{CSV_EXTENSION, DEFAULT_FILE_PREFIX};
use crate::error_handling::ExportError;

/// Body of a `POST /export` request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportRequest {
    /// SQL text, executed as-is
    #[serde(default)]
    pub query: String,
    /// File name inside the export directory
    #[serde(default)]
    pub output_file: Option<String>,
}

impl ExportRequest {
    /// Decodes the first JSON value of the body and validates it.
    ///
    /// Bytes after that value are ignored.
    pub fn parse(body: &[u8]) -> Result<Self, ExportError> {
        let mut decoder = serde_json::Deserializer::from_slice(body);
        let request =
            ExportRequest::deserialize(&mut decoder).map_err(|_| ExportError::invalid_json())?;
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if self.query.is_empty() {
            return Err(ExportError::MissingParameter);
        }
        if let Some(name) = self.explicit_file_name() {
            if !is_plain_file_name(name) {
                return Err(ExportError::BadRequest(format!(
                    "Invalid 'output_file' parameter: '{}' must be a file name without directories",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Name of the output file, synthesized from `now` when none was given.
    ///
    /// Synthesized names have one-second granularity: two unnamed exports in
    /// the same second write to the same file.
    pub fn file_name(&self, now: DateTime<Utc>) -> String {
        match self.explicit_file_name() {
            Some(name) => name.to_string(),
            None => default_file_name(now),
        }
    }

    fn explicit_file_name(&self) -> Option<&str> {
        self.output_file.as_deref().filter(|name| !name.is_empty())
    }
}

/// `export_<unix seconds>.csv`
pub fn default_file_name(now: DateTime<Utc>) -> String {
    format!(
        "{}{}.{}",
        DEFAULT_FILE_PREFIX,
        now.timestamp(),
        CSV_EXTENSION
    )
}

fn is_plain_file_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && Path::new(name).file_name() == Some(OsStr::new(name))
}
