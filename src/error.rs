//! Error types
//!
//! Only schema problems and missing HTML are fatal. A field that cannot be
//! resolved is not an error: it shows up as `found: false` in the result.

use std::path::PathBuf;

use thiserror::Error;

/// Unreadable or malformed extraction schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read schema file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in schema: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("malformed schema: {0}")]
    Malformed(String),

    #[error("field '{field}' invalid confidence: {value} (must be 0-100)")]
    ConfidenceOutOfRange { field: String, value: f64 },
}

/// Fatal precondition failure for a single extraction call
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing required input: html")]
    MissingHtml,

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
