//! Unified error types for the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for knowledge base loading.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The data file could not be read.
    #[error("failed to read knowledge base {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file is not valid JSON or does not match the expected shape.
    #[error("failed to parse knowledge base {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
