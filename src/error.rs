//! Error types for zonelabel library.

use std::io;
use thiserror::Error;

/// Result type alias for zonelabel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during feature extraction and reconstruction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing a serialized document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading annotated training markup.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document has more tokens than the configured ceiling.
    #[error("The document has {count} tokens, but the limit is {limit}")]
    TooManyTokens {
        /// Number of tokens in the document
        count: usize,
        /// Configured ceiling
        limit: usize,
    },

    /// The document has more blocks than the configured ceiling.
    #[error("The document has {count} blocks, but the limit is {limit}")]
    TooManyBlocks {
        /// Number of blocks in the document
        count: usize,
        /// Configured ceiling
        limit: usize,
    },

    /// The label stream ran past the units of the original document.
    #[error("Label record {record} has no matching unit in the document")]
    LostSynchronization {
        /// Zero-based index of the offending label record
        record: usize,
    },

    /// A zone refers to blocks or tokens the document does not have.
    #[error("Invalid zone: {0}")]
    InvalidZone(String),

    /// The sequence labeler failed.
    #[error("Labeling error: {0}")]
    Labeler(String),
}

impl Error {
    /// Returns true for the size ceilings that reject a whole document.
    pub fn is_resource_limit(&self) -> bool {
        matches!(self, Error::TooManyTokens { .. } | Error::TooManyBlocks { .. })
    }
}
