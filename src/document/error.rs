//! Reader error types
//!
//! Unified error handling for both book formats (EPUB, FB2) and pagination.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Unified reader error type
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Source file could not be opened or read
    #[error("Unreadable file {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Container or XML could not be parsed, or required structure is missing
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// File extension not handled by any adapter
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Requested page does not exist for this text
    #[error("Page {page} out of range (total pages: {total})")]
    PageOutOfRange { page: usize, total: usize },
}

impl ReaderError {
    /// Wrap an I/O error with the path it happened on
    pub fn unreadable(path: &Path, source: std::io::Error) -> Self {
        ReaderError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Build a malformed-document error from anything printable
    pub fn malformed(msg: impl std::fmt::Display) -> Self {
        ReaderError::MalformedDocument(msg.to_string())
    }
}

/// Result type alias for reader operations
pub type Result<T> = std::result::Result<T, ReaderError>;

impl From<quick_xml::Error> for ReaderError {
    fn from(err: quick_xml::Error) -> Self {
        ReaderError::MalformedDocument(format!("XML error: {}", err))
    }
}

impl From<quick_xml::de::DeError> for ReaderError {
    fn from(err: quick_xml::de::DeError) -> Self {
        ReaderError::MalformedDocument(format!("XML deserialization error: {}", err))
    }
}

impl From<zip::result::ZipError> for ReaderError {
    fn from(err: zip::result::ZipError) -> Self {
        ReaderError::MalformedDocument(format!("ZIP error: {}", err))
    }
}
