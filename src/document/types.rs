//! Core book types
//!
//! Format-agnostic types shared by the adapters and the reader service.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default number of code points per page
pub const PAGE_SIZE: usize = 1500;

/// Book file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    Fb2,
    Epub,
}

impl BookFormat {
    /// Detect format from file extension (case-insensitive, no leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "fb2" => Some(Self::Fb2),
            "epub" => Some(Self::Epub),
            _ => None,
        }
    }

    /// Detect format from a file path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical lower-case extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Fb2 => "fb2",
            Self::Epub => "epub",
        }
    }
}

impl std::fmt::Display for BookFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Bibliographic metadata
///
/// Fields are empty strings when the document does not carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInfo {
    pub title: String,
    pub author: String,
    pub annotation: String,
}

/// Everything the catalog stores about a freshly uploaded book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub info: BookInfo,
    pub chapters: u32,
    pub pages: usize,
}
