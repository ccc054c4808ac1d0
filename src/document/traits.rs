//! Book adapter trait
//!
//! Format-agnostic capability set implemented by every format adapter.

use std::path::Path;

use super::error::Result;
use super::types::{BookFormat, BookInfo, PAGE_SIZE};
use crate::pagination;

/// Format-specific book reader
///
/// Adapters are stateless: every call opens the file at `path` afresh.
/// Memoization is the job of [`crate::ReaderService`].
pub trait BookAdapter: Send + Sync {
    /// Format handled by this adapter
    fn format(&self) -> BookFormat;

    /// Extract the flattened plain text of the whole book
    fn parse(&self, path: &Path) -> Result<String>;

    /// Count chapters by walking the document structure (no text extraction)
    fn chapters_count(&self, path: &Path) -> Result<u32>;

    /// Extract title, author and annotation
    fn book_info(&self, path: &Path) -> Result<BookInfo>;

    /// Slice already-extracted text into the trimmed content of a 1-based page
    ///
    /// Always pages at [`PAGE_SIZE`]. [`crate::ReaderService`] pages at its
    /// configured size instead, so the two agree only while that size is
    /// left at the default.
    fn book_page(&self, text: &str, page_num: usize) -> Result<String> {
        pagination::book_page(text, page_num, PAGE_SIZE).map(str::to_string)
    }
}
