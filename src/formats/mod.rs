//! Format-specific book implementations
//!
//! The set of formats is closed: [`Adapter`] is a tagged variant over the
//! EPUB and FB2 adapters, resolved from the lower-cased file extension.

pub mod epub;
pub mod fb2;

use std::path::Path;

use crate::document::{BookAdapter, BookFormat, BookInfo, ReaderError, Result};

pub use epub::EpubAdapter;
pub use fb2::Fb2Adapter;

/// One of the supported format adapters
#[derive(Debug, Clone, Copy)]
pub enum Adapter {
    Fb2(Fb2Adapter),
    Epub(EpubAdapter),
}

impl Adapter {
    /// Adapter for a known format
    pub fn for_format(format: BookFormat) -> Self {
        match format {
            BookFormat::Fb2 => Adapter::Fb2(Fb2Adapter),
            BookFormat::Epub => Adapter::Epub(EpubAdapter),
        }
    }

    /// Resolve the adapter from the file extension of `path`
    pub fn for_path(path: &Path) -> Result<Self> {
        BookFormat::from_path(path).map(Self::for_format).ok_or_else(|| {
            let ext = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            ReaderError::UnsupportedFormat(ext)
        })
    }

    fn inner(&self) -> &dyn BookAdapter {
        match self {
            Adapter::Fb2(adapter) => adapter,
            Adapter::Epub(adapter) => adapter,
        }
    }
}

impl BookAdapter for Adapter {
    fn format(&self) -> BookFormat {
        self.inner().format()
    }

    fn parse(&self, path: &Path) -> Result<String> {
        self.inner().parse(path)
    }

    fn chapters_count(&self, path: &Path) -> Result<u32> {
        self.inner().chapters_count(path)
    }

    fn book_info(&self, path: &Path) -> Result<BookInfo> {
        self.inner().book_info(path)
    }

    fn book_page(&self, text: &str, page_num: usize) -> Result<String> {
        self.inner().book_page(text, page_num)
    }
}
