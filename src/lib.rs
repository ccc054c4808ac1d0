//! Bookstore Reader
//!
//! Text extraction, metadata and word-boundary pagination for uploaded
//! EPUB and FB2 books, memoized behind an expiring cache.
//!
//! # Modules
//!
//! - `document`: Format-agnostic errors, types and the adapter trait
//! - `formats`: EPUB and FB2 adapters plus extension dispatch
//! - `pagination`: Boundary-list pagination shared by every format
//! - `cache`: Expiring key/value cache with a background sweeper
//! - `reader`: Adapter dispatch plus memoization
//! - `config`: Environment-driven settings
//! - `telemetry`: Tracing subscriber setup for host processes

pub mod cache;
pub mod config;
pub mod document;
pub mod formats;
pub mod pagination;
pub mod reader;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use cache::TtlCache;
pub use config::{ConfigError, ReaderConfig};
pub use document::{BookAdapter, BookFormat, BookInfo, BookSummary, ReaderError, Result, PAGE_SIZE};
pub use formats::{Adapter, EpubAdapter, Fb2Adapter};
pub use pagination::{book_page, count_pages, PageMap};
pub use reader::{CachedValue, ReaderService};
