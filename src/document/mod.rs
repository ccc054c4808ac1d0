//! Unified book abstraction
//!
//! This module provides the format-agnostic surface shared by the EPUB and
//! FB2 adapters: the error taxonomy, the metadata types and the
//! [`BookAdapter`] capability set.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  ReaderService                          │
//! │  (extension dispatch + TtlCache memoization)            │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//!                ┌───────────┴───────────┐
//!                ▼                       ▼
//!        ┌──────────────┐        ┌──────────────┐
//!        │ EpubAdapter  │        │  Fb2Adapter  │
//!        └──────────────┘        └──────────────┘
//!                │                       │
//!                └───────────┬───────────┘
//!                            ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │                  PageMap                            │
//!   │  (word-boundary pagination shared by all formats)   │
//!   └─────────────────────────────────────────────────────┘
//! ```

mod error;
mod traits;
mod types;

pub use error::{ReaderError, Result};
pub use traits::BookAdapter;
pub use types::{BookFormat, BookInfo, BookSummary, PAGE_SIZE};
