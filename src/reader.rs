//! Reader service: format dispatch plus memoization
//!
//! Every operation resolves the adapter from the file extension, then looks
//! the result up in the [`TtlCache`] under a key derived from the operation
//! and path. A miss runs the adapter and stores the result.
//!
//! Page fetches build on the cached text and on a cached [`PageMap`], so
//! any page after the first costs one slice. Page maps and page entries
//! remember the text they were cut from; once the text entry is recomputed
//! they no longer match it and are rebuilt.

use std::path::Path;
use std::sync::Arc;

use crate::cache::TtlCache;
use crate::config::ReaderConfig;
use crate::document::{BookAdapter, BookInfo, BookSummary, Result};
use crate::formats::Adapter;
use crate::pagination::PageMap;

/// Cache keys, one namespace per operation
pub mod keys {
    use std::path::Path;

    pub fn parse(path: &Path) -> String {
        format!("bookParse:{}", path.display())
    }

    pub fn info(path: &Path) -> String {
        format!("bookInfo:{}", path.display())
    }

    pub fn chapters_count(path: &Path) -> String {
        format!("bookChaptersCount:{}", path.display())
    }

    pub fn pages(path: &Path) -> String {
        format!("bookPages:{}", path.display())
    }

    /// Prefix shared by every page entry of `path`
    pub fn page_prefix(path: &Path) -> String {
        format!("{}:", path.display())
    }

    pub fn page(path: &Path, page_num: usize) -> String {
        format!("{}:{}", path.display(), page_num)
    }
}

/// A memoized artefact
#[derive(Debug, Clone)]
pub enum CachedValue {
    Text(Arc<str>),
    Info(BookInfo),
    Chapters(u32),
    /// Boundaries of `source`
    Pages {
        source: Arc<str>,
        pages: Arc<PageMap>,
    },
    /// One page cut from `source`
    Page { source: Arc<str>, page: String },
}

/// Adapter dispatch with a shared expiring cache
#[derive(Debug, Clone)]
pub struct ReaderService {
    config: ReaderConfig,
    cache: TtlCache<CachedValue>,
}

impl ReaderService {
    /// Create a service owning a fresh cache
    pub fn new(config: ReaderConfig) -> Self {
        let cache = TtlCache::new(config.cache_ttl);
        Self { config, cache }
    }

    /// Create a service on top of an existing cache
    pub fn with_cache(config: ReaderConfig, cache: TtlCache<CachedValue>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn cache(&self) -> &TtlCache<CachedValue> {
        &self.cache
    }

    /// Full flattened text of the book
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<String> {
        self.text(path.as_ref()).map(|text| text.to_string())
    }

    pub fn chapters_count(&self, path: impl AsRef<Path>) -> Result<u32> {
        let path = path.as_ref();
        let adapter = Adapter::for_path(path)?;
        self.memoize(
            keys::chapters_count(path),
            |value| match value {
                CachedValue::Chapters(count) => Some(count),
                _ => None,
            },
            CachedValue::Chapters,
            || adapter.chapters_count(path),
        )
    }

    pub fn book_info(&self, path: impl AsRef<Path>) -> Result<BookInfo> {
        let path = path.as_ref();
        let adapter = Adapter::for_path(path)?;
        self.memoize(
            keys::info(path),
            |value| match value {
                CachedValue::Info(info) => Some(info),
                _ => None,
            },
            CachedValue::Info,
            || adapter.book_info(path),
        )
    }

    /// Trimmed content of the 1-based page `page_num`
    pub fn book_page(&self, path: impl AsRef<Path>, page_num: usize) -> Result<String> {
        let path = path.as_ref();
        let text = self.text(path)?;
        self.memoize(
            keys::page(path, page_num),
            |value| match value {
                CachedValue::Page { source, page } if Arc::ptr_eq(&source, &text) => Some(page),
                _ => None,
            },
            |page| CachedValue::Page {
                source: Arc::clone(&text),
                page,
            },
            || {
                let pages = self.page_map(path, &text)?;
                pages.page(&text, page_num).map(str::to_string)
            },
        )
    }

    /// Total number of pages, consistent with [`book_page`](Self::book_page)
    pub fn page_count(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = self.text(path)?;
        Ok(self.page_map(path, &text)?.page_count())
    }

    /// Metadata, chapter count and page count in one call
    pub fn describe(&self, path: impl AsRef<Path>) -> Result<BookSummary> {
        let path = path.as_ref();
        Ok(BookSummary {
            info: self.book_info(path)?,
            chapters: self.chapters_count(path)?,
            pages: self.page_count(path)?,
        })
    }

    /// Forget everything cached for `path`
    pub fn invalidate(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut removed = 0;
        for key in [
            keys::parse(path),
            keys::info(path),
            keys::chapters_count(path),
            keys::pages(path),
        ] {
            removed += usize::from(self.cache.delete(&key));
        }
        removed += self.cache.delete_prefix(&keys::page_prefix(path));
        tracing::debug!(path = %path.display(), removed = removed, "Invalidated cached book");
    }

    /// Spawn the periodic sweep of expired cache entries
    pub fn start_sweeper(&self) -> tokio::task::JoinHandle<()> {
        tracing::info!(
            ttl_secs = self.config.cache_ttl.as_secs(),
            interval_secs = self.config.sweep_interval.as_secs(),
            "Starting reader cache sweeper"
        );
        self.cache.start_sweeper(self.config.sweep_interval)
    }

    /// Clear the cache
    pub fn shutdown(&self) {
        self.cache.clean();
    }

    fn text(&self, path: &Path) -> Result<Arc<str>> {
        let adapter = Adapter::for_path(path)?;
        self.memoize(
            keys::parse(path),
            |value| match value {
                CachedValue::Text(text) => Some(text),
                _ => None,
            },
            CachedValue::Text,
            || adapter.parse(path).map(Arc::from),
        )
    }

    /// Page map of `text`; a cached map built from another text is rebuilt
    fn page_map(&self, path: &Path, text: &Arc<str>) -> Result<Arc<PageMap>> {
        self.memoize(
            keys::pages(path),
            |value| match value {
                CachedValue::Pages { source, pages } if Arc::ptr_eq(&source, text) => Some(pages),
                _ => None,
            },
            |pages| CachedValue::Pages {
                source: Arc::clone(text),
                pages,
            },
            || Ok(Arc::new(PageMap::build(text, self.config.page_size))),
        )
    }

    fn memoize<T>(
        &self,
        key: String,
        extract: impl FnOnce(CachedValue) -> Option<T>,
        wrap: impl FnOnce(T) -> CachedValue,
        compute: impl FnOnce() -> Result<T>,
    ) -> Result<T>
    where
        T: Clone,
    {
        if let Some(value) = self.cache.get(&key).and_then(extract) {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(value);
        }

        tracing::debug!(key = %key, "Cache miss");
        let value = compute()?;
        self.cache
            .set_with_ttl(key, wrap(value.clone()), self.config.cache_ttl);
        Ok(value)
    }
}

impl Default for ReaderService {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}
