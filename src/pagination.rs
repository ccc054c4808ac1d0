//! Word-boundary pagination
//!
//! A page boundary advances at least `page_size` code points, then extends
//! forward until the next whitespace code point (or end of text), so no page
//! splits a word. The whitespace character itself starts the next page.
//!
//! [`PageMap`] computes every boundary in one linear scan. Page count and
//! page content are both answered from the same boundary list, so page `n`
//! exists exactly when `1 <= n <= page_count()`.

use std::ops::Range;

use crate::document::{ReaderError, Result};

/// Ordered page boundaries for one text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMap {
    /// Byte offset where each page ends (exclusive); the last equals the text length
    ends: Vec<usize>,
}

impl PageMap {
    /// Scan `text` once and record every page end
    pub fn build(text: &str, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let mut ends = Vec::new();
        if text.is_empty() {
            return Self { ends };
        }

        let mut chars = text.char_indices().peekable();
        loop {
            let mut taken = 0;
            while taken < page_size && chars.next().is_some() {
                taken += 1;
            }
            while let Some(&(_, c)) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                chars.next();
            }

            let end = chars.peek().map_or(text.len(), |&(idx, _)| idx);
            ends.push(end);
            if end == text.len() {
                break;
            }
        }

        Self { ends }
    }

    /// Total number of pages
    pub fn page_count(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Untrimmed byte range of a 1-based page
    pub fn range(&self, page_num: usize) -> Result<Range<usize>> {
        let total = self.page_count();
        if page_num == 0 || page_num > total {
            return Err(ReaderError::PageOutOfRange {
                page: page_num,
                total,
            });
        }

        let start = if page_num == 1 {
            0
        } else {
            self.ends[page_num - 2]
        };
        Ok(start..self.ends[page_num - 1])
    }

    /// Trimmed content of a 1-based page
    ///
    /// `text` must be the same text this map was built from.
    pub fn page<'a>(&self, text: &'a str, page_num: usize) -> Result<&'a str> {
        let range = self.range(page_num)?;
        text.get(range)
            .map(str::trim)
            .ok_or(ReaderError::PageOutOfRange {
                page: page_num,
                total: self.page_count(),
            })
    }
}

/// Number of pages `text` splits into
pub fn count_pages(text: &str, page_size: usize) -> usize {
    PageMap::build(text, page_size).page_count()
}

/// Trimmed content of page `page_num` (1-based)
pub fn book_page(text: &str, page_num: usize, page_size: usize) -> Result<&str> {
    PageMap::build(text, page_size).page(text, page_num)
}
