//! FB2 (FictionBook 2) format implementation
//!
//! FB2 is a single XML file: `description` carries the metadata, one or
//! more `body` elements carry the text as nested `section`s.

mod body;
mod description;
mod encoding;

use std::path::Path;

use crate::document::{BookAdapter, BookFormat, BookInfo, ReaderError, Result};

pub use body::SUBTITLE_BREAK;

/// Stateless FB2 adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct Fb2Adapter;

impl Fb2Adapter {
    pub fn new() -> Self {
        Self
    }

    /// Read the file and decode it to UTF-8
    fn read(path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| ReaderError::unreadable(path, e))?;
        Ok(encoding::decode(&bytes))
    }
}

impl BookAdapter for Fb2Adapter {
    fn format(&self) -> BookFormat {
        BookFormat::Fb2
    }

    fn parse(&self, path: &Path) -> Result<String> {
        let xml = Self::read(path)?;
        let text = body::extract_text(&xml)?;
        tracing::debug!(path = %path.display(), chars = text.chars().count(), "Extracted FB2 text");
        Ok(text)
    }

    fn chapters_count(&self, path: &Path) -> Result<u32> {
        body::count_chapters(&Self::read(path)?)
    }

    fn book_info(&self, path: &Path) -> Result<BookInfo> {
        description::book_info(&Self::read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_file;
    use tempfile::TempDir;

    const BOOK: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0">
  <description>
    <title-info>
      <author><first-name>Lev</first-name><last-name>Tolstoy</last-name></author>
      <book-title>War and Peace</book-title>
      <annotation><p>A novel.</p></annotation>
    </title-info>
  </description>
  <body>
    <title><p>War and Peace</p></title>
    <section>
      <title><p>Book One</p></title>
      <section><title><p>I</p></title><p>Well, Prince, so Genoa and Lucca are now just family estates.</p></section>
      <section><title><p>II</p></title><p>Anna Pavlovna's drawing room was gradually filling.</p></section>
    </section>
    <section>
      <title><p>Book Two</p></title>
      <p>At the beginning of the year 1806 Nicholas Rostov returned home.</p>
    </section>
  </body>
</FictionBook>"#;

    #[test]
    fn test_parse() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "war.fb2", BOOK.as_bytes());

        let text = Fb2Adapter.parse(&path).unwrap();
        assert!(text.starts_with("War and Peace\n\nBook One\n\nI\n\nWell, Prince"));
        assert!(text.ends_with("Nicholas Rostov returned home."));
        assert!(!text.contains("A novel."));
    }

    #[test]
    fn test_chapters_count_top_level_only() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "war.fb2", BOOK.as_bytes());

        assert_eq!(Fb2Adapter.chapters_count(&path).unwrap(), 2);
    }

    #[test]
    fn test_book_info() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "war.fb2", BOOK.as_bytes());

        let info = Fb2Adapter.book_info(&path).unwrap();
        assert_eq!(info.title, "War and Peace");
        assert_eq!(info.author, "Lev Tolstoy");
        assert_eq!(info.annotation, "A novel.");
    }

    #[test]
    fn test_windows_1251_file() {
        let xml = "<?xml version=\"1.0\" encoding=\"windows-1251\"?>\
                   <FictionBook><description><title-info>\
                   <author><first-name>Лев</first-name><last-name>Толстой</last-name></author>\
                   <book-title>Война и мир</book-title></title-info></description>\
                   <body><section><p>Ну, князь, Генуя и Лукка стали не больше как поместьями.</p></section></body>\
                   </FictionBook>";
        let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(xml);
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "voina.fb2", &bytes);

        assert_eq!(
            Fb2Adapter.parse(&path).unwrap(),
            "Ну, князь, Генуя и Лукка стали не больше как поместьями."
        );
        let info = Fb2Adapter.book_info(&path).unwrap();
        assert_eq!(info.title, "Война и мир");
        assert_eq!(info.author, "Лев Толстой");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.fb2");
        assert!(matches!(
            Fb2Adapter.parse(&path),
            Err(ReaderError::UnreadableFile { .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "broken.fb2",
            b"<FictionBook><body><section><p>oops</section></body></FictionBook>",
        );
        assert!(matches!(
            Fb2Adapter.parse(&path),
            Err(ReaderError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_book_page_is_word_aligned() {
        // code point 1500 falls inside the long word; the page keeps it whole
        let text = format!("{}abcdefghijklmnop rest", "x ".repeat(745));
        let page = Fb2Adapter.book_page(&text, 1).unwrap();
        assert!(page.ends_with("abcdefghijklmnop"));
        assert_eq!(Fb2Adapter.book_page(&text, 2).unwrap(), "rest");
        assert!(matches!(
            Fb2Adapter.book_page(&text, 3),
            Err(ReaderError::PageOutOfRange { page: 3, total: 2 })
        ));
    }
}
