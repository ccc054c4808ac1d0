//! EPUB format implementation
//!
//! EPUB is a ZIP archive: `META-INF/container.xml` points at the package
//! document (OPF), whose manifest and spine give the reading order of the
//! XHTML content documents.
//!
//! # Failure policy
//!
//! A missing or corrupt container/OPF aborts the whole operation. A single
//! spine entry that is missing from the archive, cannot be read, or has
//! malformed markup is skipped and extraction continues with the rest.

mod package;
mod xhtml;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::result::ZipError;
use zip::ZipArchive;

use crate::document::{BookAdapter, BookFormat, BookInfo, ReaderError, Result};

pub use package::{Package, CONTAINER_PATH};

/// Spine entry that never contributes text
const COVER_HREF: &str = "cover.xhtml";

/// Upper bound on the buffer reserved up front for one archive entry
const MAX_PREALLOC: u64 = 1 << 20;

/// Stateless EPUB adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct EpubAdapter;

impl EpubAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl BookAdapter for EpubAdapter {
    fn format(&self) -> BookFormat {
        BookFormat::Epub
    }

    fn parse(&self, path: &Path) -> Result<String> {
        let mut book = EpubArchive::open(path)?;
        let opf_path = book.opf_path()?;
        let package = Package::parse(&book.read_entry(&opf_path)?)?;
        let opf_dir = opf_path.rsplit_once('/').map_or("", |(dir, _)| dir);

        let hrefs: Vec<String> = package
            .spine_hrefs()
            .filter(|href| !href.is_empty() && *href != COVER_HREF)
            .map(str::to_string)
            .collect();

        let paragraphs = hrefs.iter().fold(Vec::new(), |mut acc, href| {
            match book.spine_entry_paragraphs(opf_dir, href) {
                Ok(found) => acc.extend(found),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        href = %href,
                        error = %e,
                        "Skipping unreadable EPUB spine entry"
                    );
                }
            }
            acc
        });

        tracing::debug!(
            path = %path.display(),
            spine = hrefs.len(),
            paragraphs = paragraphs.len(),
            "Extracted EPUB text"
        );

        Ok(paragraphs.join("\n\n"))
    }

    /// Structural proxy: every `.html`/`.xhtml` entry whose file name does
    /// not start with `cover`. Independent of the spine, so it can differ
    /// from the number of reader-visible chapters.
    fn chapters_count(&self, path: &Path) -> Result<u32> {
        let book = EpubArchive::open(path)?;
        let count = book
            .archive
            .file_names()
            .filter(|name| is_chapter_entry(name))
            .count();
        Ok(saturating_count(count))
    }

    fn book_info(&self, path: &Path) -> Result<BookInfo> {
        let mut book = EpubArchive::open(path)?;
        let opf_path = book.opf_path()?;
        package::book_info(&book.read_entry(&opf_path)?)
    }
}

/// An opened EPUB archive
struct EpubArchive<'p> {
    path: &'p Path,
    archive: ZipArchive<File>,
}

impl<'p> EpubArchive<'p> {
    fn open(path: &'p Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ReaderError::unreadable(path, e))?;
        let archive = ZipArchive::new(file).map_err(|e| match e {
            ZipError::Io(source) => ReaderError::unreadable(path, source),
            other => other.into(),
        })?;
        Ok(Self { path, archive })
    }

    fn opf_path(&mut self) -> Result<String> {
        let container = self.read_entry(CONTAINER_PATH)?;
        package::rootfile_path(&container)
    }

    /// Read an entry as text; invalid UTF-8 is replaced rather than rejected
    fn read_entry(&mut self, name: &str) -> Result<String> {
        let mut entry = self.archive.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => {
                ReaderError::malformed(format!("archive entry not found: {}", name))
            }
            other => other.into(),
        })?;

        let mut data = Vec::with_capacity(prealloc_len(entry.size()));
        entry
            .read_to_end(&mut data)
            .map_err(|e| ReaderError::unreadable(self.path, e))?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    /// Resolve a spine href to an archive entry name
    ///
    /// The href joined onto the OPF directory is tried first; otherwise the
    /// first entry whose name ends with the href is used.
    fn resolve(&self, opf_dir: &str, href: &str) -> Option<String> {
        let href = href.split('#').next().unwrap_or(href);
        let joined = if opf_dir.is_empty() {
            href.to_string()
        } else {
            format!("{}/{}", opf_dir, href)
        };

        if self.archive.index_for_name(&joined).is_some() {
            return Some(joined);
        }
        self.archive
            .file_names()
            .find(|name| name.ends_with(href))
            .map(str::to_string)
    }

    fn spine_entry_paragraphs(&mut self, opf_dir: &str, href: &str) -> Result<Vec<String>> {
        let name = self
            .resolve(opf_dir, href)
            .ok_or_else(|| ReaderError::malformed(format!("spine entry not in archive: {}", href)))?;
        let content = self.read_entry(&name)?;
        xhtml::paragraphs(&content)
    }
}

/// Buffer to reserve for an entry; the declared size is not trusted
fn prealloc_len(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOC)).unwrap_or(0)
}

fn saturating_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn is_chapter_entry(name: &str) -> bool {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    let lower = file_name.to_lowercase();
    (lower.ends_with(".html") || lower.ends_with(".xhtml")) && !lower.starts_with("cover")
}
