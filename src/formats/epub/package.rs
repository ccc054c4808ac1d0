//! EPUB container and package (OPF) documents
//!
//! `META-INF/container.xml` names the OPF; the OPF declares the manifest
//! (id -> href) and the spine (reading order of manifest ids).

use std::collections::HashMap;

use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use crate::document::{BookInfo, ReaderError, Result};

/// Archive path of the container manifest
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

// container.xml structures for deserialization

#[derive(Debug, Deserialize)]
struct Container {
    #[serde(default)]
    rootfiles: Option<RootFiles>,
}

#[derive(Debug, Deserialize)]
struct RootFiles {
    #[serde(rename = "rootfile", default)]
    rootfile: Vec<RootFile>,
}

#[derive(Debug, Deserialize)]
struct RootFile {
    #[serde(rename = "@full-path", default)]
    full_path: String,
}

// OPF structures for deserialization

#[derive(Debug, Deserialize)]
struct OpfPackage {
    #[serde(default)]
    manifest: Option<OpfManifest>,
    #[serde(default)]
    spine: Option<OpfSpine>,
}

#[derive(Debug, Deserialize)]
struct OpfManifest {
    #[serde(rename = "item", default)]
    item: Vec<OpfItem>,
}

#[derive(Debug, Deserialize)]
struct OpfItem {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@href", default)]
    href: String,
}

#[derive(Debug, Deserialize)]
struct OpfSpine {
    #[serde(rename = "itemref", default)]
    itemref: Vec<OpfItemRef>,
}

#[derive(Debug, Deserialize)]
struct OpfItemRef {
    #[serde(rename = "@idref", default)]
    idref: String,
}

/// Find the OPF path declared by `container.xml` (first rootfile wins)
pub fn rootfile_path(container_xml: &str) -> Result<String> {
    let container: Container = from_str(strip_bom(container_xml))?;
    container
        .rootfiles
        .and_then(|r| r.rootfile.into_iter().next())
        .map(|r| r.full_path.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ReaderError::malformed("container.xml declares no rootfile"))
}

/// Manifest and spine of a package document
#[derive(Debug, Clone, Default)]
pub struct Package {
    /// Manifest item id -> href (relative to the OPF directory)
    pub manifest: HashMap<String, String>,
    /// Manifest ids in reading order
    pub spine: Vec<String>,
}

impl Package {
    /// Parse the manifest and spine out of an OPF document
    pub fn parse(opf_xml: &str) -> Result<Self> {
        let package: OpfPackage = from_str(strip_bom(opf_xml))?;

        let manifest = package
            .manifest
            .map(|m| m.item.into_iter().map(|i| (i.id, i.href)).collect())
            .unwrap_or_default();
        let spine = package
            .spine
            .map(|s| s.itemref.into_iter().map(|r| r.idref).collect())
            .unwrap_or_default();

        Ok(Self { manifest, spine })
    }

    /// Hrefs of the spine in reading order (unknown ids yield an empty href)
    pub fn spine_hrefs(&self) -> impl Iterator<Item = &str> + '_ {
        self.spine
            .iter()
            .map(|id| self.manifest.get(id).map(String::as_str).unwrap_or(""))
    }
}

/// Scan the OPF token stream for the first title, creator and description
///
/// Elements are matched by local name anywhere in the document, so both
/// `dc:title` and a bare `title` count. The first non-empty value of each
/// field wins.
pub fn book_info(opf_xml: &str) -> Result<BookInfo> {
    #[derive(Clone, Copy)]
    enum Field {
        Title,
        Author,
        Annotation,
    }

    let mut reader = Reader::from_str(strip_bom(opf_xml));
    let mut info = BookInfo::default();
    let mut capture: Option<(Field, usize, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if let Some((_, depth, _)) = capture.as_mut() {
                    *depth += 1;
                    continue;
                }
                let field = match e.local_name().as_ref() {
                    b"title" if info.title.is_empty() => Some(Field::Title),
                    b"creator" if info.author.is_empty() => Some(Field::Author),
                    b"description" if info.annotation.is_empty() => Some(Field::Annotation),
                    _ => None,
                };
                capture = field.map(|f| (f, 0, String::new()));
            }
            Event::End(_) => {
                let closed = match capture.as_mut() {
                    Some((_, depth, _)) if *depth > 0 => {
                        *depth -= 1;
                        false
                    }
                    Some(_) => true,
                    None => false,
                };
                if !closed {
                    continue;
                }
                if let Some((field, _, text)) = capture.take() {
                    let value = text.trim().to_string();
                    match field {
                        Field::Title => info.title = value,
                        Field::Author => info.author = value,
                        Field::Annotation => info.annotation = value,
                    }
                }
            }
            Event::Text(e) => {
                if let Some((_, _, text)) = capture.as_mut() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some((_, _, text)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(info)
}

pub(crate) fn strip_bom(xml: &str) -> &str {
    xml.strip_prefix('\u{feff}').unwrap_or(xml)
}
