//! Fixture builders shared by the unit tests

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::{write::SimpleFileOptions, ZipWriter};

/// Write raw bytes to `dir/name`
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Minimal FB2 document with one top-level section per paragraph list
pub fn fb2_book(title: &str, author_last: &str, sections: &[&[&str]]) -> String {
    let body: String = sections
        .iter()
        .map(|paragraphs| {
            let ps: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();
            format!("<section>{}</section>", ps)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0">
<description><title-info><author><last-name>{}</last-name></author><book-title>{}</book-title></title-info></description>
<body>{}</body>
</FictionBook>"#,
        author_last, title, body
    )
}

struct Item {
    id: String,
    href: String,
    content: Option<String>,
}

/// Builder for a small EPUB 3 archive
///
/// The OPF lives at `OEBPS/content.opf`; every chapter is stored next to it
/// and listed in both the manifest and the spine, in insertion order.
pub struct EpubFixture {
    container: bool,
    raw_opf: Option<String>,
    title: Option<String>,
    creator: Option<String>,
    description: Option<String>,
    items: Vec<Item>,
    extra: Vec<(String, String)>,
}

impl EpubFixture {
    pub fn new() -> Self {
        Self {
            container: true,
            raw_opf: None,
            title: None,
            creator: None,
            description: None,
            items: Vec::new(),
            extra: Vec::new(),
        }
    }

    pub fn chapter(mut self, id: &str, href: &str, content: &str) -> Self {
        self.items.push(Item {
            id: id.to_string(),
            href: href.to_string(),
            content: Some(content.to_string()),
        });
        self
    }

    /// Manifest and spine reference without an archive entry
    pub fn manifest_only(mut self, id: &str, href: &str) -> Self {
        self.items.push(Item {
            id: id.to_string(),
            href: href.to_string(),
            content: None,
        });
        self
    }

    pub fn without_container(mut self) -> Self {
        self.container = false;
        self
    }

    /// Replace the generated OPF verbatim
    pub fn raw_opf(mut self, opf: &str) -> Self {
        self.raw_opf = Some(opf.to_string());
        self
    }

    pub fn extra_entry(mut self, name: &str, content: &str) -> Self {
        self.extra.push((name.to_string(), content.to_string()));
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn creator(mut self, creator: &str) -> Self {
        self.creator = Some(creator.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    fn opf(&self) -> String {
        if let Some(raw) = &self.raw_opf {
            return raw.clone();
        }

        let mut metadata = String::new();
        for (tag, value) in [
            ("title", &self.title),
            ("creator", &self.creator),
            ("description", &self.description),
        ] {
            if let Some(value) = value {
                metadata.push_str(&format!("<dc:{tag}>{value}</dc:{tag}>"));
            }
        }
        let manifest: String = self
            .items
            .iter()
            .map(|i| {
                format!(
                    r#"<item id="{}" href="{}" media-type="application/xhtml+xml"/>"#,
                    i.id, i.href
                )
            })
            .collect();
        let spine: String = self
            .items
            .iter()
            .map(|i| format!(r#"<itemref idref="{}"/>"#, i.id))
            .collect();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="3.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:identifier id="uid">fixture</dc:identifier>{}</metadata>
  <manifest>{}</manifest>
  <spine>{}</spine>
</package>"#,
            metadata, manifest, spine
        )
    }
}

/// Write `fixture` as `dir/name`
pub fn write_epub(dir: &Path, name: &str, fixture: &EpubFixture) -> PathBuf {
    let path = dir.join(name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("mimetype", options).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();

    if fixture.container {
        zip.start_file("META-INF/container.xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#,
        )
        .unwrap();
    }

    zip.start_file("OEBPS/content.opf", options).unwrap();
    zip.write_all(fixture.opf().as_bytes()).unwrap();

    for item in &fixture.items {
        if let Some(content) = &item.content {
            zip.start_file(format!("OEBPS/{}", item.href), options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
    }
    for (entry, content) in &fixture.extra {
        zip.start_file(entry.as_str(), options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    path
}
