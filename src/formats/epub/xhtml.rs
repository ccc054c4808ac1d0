//! XHTML content document text extraction
//!
//! Character data inside `<p>` and `<div>` is captured. Nested inline
//! elements (`<b>`, `<a>`, `<span>`...) extend the open capture. Opening or
//! closing a `p`/`div` flushes the buffered text as one trimmed paragraph,
//! so a `div` wrapping several `p` elements yields one paragraph per `p`
//! without losing any text the `div` holds directly.
//!
//! Text is decoded against the full HTML entity set (`&nbsp;`, `&eacute;`,
//! numeric references); unknown entities are kept verbatim.

use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;

use super::package::strip_bom;
use crate::document::Result;

/// Extract the paragraphs of one content document
///
/// Fails on markup quick-xml cannot tokenize (mismatched end tags, broken
/// attributes); callers decide whether that aborts anything.
pub fn paragraphs(xhtml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(strip_bom(xhtml));
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut open_blocks = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) if is_block(e.local_name().as_ref()) => {
                flush(&mut current, &mut paragraphs);
                open_blocks += 1;
            }
            Event::End(e) if is_block(e.local_name().as_ref()) => {
                flush(&mut current, &mut paragraphs);
                open_blocks = open_blocks.saturating_sub(1);
            }
            Event::Empty(e) if e.local_name().as_ref() == b"br" && open_blocks > 0 => {
                current.push('\n');
            }
            Event::Text(e) if open_blocks > 0 => {
                current.push_str(&unescape_lenient(&e));
            }
            Event::CData(e) if open_blocks > 0 => {
                current.push_str(&String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    flush(&mut current, &mut paragraphs);
    Ok(paragraphs)
}

fn is_block(name: &[u8]) -> bool {
    name == b"p" || name == b"div"
}

fn flush(current: &mut String, paragraphs: &mut Vec<String>) {
    let text = current.trim();
    if !text.is_empty() {
        paragraphs.push(text.to_string());
    }
    current.clear();
}

/// Decode XML and HTML named/numeric entities; unknown entities stay as written
fn unescape_lenient(text: &BytesText<'_>) -> String {
    html_escape::decode_html_entities(&String::from_utf8_lossy(text)).into_owned()
}
