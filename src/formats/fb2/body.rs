//! FB2 body walking: text flattening and chapter counting

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::Result;

/// Separator written where a `subtitle` closes
pub const SUBTITLE_BREAK: &str = "* * *\n\n";

/// Flatten every `body` into plain text
///
/// - paragraph-like elements (`p`, `v`, `text-author`) end with a blank line
/// - lines inside a `title` end with a single newline, and the title block
///   is followed by one more
/// - a `subtitle` is replaced by [`SUBTITLE_BREAK`]; its own text is dropped
/// - anything outside `body` (description, binaries) is ignored
pub fn extract_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut line = String::new();
    let mut in_body = false;
    let mut title_depth = 0usize;
    let mut in_paragraph = false;
    let mut in_subtitle = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"body" => in_body = true,
                b"title" if in_body => {
                    title_depth += 1;
                    line.clear();
                }
                b"subtitle" if in_body => in_subtitle = true,
                name if in_body && is_paragraph(name) => {
                    in_paragraph = true;
                    line.clear();
                }
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"body" => in_body = false,
                b"title" if title_depth > 0 => {
                    push_line(&mut out, &line, "\n");
                    line.clear();
                    out.push('\n');
                    title_depth -= 1;
                }
                b"subtitle" if in_subtitle => {
                    in_subtitle = false;
                    line.clear();
                    out.push_str(SUBTITLE_BREAK);
                }
                name if in_paragraph && is_paragraph(name) => {
                    let end = if title_depth > 0 { "\n" } else { "\n\n" };
                    push_line(&mut out, &line, end);
                    line.clear();
                    in_paragraph = false;
                }
                _ => {}
            },
            Event::Text(e) if in_body && !in_subtitle && (in_paragraph || title_depth > 0) => {
                line.push_str(&e.unescape()?);
            }
            Event::CData(e) if in_body && !in_subtitle && (in_paragraph || title_depth > 0) => {
                line.push_str(&String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out.trim().to_string())
}

/// Count top-level `section` elements of the main bodies
///
/// Nested sections do not count. Bodies named `notes` or `comments` hold
/// footnotes, not chapters, and are skipped.
pub fn count_chapters(xml: &str) -> Result<u32> {
    let mut reader = Reader::from_str(xml);
    let mut count = 0u32;
    let mut in_body = false;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"body" => {
                    in_body = !is_notes_body(&e);
                    depth = 0;
                }
                b"section" if in_body => {
                    if depth == 0 {
                        count += 1;
                    }
                    depth += 1;
                }
                _ => {}
            },
            Event::Empty(e) if in_body && depth == 0 && e.local_name().as_ref() == b"section" => {
                count += 1;
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"body" => in_body = false,
                b"section" if in_body => depth = depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(count)
}

fn is_paragraph(name: &[u8]) -> bool {
    matches!(name, b"p" | b"v" | b"text-author")
}

fn is_notes_body(body: &BytesStart<'_>) -> bool {
    body.attributes().flatten().any(|attr| {
        attr.key.local_name().as_ref() == b"name"
            && matches!(attr.value.as_ref(), b"notes" | b"comments")
    })
}

/// Append whitespace-collapsed `line` followed by `end`, if it has any text
fn push_line(out: &mut String, line: &str, end: &str) {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return;
    };
    out.push_str(first);
    for word in words {
        out.push(' ');
        out.push_str(word);
    }
    out.push_str(end);
}
