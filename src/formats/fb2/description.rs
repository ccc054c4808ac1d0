//! FB2 `description/title-info` metadata

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::document::{BookInfo, Result};

/// Read title, first author and first annotation paragraph from `title-info`
///
/// Scanning stops at the end of `title-info` (or at the first `body`), so
/// the book text is never walked. Missing fields stay empty.
pub fn book_info(xml: &str) -> Result<BookInfo> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();

    let mut title = String::new();
    let mut first_name = String::new();
    let mut last_name = String::new();
    let mut annotation = String::new();
    let mut authors_seen = 0usize;
    let mut annotation_paragraphs = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"body" {
                    break;
                }
                if in_title_info(&stack) {
                    match name.as_slice() {
                        b"author" => authors_seen += 1,
                        b"p" if stack.iter().any(|n| n == b"annotation") => {
                            annotation_paragraphs += 1
                        }
                        _ => {}
                    }
                }
                stack.push(name);
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"title-info" {
                    break;
                }
                stack.pop();
            }
            Event::Text(e) if in_title_info(&stack) => {
                let text = e.unescape()?;
                let Some(current) = stack.last().map(Vec::as_slice) else {
                    continue;
                };
                let in_first_author = authors_seen == 1 && stack.iter().any(|n| n == b"author");
                let in_first_annotation_paragraph = annotation_paragraphs == 1
                    && stack.iter().any(|n| n == b"annotation")
                    && stack.iter().any(|n| n == b"p");

                match current {
                    b"book-title" => title.push_str(&text),
                    b"first-name" if in_first_author => first_name.push_str(&text),
                    b"last-name" if in_first_author => last_name.push_str(&text),
                    _ if in_first_annotation_paragraph => annotation.push_str(&text),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let author = format!("{} {}", collapse(&first_name), collapse(&last_name));
    Ok(BookInfo {
        title: collapse(&title),
        author: author.trim().to_string(),
        annotation: collapse(&annotation),
    })
}

fn in_title_info(stack: &[Vec<u8>]) -> bool {
    stack.iter().any(|n| n == b"title-info")
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
