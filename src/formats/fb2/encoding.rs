//! Character encoding of FB2 files
//!
//! Many FB2 files predate UTF-8 and declare a legacy encoding in their XML
//! prolog (`<?xml version="1.0" encoding="windows-1251"?>`). The raw bytes
//! are decoded to UTF-8 before any XML parsing happens.
//!
//! Priority:
//! 1. BOM - most reliable
//! 2. `encoding` pseudo-attribute of the XML declaration
//! 3. UTF-8

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// How far into the file the XML declaration is searched for
const PROLOG_SCAN_LIMIT: usize = 256;

/// Decode raw FB2 bytes to a UTF-8 string
///
/// Invalid sequences are replaced with U+FFFD instead of failing the book.
pub fn decode(bytes: &[u8]) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| declared_encoding(bytes))
        .unwrap_or(UTF_8);

    // BOM sniffing inside decode() overrides the chosen encoding when present
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(
            encoding = used.name(),
            "FB2 contained invalid byte sequences, replaced"
        );
    }
    text.into_owned()
}

/// Encoding named by the XML declaration, if any and if usable
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(PROLOG_SCAN_LIMIT)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let prolog_end = head.windows(2).position(|w| w == b"?>")?;
    let prolog = &head[..prolog_end];

    let start = prolog.windows(8).position(|w| w == b"encoding")? + 8;
    let rest = &prolog[start..];
    let rest = &rest[rest.iter().position(|&b| b == b'=')? + 1..];
    let rest = &rest[rest.iter().position(|b| !b.is_ascii_whitespace())?..];
    let quote = *rest.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let label_len = rest[1..].iter().position(|&b| b == quote)?;
    let label = &rest[1..1 + label_len];

    // A BOM-less file whose prolog is readable as ASCII is not UTF-16
    Encoding::for_label(label).filter(|enc| *enc != UTF_16LE && *enc != UTF_16BE)
}
