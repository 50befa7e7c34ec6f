//! PDF text extraction

use lopdf::Document;
use std::path::Path;

use crate::error::{Error, Result};

/// Glyphs that PDF fonts commonly emit in place of plain characters
const GLYPH_REPLACEMENTS: &[(char, &str)] = &[
    ('\0', ""),
    ('\u{00A0}', " "), // Non-breaking space
    ('\u{2002}', " "), // En space
    ('\u{2003}', " "), // Em space
    ('\u{2009}', " "), // Thin space
    ('\u{2010}', "-"), // Hyphen
    ('\u{2011}', "-"), // Non-breaking hyphen
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Replace ligatures and odd spaces, trim lines and drop empty ones
fn cleanup_pdf_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match GLYPH_REPLACEMENTS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, replacement)) => result.push_str(replacement),
            None => result.push(c),
        }
    }

    result
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// PDF to plain text, page by page
pub struct PdfParser;

impl PdfParser {
    /// Read and parse a PDF file
    pub fn parse_file(path: &Path) -> Result<String> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let data = std::fs::read(path).map_err(|e| Error::file_parse(&filename, e.to_string()))?;
        Self::parse(&filename, &data)
    }

    /// Parse PDF bytes.
    ///
    /// Pages are concatenated in page order, each followed by a newline.
    /// Pages without extractable text contribute nothing. A panic inside
    /// the PDF library is reported as a parse error for this file only.
    pub fn parse(filename: &str, data: &[u8]) -> Result<String> {
        match std::panic::catch_unwind(|| Self::parse_document(filename, data)) {
            Ok(result) => result,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown cause".to_string());
                tracing::error!("PDF library panicked on {}: {}", filename, reason);
                Err(Error::file_parse(filename, format!("PDF parser panicked: {}", reason)))
            }
        }
    }

    fn parse_document(filename: &str, data: &[u8]) -> Result<String> {
        let doc = Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let mut text = String::new();
        for (page_number, page_id) in doc.get_pages() {
            let raw = match doc.extract_text(&[page_number]) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::debug!(
                        "Text decoding failed for {} page {}: {}, scanning content stream",
                        filename,
                        page_number,
                        e
                    );
                    doc.get_page_content(page_id)
                        .map(|content| Self::extract_text_from_content(&content))
                        .unwrap_or_default()
                }
            };

            let page_text = cleanup_pdf_text(&raw);
            if page_text.is_empty() {
                tracing::debug!("{} page {} has no extractable text", filename, page_number);
                continue;
            }
            text.push_str(&page_text);
            text.push('\n');
        }

        Ok(text)
    }

    /// Pull literal strings shown by `Tj`/`TJ` out of a raw content stream
    fn extract_text_from_content(content: &[u8]) -> String {
        let content_str = String::from_utf8_lossy(content);
        let mut text = String::new();
        let mut in_text_block = false;

        for line in content_str.lines() {
            let line = line.trim();

            match line {
                "BT" => in_text_block = true,
                "ET" => {
                    in_text_block = false;
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                }
                _ if in_text_block && (line.ends_with("Tj") || line.ends_with("TJ")) => {
                    if let (Some(start), Some(end)) = (line.find('('), line.rfind(')')) {
                        if start < end {
                            let decoded = line[start + 1..end]
                                .replace("\\(", "(")
                                .replace("\\)", ")")
                                .replace("\\\\", "\\");
                            text.push_str(&decoded);
                        }
                    }
                }
                _ => {}
            }
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::testing::{mislabeled_font_pdf, pdf_bytes};

    #[test]
    fn test_pages_in_order_with_separator() {
        let data = pdf_bytes(&[Some("First page text"), Some("Second page text")]);
        let text = PdfParser::parse("two.pdf", &data).unwrap();

        let first = text.find("First page text").unwrap();
        let second = text.find("Second page text").unwrap();
        assert!(first < second);
        assert!(text[first..second].contains('\n'));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_empty_page_contributes_nothing() {
        let data = pdf_bytes(&[Some("Alpha"), None, Some("Omega")]);
        let text = PdfParser::parse("gap.pdf", &data).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Alpha"));
        assert!(text.contains("Omega"));
    }

    #[test]
    fn test_document_without_text_is_empty_not_error() {
        let data = pdf_bytes(&[None]);
        assert_eq!(PdfParser::parse("blank.pdf", &data).unwrap(), "");
    }

    #[test]
    fn test_corrupt_bytes_fail() {
        let err = PdfParser::parse("broken.pdf", b"this is not a pdf").unwrap_err();
        match err {
            Error::FileParse { filename, .. } => assert_eq!(filename, "broken.pdf"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_library_panic_becomes_parse_error() {
        let data = mislabeled_font_pdf("Unreachable text");
        let err = PdfParser::parse("odd-font.pdf", &data).unwrap_err();
        match err {
            Error::FileParse { filename, message } => {
                assert_eq!(filename, "odd-font.pdf");
                assert!(message.contains("panicked"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cleanup_ligatures_and_blank_lines() {
        let cleaned = cleanup_pdf_text("  e\u{FB03}cient\u{00A0}work \n\n\0\n next ");
        assert_eq!(cleaned, "efficient work\nnext");
    }

    #[test]
    fn test_content_stream_scan() {
        let stream = b"BT\n/F1 12 Tf\n(Hello \\(world\\)) Tj\nET\nBT\n(Again) Tj\nET";
        let text = PdfParser::extract_text_from_content(stream);
        assert_eq!(text, "Hello (world)\nAgain\n");
    }
}
