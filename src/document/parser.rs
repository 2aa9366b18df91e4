//! Document parser entry point
//!
//! Resolves the container format of an input (filesystem path or
//! in-memory bytes with a filename hint) and dispatches to the matching
//! handler. All handlers produce the same normalized `ParsedDocument`.

use std::fs;
use std::path::{Path, PathBuf};

use super::archive;
use super::bundle;
use super::error::{ParseError, Result};
use super::folder;
use super::markdown;
use super::plain_text;
use super::types::{ParsedDocument, SourceFormat};

/// Parser over a single input source
///
/// Format is resolved by extension and directory structure. Content
/// sniffing is limited to the in-memory fallback: bytes with an
/// unrecognized extension are tried as structured markup, then as
/// plain text.
pub struct DocumentParser {
    source: Source,
}

enum Source {
    Path(PathBuf),
    Bytes { content: Vec<u8>, filename: String },
}

impl DocumentParser {
    /// Parse a file or directory on disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source: Source::Path(path.as_ref().to_path_buf()),
        }
    }

    /// Parse in-memory content with a filename hint (for uploads)
    pub fn from_bytes(content: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            source: Source::Bytes {
                content,
                filename: filename.into(),
            },
        }
    }

    /// Detect the container format and produce a normalized document
    pub fn parse(&self) -> Result<ParsedDocument> {
        let start = std::time::Instant::now();

        let mut doc = match &self.source {
            Source::Path(path) => Self::parse_from_path(path)?,
            Source::Bytes { content, filename } => Self::parse_from_bytes(content, filename)?,
        };

        // Numbering is positional regardless of which handler ran.
        doc.renumber();

        tracing::info!(
            sections = doc.sections.len(),
            words = doc.total_word_count(),
            elapsed = ?start.elapsed(),
            "parsed document"
        );

        Ok(doc)
    }

    fn parse_from_path(path: &Path) -> Result<ParsedDocument> {
        if !path.exists() {
            return Err(ParseError::MissingFile(path.display().to_string()));
        }

        match SourceFormat::from_path(path) {
            Some(SourceFormat::TextBundle) => bundle::parse(path),
            Some(SourceFormat::Folder) => folder::parse(path),
            Some(SourceFormat::Archive) => archive::parse_path(path),
            Some(SourceFormat::Markdown) => markdown::parse(&fs::read_to_string(path)?),
            Some(SourceFormat::PlainText) => plain_text::parse(&fs::read_to_string(path)?),
            None => Err(ParseError::UnsupportedFormat(format!(
                "{}: expected .textbundle, .textpack, .zip, .md, .markdown, or .txt",
                path.display()
            ))),
        }
    }

    fn parse_from_bytes(content: &[u8], filename: &str) -> Result<ParsedDocument> {
        let format = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SourceFormat::from_extension);

        match format {
            Some(SourceFormat::Archive) => archive::parse_bytes(content),
            Some(SourceFormat::Markdown) => markdown::parse(utf8(content)?),
            Some(SourceFormat::PlainText) => plain_text::parse(utf8(content)?),
            Some(SourceFormat::TextBundle) | Some(SourceFormat::Folder) => {
                Err(ParseError::UnsupportedFormat(format!(
                    "{}: directory containers cannot be parsed from in-memory bytes",
                    filename
                )))
            }
            None => {
                // Unrecognized extension: structured markup first, then
                // plain text.
                let text = utf8(content)?;
                match markdown::parse(text) {
                    Ok(doc) => Ok(doc),
                    Err(e) => {
                        tracing::debug!(
                            filename,
                            error = %e,
                            "markup parse failed, falling back to plain text"
                        );
                        plain_text::parse(text)
                    }
                }
            }
        }
    }
}

fn utf8(content: &[u8]) -> Result<&str> {
    std::str::from_utf8(content)
        .map_err(|_| ParseError::InvalidContent("input is not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_with_markdown_extension() {
        let doc = DocumentParser::from_bytes(b"# One\nbody\n".to_vec(), "book.md")
            .parse()
            .unwrap();
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn test_bytes_fallback_to_markdown() {
        let doc = DocumentParser::from_bytes(b"# One\nbody\n".to_vec(), "upload.bin")
            .parse()
            .unwrap();
        assert_eq!(doc.sections[0].title, "One");
    }

    #[test]
    fn test_bytes_fallback_to_plain_text() {
        let doc = DocumentParser::from_bytes(
            b"CHAPTER 1.\nThe Start\nHello world.\n".to_vec(),
            "upload.bin",
        )
        .parse()
        .unwrap();
        assert_eq!(doc.sections[0].title, "The Start");
    }

    #[test]
    fn test_bytes_fallback_exhausted() {
        let err = DocumentParser::from_bytes(b"nothing splittable here\n".to_vec(), "upload.bin")
            .parse()
            .unwrap_err();
        assert!(matches!(err, ParseError::NoSections(_)));
    }

    #[test]
    fn test_missing_path() {
        let err = DocumentParser::from_path("/nonexistent/book.md")
            .parse()
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingFile(_)));
    }

    #[test]
    fn test_directory_container_from_bytes_rejected() {
        let err = DocumentParser::from_bytes(Vec::new(), "book.textbundle")
            .parse()
            .unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat(_)));
    }
}
