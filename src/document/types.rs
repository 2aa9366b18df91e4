//! Core parsed-document types
//!
//! Format-agnostic value objects produced by the parser and consumed by
//! the importer. These are plain data carriers with no behavior beyond
//! construction helpers, safe to serialize for HTTP responses or queue
//! messages.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Kind of publication a document describes
///
/// Open to free-text values for forward compatibility; unknown tags
/// round-trip through serde unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentKind {
    Book,
    Journal,
    Other(String),
}

impl Default for DocumentKind {
    fn default() -> Self {
        Self::Book
    }
}

impl From<String> for DocumentKind {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "book" | "" => Self::Book,
            "journal" => Self::Journal,
            _ => Self::Other(value.trim().to_string()),
        }
    }
}

impl From<DocumentKind> for String {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Book => "book".to_string(),
            DocumentKind::Journal => "journal".to_string(),
            DocumentKind::Other(tag) => tag,
        }
    }
}

/// Supported container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Directory with an `info.json` manifest, a `text.*` body, and
    /// optional `assets/`
    TextBundle,
    /// `.zip` or `.textpack` archive
    Archive,
    /// Plain directory of markup fragments
    Folder,
    /// Single structured-markup file
    Markdown,
    /// Plain text with `CHAPTER` markers
    PlainText,
}

impl SourceFormat {
    /// Detect format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "textbundle" => Some(Self::TextBundle),
            "textpack" | "zip" => Some(Self::Archive),
            "md" | "markdown" => Some(Self::Markdown),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Detect format from a filesystem path
    ///
    /// Directories are bundles when they carry an `info.json` manifest
    /// (or a `.textbundle` extension), plain folders otherwise.
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.is_dir() {
            let bundled = path.join("info.json").is_file()
                || path
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("textbundle"));
            return Some(if bundled { Self::TextBundle } else { Self::Folder });
        }

        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// A parsed document ready for import
///
/// Produced fresh per parse call; owned solely by the caller until
/// consumed by the importer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Document title, from embedded metadata
    pub title: Option<String>,

    /// Author, from embedded metadata
    pub author: Option<String>,

    /// Description/summary, from embedded metadata
    pub description: Option<String>,

    /// Publication kind (book, journal, ...)
    pub kind: DocumentKind,

    /// Ordered sections, renumbered 1..N after parsing
    pub sections: Vec<ParsedSection>,

    /// Raw cover image bytes, if the container carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<Vec<u8>>,

    /// Named asset blobs referenced by the document but not inlined
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, Vec<u8>>,
}

impl ParsedDocument {
    /// Renumber sections 1..N in their current order
    ///
    /// Numbers embedded in source text are used only for title
    /// synthesis, never as the ordering key.
    pub(crate) fn renumber(&mut self) {
        for (index, section) in self.sections.iter_mut().enumerate() {
            section.number = index as u32 + 1;
        }
    }

    /// Total word count across all sections
    pub fn total_word_count(&self) -> usize {
        self.sections.iter().map(|s| s.word_count).sum()
    }
}

/// One ordered unit of a parsed document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedSection {
    /// 1-based position in the document, unique and contiguous
    pub number: u32,

    /// Section title, synthesized from the index when the source has
    /// no discoverable title
    pub title: String,

    /// Body text, without the leading title heading where the source
    /// embeds one
    pub content: String,

    /// Whitespace-delimited token count of `content`, derived once at
    /// parse time
    pub word_count: usize,
}

impl ParsedSection {
    /// Build a section, deriving the word count from the content
    pub fn new(number: u32, title: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let word_count = count_words(&content);
        Self {
            number,
            title: title.into(),
            content,
            word_count,
        }
    }
}

/// Whitespace-delimited token count
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
