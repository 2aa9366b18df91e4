//! Structured-markup handler
//!
//! Splits a markdown document into sections on top-level `# ` headings
//! after stripping any leading front matter block.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{ParseError, Result};
use super::front_matter;
use super::types::{ParsedDocument, ParsedSection};

/// `Chapter <n>` or `Chapter <n>: <text>` headings
static CHAPTER_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^chapter\s+(\d+)\s*(?::\s*(\S.*))?$").expect("valid pattern"));

/// Parse a structured-markup document (single file or in-memory string)
pub(crate) fn parse(input: &str) -> Result<ParsedDocument> {
    let (meta, body) = front_matter::extract(input);
    let mut doc = document_from_metadata(&meta);

    let raw = split_headings(body);
    if raw.is_empty() {
        return Err(ParseError::NoSections(
            "no top-level '# ' headings found; mark the start of each chapter with a '# ' heading"
                .to_string(),
        ));
    }

    for (index, (heading, content)) in raw.into_iter().enumerate() {
        let title = section_title(&heading, index);
        doc.sections.push(ParsedSection::new(0, title, content));
    }
    doc.renumber();

    Ok(doc)
}

/// Build a document shell from a front matter map
pub(crate) fn document_from_metadata(meta: &BTreeMap<String, String>) -> ParsedDocument {
    let mut doc = ParsedDocument::default();
    doc.title = meta.get("title").cloned();
    doc.author = meta.get("author").cloned();
    doc.description = meta.get("description").cloned();
    if let Some(kind) = meta.get("type") {
        doc.kind = kind.clone().into();
    }
    doc
}

/// Split a markup fragment into an optional leading-heading title and
/// the remaining body. Front matter is stripped and discarded.
///
/// Used for fragment files referenced from a folder index, where each
/// file is one section.
pub(crate) fn split_fragment(input: &str) -> (Option<String>, String) {
    let (_, body) = front_matter::extract(input);

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim().is_empty() {
            offset += line.len();
            continue;
        }
        if let Some(heading) = heading_text(line.trim_end()) {
            let rest = &body[offset + line.len()..];
            return (Some(heading.to_string()), rest.trim().to_string());
        }
        break;
    }

    (None, body.trim().to_string())
}

/// Returns the heading text when a line is a top-level `# ` heading
fn heading_text(line: &str) -> Option<&str> {
    let text = line.strip_prefix("# ")?;
    Some(text.trim())
}

/// Split a body on top-level headings. Content before the first
/// heading is preamble and is discarded.
fn split_headings(body: &str) -> Vec<(String, String)> {
    let mut sections: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in body.lines() {
        if let Some(heading) = heading_text(line) {
            if let Some((title, content)) = current.take() {
                sections.push((title, content.join("\n").trim().to_string()));
            }
            current = Some((heading.to_string(), Vec::new()));
        } else if let Some((_, ref mut content)) = current {
            content.push(line);
        }
        // Not yet inside a section: preamble, skipped.
    }

    if let Some((title, content)) = current.take() {
        sections.push((title, content.join("\n").trim().to_string()));
    }

    sections
}

/// Section title from a heading line
///
/// `Chapter <n>: <text>` headings use the trailing text; a bare
/// `Chapter <n>` synthesizes a title from the embedded number. The
/// embedded number never affects section ordering.
fn section_title(heading: &str, index: usize) -> String {
    if let Some(caps) = CHAPTER_HEADING.captures(heading) {
        if let Some(text) = caps.get(2) {
            return text.as_str().trim().to_string();
        }
        return format!("Chapter {}", &caps[1]);
    }
    if heading.is_empty() {
        return format!("Chapter {}", index + 1);
    }
    heading.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_headings() {
        let doc = parse("# One\nfirst body\n\n# Two\nsecond body\n").unwrap();
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].title, "One");
        assert_eq!(doc.sections[0].content, "first body");
        assert_eq!(doc.sections[1].number, 2);
        assert_eq!(doc.sections[1].content, "second body");
    }

    #[test]
    fn test_preamble_is_discarded() {
        let doc = parse("stray preamble\n\n# One\nbody\n").unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].content, "body");
    }

    #[test]
    fn test_front_matter_feeds_metadata() {
        let doc = parse("---\ntitle: My Book\nauthor: Jane\ntype: journal\n---\n# One\nbody\n")
            .unwrap();
        assert_eq!(doc.title.as_deref(), Some("My Book"));
        assert_eq!(doc.author.as_deref(), Some("Jane"));
        assert_eq!(doc.kind, crate::document::DocumentKind::Journal);
    }

    #[test]
    fn test_chapter_headings_synthesize_titles() {
        let doc = parse("# Chapter 5\na\n\n# Chapter 2: The Return\nb\n\n# Chapter 9\nc\n")
            .unwrap();
        let titles: Vec<&str> = doc.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Chapter 5", "The Return", "Chapter 9"]);
        // Numbering is positional, never source-trusted.
        let numbers: Vec<u32> = doc.sections.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_no_headings_is_fatal() {
        let err = parse("just some text\nwithout headings\n").unwrap_err();
        assert!(matches!(err, ParseError::NoSections(_)));
    }

    #[test]
    fn test_subheadings_stay_in_content() {
        let doc = parse("# One\nintro\n## Detail\nmore\n").unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0].content.contains("## Detail"));
    }

    #[test]
    fn test_fragment_split() {
        let (title, body) = split_fragment("---\nx: y\n---\n\n# The Start\n\nHello.\n");
        assert_eq!(title.as_deref(), Some("The Start"));
        assert_eq!(body, "Hello.");

        let (title, body) = split_fragment("no heading here\n");
        assert_eq!(title, None);
        assert_eq!(body, "no heading here");
    }
}
