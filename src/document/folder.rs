//! Folder-of-fragments handler
//!
//! A plain directory of markup files. An index file (`book.md`,
//! `index.md`, or `README.md`, in that priority order) may list
//! inclusion directives that control section order; without one, every
//! markup file in the folder becomes one section in filename order.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{ParseError, Result};
use super::front_matter;
use super::markdown;
use super::types::{ParsedDocument, ParsedSection};

const INDEX_CANDIDATES: [&str; 3] = ["book.md", "index.md", "README.md"];

/// Inclusion directives: `/relative/path.md` with an optional quoted
/// title override, on a line of their own.
static INCLUDE_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*/(\S+\.(?:md|markdown))(?:\s+"([^"]*)")?\s*$"#).expect("valid pattern")
});

/// Parse a directory of markup fragments
pub(crate) fn parse(dir: &Path) -> Result<ParsedDocument> {
    for candidate in INDEX_CANDIDATES {
        let index_path = dir.join(candidate);
        if index_path.is_file() {
            tracing::debug!(index = candidate, folder = %dir.display(), "using folder index");
            let index = fs::read_to_string(&index_path)?;
            return parse_with_index(dir, &index);
        }
    }
    parse_sorted_files(dir)
}

/// Index-driven parse: directives pick the fragments and their order.
/// An index without directives is itself the document.
fn parse_with_index(dir: &Path, index: &str) -> Result<ParsedDocument> {
    let (meta, body) = front_matter::extract(index);

    let mut sections: Vec<ParsedSection> = Vec::new();
    let mut saw_directive = false;
    for caps in INCLUDE_DIRECTIVE.captures_iter(body) {
        saw_directive = true;
        let relative = &caps[1];
        let fragment_path = dir.join(relative);
        if !fragment_path.is_file() {
            tracing::debug!(fragment = relative, "skipping missing fragment");
            continue;
        }

        let raw = fs::read_to_string(&fragment_path)?;
        let (heading, content) = markdown::split_fragment(&raw);
        let title = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .filter(|t| !t.is_empty())
            .or(heading)
            .unwrap_or_else(|| format!("Chapter {}", sections.len() + 1));

        sections.push(ParsedSection::new(0, title, content));
    }

    if sections.is_empty() {
        if saw_directive {
            return Err(ParseError::NoSections(
                "index inclusion directives reference no existing files".to_string(),
            ));
        }
        // No directives: the index content is the source document.
        return markdown::parse(index);
    }

    let mut doc = markdown::document_from_metadata(&meta);
    doc.sections = sections;
    doc.renumber();
    Ok(doc)
}

/// No index: every markup file, sorted by filename, becomes a section.
fn parse_sorted_files(dir: &Path) -> Result<ParsedDocument> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| {
                        e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown")
                    })
        })
        .collect();
    paths.sort();

    let mut doc = ParsedDocument::default();
    let mut first = true;
    for path in paths {
        let raw = fs::read_to_string(&path)?;

        // A lone leading front-matter-only file is document metadata,
        // not section 1.
        if first {
            first = false;
            let (meta, body) = front_matter::extract(&raw);
            if !meta.is_empty() && body.trim().is_empty() {
                let shell = markdown::document_from_metadata(&meta);
                doc.title = shell.title;
                doc.author = shell.author;
                doc.description = shell.description;
                doc.kind = shell.kind;
                continue;
            }
        }

        let (heading, content) = markdown::split_fragment(&raw);
        let title =
            heading.unwrap_or_else(|| format!("Chapter {}", doc.sections.len() + 1));
        doc.sections.push(ParsedSection::new(0, title, content));
    }

    if doc.sections.is_empty() {
        return Err(ParseError::NoSections(format!(
            "no markup files found in {}; add .md files or an index with inclusion directives",
            dir.display()
        )));
    }
    doc.renumber();

    Ok(doc)
}
