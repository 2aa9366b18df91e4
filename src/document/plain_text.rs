//! Plain-text handler
//!
//! Splits plain text on `CHAPTER <number>` marker lines, with a
//! `KEY: value` metadata preamble. Chapter numbers may be roman or
//! arabic; they feed title synthesis only, never ordering.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{ParseError, Result};
use super::types::{ParsedDocument, ParsedSection};

/// `CHAPTER I.` / `chapter 12` marker lines
static CHAPTER_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*chapter\s+([ivxlcdm]+|\d+)\s*\.?\s*$").expect("valid pattern")
});

/// `KEY: value` preamble lines
static PREAMBLE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+):\s*(.*)$").expect("valid pattern"));

/// Explicit titles are short single lines without sentence punctuation
const MAX_TITLE_LEN: usize = 100;

/// Parse a plain-text document
pub(crate) fn parse(input: &str) -> Result<ParsedDocument> {
    let mut doc = ParsedDocument::default();
    let body = consume_preamble(input, &mut doc);

    let segments = split_on_markers(body);
    if segments.is_empty() {
        return Err(ParseError::NoSections(
            "no CHAPTER markers found; begin each chapter with a 'CHAPTER <number>' line"
                .to_string(),
        ));
    }

    for (marker_number, lines) in segments {
        doc.sections.push(build_section(marker_number, &lines));
    }
    doc.renumber();

    Ok(doc)
}

/// Consume leading `KEY: value` lines for the recognized metadata keys
/// and return the remaining text.
fn consume_preamble<'a>(input: &'a str, doc: &mut ParsedDocument) -> &'a str {
    let mut offset = 0;
    for line in input.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            offset += line.len();
            continue;
        }

        let Some(caps) = PREAMBLE_LINE.captures(trimmed) else {
            break;
        };
        let value = caps[2].trim().to_string();
        match caps[1].to_lowercase().as_str() {
            "title" => doc.title = Some(value),
            "author" => doc.author = Some(value),
            "description" => doc.description = Some(value),
            "type" => doc.kind = value.into(),
            _ => break,
        }
        offset += line.len();
    }
    &input[offset..]
}

/// Split on marker lines; text before the first marker is discarded.
/// Returns each segment with the number embedded in its marker.
fn split_on_markers(body: &str) -> Vec<(u32, Vec<&str>)> {
    let mut segments: Vec<(u32, Vec<&str>)> = Vec::new();

    for line in body.lines() {
        if let Some(caps) = CHAPTER_MARKER.captures(line) {
            let number = parse_chapter_number(&caps[1]);
            segments.push((number, Vec::new()));
        } else if let Some((_, lines)) = segments.last_mut() {
            lines.push(line);
        }
    }

    segments
}

fn build_section(marker_number: u32, lines: &[&str]) -> ParsedSection {
    let first_content = lines.iter().position(|l| !l.trim().is_empty());

    if let Some(idx) = first_content {
        let candidate = lines[idx].trim();
        if candidate.len() < MAX_TITLE_LEN && !candidate.contains('.') {
            let body = lines[idx + 1..].join("\n");
            return ParsedSection::new(0, candidate, body.trim());
        }
    }

    let body = lines.join("\n");
    ParsedSection::new(0, format!("Chapter {}", marker_number), body.trim())
}

/// Parse an arabic or roman chapter number; unparseable markers fall
/// back to 0 and get replaced by positional renumbering anyway.
fn parse_chapter_number(token: &str) -> u32 {
    if let Ok(n) = token.parse::<u32>() {
        return n;
    }
    parse_roman(token).unwrap_or(0)
}

fn parse_roman(token: &str) -> Option<u32> {
    let digit = |c: char| match c.to_ascii_uppercase() {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    };

    let values: Option<Vec<u32>> = token.chars().map(digit).collect();
    let values = values?;

    let mut total: u32 = 0;
    for (i, &value) in values.iter().enumerate() {
        if values[i + 1..].iter().any(|&next| next > value) {
            total = total.checked_sub(value)?;
        } else {
            total += value;
        }
    }
    (total > 0).then_some(total)
}
