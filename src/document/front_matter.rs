//! Front matter extraction
//!
//! Parses the leading `---`-delimited metadata block of a markup
//! document as a restricted key/value map. Only scalar and date/time
//! values are permitted; nested structures are not. A malformed block
//! never fails the parse - it degrades to an empty map so broken front
//! matter cannot block an otherwise well-formed document.

use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// Split a document into its front matter map and remaining body.
///
/// The block is stripped from the body whether or not it parses; parse
/// failure yields an empty map.
pub(crate) fn extract(input: &str) -> (BTreeMap<String, String>, &str) {
    let Some(rest) = strip_opening_delimiter(input) else {
        return (BTreeMap::new(), input);
    };

    // Closing delimiter on its own line; without one there is no block.
    let Some((block, body)) = split_at_closing_delimiter(rest) else {
        return (BTreeMap::new(), input);
    };

    match parse_block(block) {
        Some(fields) => (fields, body),
        None => {
            tracing::debug!("malformed front matter block ignored");
            (BTreeMap::new(), body)
        }
    }
}

fn strip_opening_delimiter(input: &str) -> Option<&str> {
    let mut lines = input.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }
    Some(&input[first.len()..])
}

fn split_at_closing_delimiter(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse the lines between the delimiters. Returns `None` when any
/// line is not a simple `key: value` scalar entry.
fn parse_block(block: &str) -> Option<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();

    for line in block.lines() {
        if line.trim().is_empty() {
            continue;
        }
        // Indented continuations and list items signal nested YAML,
        // which the restricted grammar rejects.
        if line.starts_with(char::is_whitespace) || line.trim_start().starts_with("- ") {
            return None;
        }

        let (key, value) = line.split_once(':')?;
        let key = key.trim();
        let value = unquote(value.trim());

        if key.is_empty() || !is_valid_key(key) || !is_scalar(value) {
            return None;
        }

        fields.insert(key.to_lowercase(), value.to_string());
    }

    Some(fields)
}

fn is_valid_key(key: &str) -> bool {
    key.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Scalars are bare strings, quoted strings, numbers, booleans, and
/// date/time values. Flow collections and empty values are not.
fn is_scalar(value: &str) -> bool {
    !value.is_empty() && !value.starts_with('[') && !value.starts_with('{')
}

fn unquote(value: &str) -> &str {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    stripped.unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_scalar_fields() {
        let input = "---\ntitle: My Book\nauthor: \"Jane Doe\"\ndate: 2024-01-15\n---\n# One\nbody\n";
        let (fields, body) = extract(input);
        assert_eq!(fields.get("title").map(String::as_str), Some("My Book"));
        assert_eq!(fields.get("author").map(String::as_str), Some("Jane Doe"));
        assert_eq!(fields.get("date").map(String::as_str), Some("2024-01-15"));
        assert_eq!(body, "# One\nbody\n");
    }

    #[test]
    fn test_no_front_matter() {
        let input = "# One\nbody\n";
        let (fields, body) = extract(input);
        assert!(fields.is_empty());
        assert_eq!(body, input);
    }

    #[test]
    fn test_unterminated_block_is_body() {
        let input = "---\ntitle: My Book\n# One\nbody\n";
        let (fields, body) = extract(input);
        assert!(fields.is_empty());
        assert_eq!(body, input);
    }

    #[test]
    fn test_nested_values_degrade_to_empty() {
        let input = "---\ntitle: My Book\ntags:\n  - one\n  - two\n---\nbody\n";
        let (fields, body) = extract(input);
        assert!(fields.is_empty());
        assert_eq!(body, "body\n");
    }

    #[test]
    fn test_flow_collections_degrade_to_empty() {
        let input = "---\ntags: [a, b]\n---\nbody\n";
        let (fields, _) = extract(input);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_keys_are_lowercased() {
        let input = "---\nTitle: My Book\n---\nbody\n";
        let (fields, _) = extract(input);
        assert_eq!(fields.get("title").map(String::as_str), Some("My Book"));
    }
}
