//! Slug derivation
//!
//! Publication slugs derive from titles via lowercase/ASCII-fold/
//! hyphenation. Titles that fold to nothing fall back to a random
//! slug.

use uuid::Uuid;

/// Normalize a title into a slug. Returns an empty string when no
/// character survives folding.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        let folded = fold(c);
        match folded {
            Some(c) => {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.push(c);
            }
            None => pending_separator = true,
        }
    }

    slug
}

/// Random fallback slug for titles that produce nothing
pub fn random_slug() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("publication-{}", &id[..8])
}

/// Fold a lowercase char to its ASCII slug form; `None` marks a
/// separator position.
fn fold(c: char) -> Option<char> {
    if c.is_ascii_alphanumeric() {
        return Some(c);
    }
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => Some('a'),
        'ç' => Some('c'),
        'è' | 'é' | 'ê' | 'ë' => Some('e'),
        'ì' | 'í' | 'î' | 'ï' => Some('i'),
        'ñ' => Some('n'),
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => Some('o'),
        'ù' | 'ú' | 'û' | 'ü' => Some('u'),
        'ý' | 'ÿ' => Some('y'),
        _ => None,
    }
}
