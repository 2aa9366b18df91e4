//! Host entity types
//!
//! Publications and chapters as the host platform sees them: a
//! collection entity plus a typed configuration block, replacing the
//! open key/value custom-field bags a forum platform would use. All
//! flags are native booleans; string-token encodings are an adapter
//! concern at the host boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::DocumentKind;

/// Access tier applied uniformly to the chapters of one import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccessLevel {
    Free,
    Paid,
    Subscriber,
    Other(String),
}

impl Default for AccessLevel {
    fn default() -> Self {
        Self::Free
    }
}

impl From<String> for AccessLevel {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "free" | "" => Self::Free,
            "paid" => Self::Paid,
            "subscriber" => Self::Subscriber,
            _ => Self::Other(value.trim().to_string()),
        }
    }
}

impl From<AccessLevel> for String {
    fn from(level: AccessLevel) -> Self {
        match level {
            AccessLevel::Free => "free".to_string(),
            AccessLevel::Paid => "paid".to_string(),
            AccessLevel::Subscriber => "subscriber".to_string(),
            AccessLevel::Other(tag) => tag,
        }
    }
}

/// Visual styling chapters inherit from their publication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleHints {
    pub color: Option<String>,
    pub text_color: Option<String>,
}

/// A collection entity in the host platform
///
/// Publications are top-level collections; chapters are child
/// collections of their publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// URL slug, unique across the platform
    pub slug: String,

    /// Creating user
    pub owner: String,

    /// Parent collection, for chapters
    pub parent_id: Option<String>,

    /// Visual styling
    pub style: StyleHints,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Typed publication configuration
///
/// Written as a whole in one operation; there is no key-at-a-time
/// mutation that could leave a half-updated record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationConfig {
    /// Marks the collection as a publication
    pub enabled: bool,

    /// Book or journal
    pub kind: DocumentKind,

    pub author: Option<String>,
    pub description: Option<String>,
}

/// Typed chapter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterConfig {
    /// Marks the collection as a chapter
    pub enabled: bool,

    /// Chapter number at creation time; other platform operations may
    /// renumber it later
    pub number: u32,

    pub access_level: AccessLevel,

    /// Published/approved vs. draft
    pub published: bool,

    /// Word count derived at parse time, never recomputed here
    pub word_count: usize,
}

/// A resolved publication: collection plus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    pub collection: Collection,
    pub config: PublicationConfig,
}

/// A materialized chapter
///
/// Holds exactly one optional content-thread reference; the 1:1
/// chapter-to-content-thread relationship is explicit, not a marker
/// convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub collection: Collection,
    pub config: ChapterConfig,
    pub content_thread: Option<String>,
}

/// A discussion thread under a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub collection_id: String,
    pub owner: String,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
}

/// A post within a thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub thread_id: String,
    pub owner: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_round_trip() {
        assert_eq!(AccessLevel::from("free".to_string()), AccessLevel::Free);
        assert_eq!(AccessLevel::from("PAID".to_string()), AccessLevel::Paid);
        assert_eq!(
            AccessLevel::from("patron".to_string()),
            AccessLevel::Other("patron".to_string())
        );
        assert_eq!(String::from(AccessLevel::Subscriber), "subscriber");
    }
}
