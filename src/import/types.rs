//! Import options and result types

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::publication::{AccessLevel, Publication};

/// Options controlling one import call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Import into this existing publication instead of creating one
    pub publication_id: Option<String>,

    /// Slug override when creating a new publication
    pub slug: Option<String>,

    /// Mark new chapters published rather than draft
    pub publish: bool,

    /// Access tier applied uniformly to new chapters
    pub access_level: AccessLevel,

    /// Update matched chapters in place instead of skipping them
    pub replace_existing: bool,
}

/// Outcome of one import call
///
/// `success` is true when anything useful happened: the import only
/// fails when nothing was created or updated AND something went wrong.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,

    /// The resolved target, or `None` on total failure
    pub publication: Option<Publication>,

    /// Titles of chapters created by this import
    pub chapters_created: Vec<String>,

    /// Titles of chapters updated in place
    pub chapters_updated: Vec<String>,

    /// One human-readable message per recoverable failure, plus the
    /// fatal cause on total failure
    pub errors: Vec<String>,

    /// Non-error observations (ambiguous matches, unhandled cover)
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Result for a fatal error: nothing persisted, single cause
    pub(crate) fn fatal(cause: impl Display) -> Self {
        Self {
            success: false,
            publication: None,
            errors: vec![cause.to_string()],
            ..Self::default()
        }
    }
}
