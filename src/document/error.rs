//! Parse error types
//!
//! Unified error handling for all container formats.

use thiserror::Error;

/// Unified parse error type
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input extension/structure matched no supported container format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A structurally required file is missing (manifest, body, index)
    #[error("Missing required file: {0}")]
    MissingFile(String),

    /// Splitting produced no sections
    #[error("No sections found: {0}")]
    NoSections(String),

    /// Archive could not be read or extracted
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Invalid content (encoding, structure)
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// IO error (std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for parse operations
pub type Result<T> = std::result::Result<T, ParseError>;
