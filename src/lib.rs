//! Libretto
//!
//! A serialized-publication import pipeline. Parses book and journal
//! containers into a normalized chapter sequence, then merges that
//! sequence into a host platform as a publication with one discussion
//! thread per chapter.
//!
//! # Modules
//!
//! - `document`: Container format detection and parsing (text bundles,
//!   archives, fragment folders, markdown, plain text)
//! - `publication`: Host entities, typed configuration, and the storage
//!   capability traits the host must supply
//! - `import`: The importer that merges a parsed document into the host
//!
//! # Usage
//!
//! ```rust,ignore
//! use libretto::document::DocumentParser;
//! use libretto::import::{DocumentImporter, ImportOptions};
//! use libretto::publication::InMemoryLibrary;
//!
//! let document = DocumentParser::from_path("book.textbundle").parse()?;
//!
//! let mut library = InMemoryLibrary::new();
//! let result = DocumentImporter::new(&mut library)
//!     .import("editor", &document, &ImportOptions::default());
//! assert!(result.success);
//! ```

pub mod document;
pub mod import;
pub mod publication;

pub use document::{DocumentParser, ParseError, ParsedDocument, ParsedSection};
pub use import::{DocumentImporter, ImportOptions, ImportResult};
