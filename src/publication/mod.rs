//! Host entities and storage capabilities
//!
//! The importer's view of the host platform: publications and chapters
//! as collections with typed configuration, content threads with a
//! first post, and the capability traits a host must implement to
//! receive imports.

mod memory;
mod store;
mod types;

pub use memory::InMemoryLibrary;
pub use store::{
    CollectionStore, CoverUploader, NewCollection, NewThread, Result, StoreError, ThreadStore,
};
pub use types::{
    AccessLevel, Chapter, ChapterConfig, Collection, Post, Publication, PublicationConfig,
    StyleHints, Thread,
};
