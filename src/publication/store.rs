//! Storage capability traits
//!
//! The narrow interfaces the host platform must supply: a collection
//! store for publications/chapters and their typed configuration, a
//! thread store for chapter content threads, and an optional cover
//! uploader hook. The importer runs entirely against these traits.

use thiserror::Error;

use super::types::{
    ChapterConfig, Collection, Post, PublicationConfig, StyleHints, Thread,
};

/// Errors surfaced by a host store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage failure: {0}")]
    Backend(String),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Request to create a collection
#[derive(Debug, Clone)]
pub struct NewCollection {
    pub name: String,
    pub slug: String,
    pub owner: String,
    pub parent_id: Option<String>,
    pub style: StyleHints,
}

/// Request to create a thread
#[derive(Debug, Clone)]
pub struct NewThread {
    pub title: String,
    pub owner: String,
    pub collection_id: String,
    pub pinned: bool,
    /// Marks this as the collection's single content thread
    pub content: bool,
}

/// Collection storage capability
pub trait CollectionStore {
    fn find_collection(&self, id: &str) -> Result<Option<Collection>>;

    fn find_by_slug(&self, slug: &str) -> Result<Option<Collection>>;

    fn create_collection(&mut self, req: NewCollection) -> Result<Collection>;

    fn child_collections(&self, parent_id: &str) -> Result<Vec<Collection>>;

    fn publication_config(&self, collection_id: &str) -> Result<Option<PublicationConfig>>;

    /// Replace the publication configuration in one atomic operation
    fn update_publication_config(
        &mut self,
        collection_id: &str,
        config: PublicationConfig,
    ) -> Result<()>;

    fn chapter_config(&self, collection_id: &str) -> Result<Option<ChapterConfig>>;

    /// Replace the chapter configuration in one atomic operation
    fn update_chapter_config(&mut self, collection_id: &str, config: ChapterConfig) -> Result<()>;
}

/// Thread storage capability
pub trait ThreadStore {
    /// The collection's single content thread, if one exists
    fn content_thread(&self, collection_id: &str) -> Result<Option<Thread>>;

    fn create_thread(&mut self, req: NewThread) -> Result<Thread>;

    fn first_post(&self, thread_id: &str) -> Result<Option<Post>>;

    fn create_first_post(&mut self, thread_id: &str, owner: &str, body: &str) -> Result<Post>;

    fn revise_post(&mut self, post_id: &str, owner: &str, new_body: &str) -> Result<()>;
}

/// Cover upload capability
///
/// Injected extension point; imports run without one, leaving the
/// publication cover unset.
pub trait CoverUploader {
    fn upload_cover(&mut self, collection_id: &str, image: &[u8]) -> Result<()>;
}
