//! In-memory store implementation
//!
//! Backs all storage capabilities with plain maps. Used by the test
//! suites and as a reference for host adapters; not a persistence
//! layer.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use uuid::Uuid;

use super::store::{
    CollectionStore, CoverUploader, NewCollection, NewThread, Result, StoreError, ThreadStore,
};
use super::types::{ChapterConfig, Collection, Post, PublicationConfig, Thread};

/// In-memory host library
#[derive(Debug, Default)]
pub struct InMemoryLibrary {
    collections: BTreeMap<String, Collection>,
    publication_configs: BTreeMap<String, PublicationConfig>,
    chapter_configs: BTreeMap<String, ChapterConfig>,
    threads: BTreeMap<String, Thread>,
    /// collection id -> its single content thread
    content_threads: BTreeMap<String, String>,
    posts: BTreeMap<String, Post>,
    /// thread id -> first post
    first_posts: BTreeMap<String, String>,
    covers: BTreeMap<String, Vec<u8>>,
    /// Names whose creation fails, for failure-path tests
    rejected_names: BTreeSet<String>,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_collection` fail validation for a given name
    pub fn reject_collections_named(&mut self, name: &str) {
        self.rejected_names.insert(name.to_string());
    }

    /// Number of collections in the store
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Uploaded cover for a collection, if any
    pub fn cover(&self, collection_id: &str) -> Option<&[u8]> {
        self.covers.get(collection_id).map(Vec::as_slice)
    }
}

impl CollectionStore for InMemoryLibrary {
    fn find_collection(&self, id: &str) -> Result<Option<Collection>> {
        Ok(self.collections.get(id).cloned())
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Collection>> {
        Ok(self
            .collections
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    fn create_collection(&mut self, req: NewCollection) -> Result<Collection> {
        if self.rejected_names.contains(&req.name) {
            return Err(StoreError::Validation(format!(
                "name '{}' is not allowed",
                req.name
            )));
        }
        if self.collections.values().any(|c| c.slug == req.slug) {
            return Err(StoreError::Validation(format!(
                "slug '{}' is already taken",
                req.slug
            )));
        }

        let now = Utc::now();
        let collection = Collection {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            slug: req.slug,
            owner: req.owner,
            parent_id: req.parent_id,
            style: req.style,
            created_at: now,
            updated_at: now,
        };
        self.collections
            .insert(collection.id.clone(), collection.clone());
        Ok(collection)
    }

    fn child_collections(&self, parent_id: &str) -> Result<Vec<Collection>> {
        Ok(self
            .collections
            .values()
            .filter(|c| c.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect())
    }

    fn publication_config(&self, collection_id: &str) -> Result<Option<PublicationConfig>> {
        Ok(self.publication_configs.get(collection_id).cloned())
    }

    fn update_publication_config(
        &mut self,
        collection_id: &str,
        config: PublicationConfig,
    ) -> Result<()> {
        self.require_collection(collection_id)?;
        self.publication_configs
            .insert(collection_id.to_string(), config);
        Ok(())
    }

    fn chapter_config(&self, collection_id: &str) -> Result<Option<ChapterConfig>> {
        Ok(self.chapter_configs.get(collection_id).cloned())
    }

    fn update_chapter_config(&mut self, collection_id: &str, config: ChapterConfig) -> Result<()> {
        self.require_collection(collection_id)?;
        self.chapter_configs
            .insert(collection_id.to_string(), config);
        Ok(())
    }
}

impl ThreadStore for InMemoryLibrary {
    fn content_thread(&self, collection_id: &str) -> Result<Option<Thread>> {
        Ok(self
            .content_threads
            .get(collection_id)
            .and_then(|id| self.threads.get(id))
            .cloned())
    }

    fn create_thread(&mut self, req: NewThread) -> Result<Thread> {
        if req.content && self.content_threads.contains_key(&req.collection_id) {
            return Err(StoreError::Validation(format!(
                "collection {} already has a content thread",
                req.collection_id
            )));
        }

        let thread = Thread {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            collection_id: req.collection_id,
            owner: req.owner,
            pinned: req.pinned,
            created_at: Utc::now(),
        };
        if req.content {
            self.content_threads
                .insert(thread.collection_id.clone(), thread.id.clone());
        }
        self.threads.insert(thread.id.clone(), thread.clone());
        Ok(thread)
    }

    fn first_post(&self, thread_id: &str) -> Result<Option<Post>> {
        Ok(self
            .first_posts
            .get(thread_id)
            .and_then(|id| self.posts.get(id))
            .cloned())
    }

    fn create_first_post(&mut self, thread_id: &str, owner: &str, body: &str) -> Result<Post> {
        if !self.threads.contains_key(thread_id) {
            return Err(StoreError::ThreadNotFound(thread_id.to_string()));
        }
        if self.first_posts.contains_key(thread_id) {
            return Err(StoreError::Validation(format!(
                "thread {} already has a first post",
                thread_id
            )));
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4().to_string(),
            thread_id: thread_id.to_string(),
            owner: owner.to_string(),
            body: body.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.first_posts
            .insert(thread_id.to_string(), post.id.clone());
        self.posts.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    fn revise_post(&mut self, post_id: &str, _owner: &str, new_body: &str) -> Result<()> {
        let post = self
            .posts
            .get_mut(post_id)
            .ok_or_else(|| StoreError::PostNotFound(post_id.to_string()))?;
        post.body = new_body.to_string();
        post.updated_at = Utc::now();
        Ok(())
    }
}

impl CoverUploader for InMemoryLibrary {
    fn upload_cover(&mut self, collection_id: &str, image: &[u8]) -> Result<()> {
        self.require_collection(collection_id)?;
        self.covers.insert(collection_id.to_string(), image.to_vec());
        Ok(())
    }
}

impl InMemoryLibrary {
    fn require_collection(&self, id: &str) -> Result<()> {
        if self.collections.contains_key(id) {
            Ok(())
        } else {
            Err(StoreError::CollectionNotFound(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::types::StyleHints;

    fn new_collection(name: &str, slug: &str) -> NewCollection {
        NewCollection {
            name: name.to_string(),
            slug: slug.to_string(),
            owner: "tester".to_string(),
            parent_id: None,
            style: StyleHints::default(),
        }
    }

    #[test]
    fn test_slug_uniqueness() {
        let mut lib = InMemoryLibrary::new();
        lib.create_collection(new_collection("A", "a")).unwrap();
        let err = lib.create_collection(new_collection("B", "a")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_single_content_thread_per_collection() {
        let mut lib = InMemoryLibrary::new();
        let c = lib.create_collection(new_collection("A", "a")).unwrap();

        let req = NewThread {
            title: "t".to_string(),
            owner: "tester".to_string(),
            collection_id: c.id.clone(),
            pinned: true,
            content: true,
        };
        lib.create_thread(req.clone()).unwrap();
        let err = lib.create_thread(req).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_first_post_round_trip() {
        let mut lib = InMemoryLibrary::new();
        let c = lib.create_collection(new_collection("A", "a")).unwrap();
        let thread = lib
            .create_thread(NewThread {
                title: "t".to_string(),
                owner: "tester".to_string(),
                collection_id: c.id,
                pinned: true,
                content: true,
            })
            .unwrap();

        let post = lib.create_first_post(&thread.id, "tester", "body").unwrap();
        lib.revise_post(&post.id, "tester", "revised").unwrap();
        let fetched = lib.first_post(&thread.id).unwrap().unwrap();
        assert_eq!(fetched.body, "revised");
    }
}
