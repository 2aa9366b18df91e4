//! Document importer
//!
//! Merges a `ParsedDocument` into the host platform as a publication
//! plus chapter set. Target resolution is all-or-nothing; section
//! processing is best-effort, with each failure recorded and the loop
//! continuing.

use thiserror::Error;

use crate::document::{ParsedDocument, ParsedSection};
use crate::publication::{
    Chapter, ChapterConfig, CollectionStore, CoverUploader, NewCollection, NewThread, Publication,
    PublicationConfig, StoreError, ThreadStore,
};

use super::slug::{random_slug, slugify};
use super::types::{ImportOptions, ImportResult};

/// Fatal import failures; every variant aborts before any chapter work
/// has been persisted.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Publication not found: {0}")]
    PublicationNotFound(String),

    #[error("Collection {0} is not an enabled publication")]
    NotAPublication(String),

    #[error("A publication with slug '{0}' already exists")]
    SlugTaken(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

enum SectionOutcome {
    Created(String),
    Updated(String),
    Skipped(String),
}

/// Importer over host-supplied storage capabilities
///
/// The host is expected to wrap the whole `import` call in its own
/// transaction; the importer orders its operations so that every fatal
/// path completes before the first write.
pub struct DocumentImporter<'a, S: CollectionStore + ThreadStore> {
    store: &'a mut S,
    cover_uploader: Option<&'a mut dyn CoverUploader>,
}

impl<'a, S: CollectionStore + ThreadStore> DocumentImporter<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            cover_uploader: None,
        }
    }

    /// Inject the cover upload hook
    pub fn with_cover_uploader(mut self, uploader: &'a mut dyn CoverUploader) -> Self {
        self.cover_uploader = Some(uploader);
        self
    }

    /// Import a parsed document for the acting user
    pub fn import(
        &mut self,
        actor: &str,
        document: &ParsedDocument,
        options: &ImportOptions,
    ) -> ImportResult {
        let start = std::time::Instant::now();

        let publication = match self.resolve_target(actor, document, options) {
            Ok(publication) => publication,
            Err(e) => {
                tracing::warn!(error = %e, "import aborted while resolving target");
                return ImportResult::fatal(e);
            }
        };

        let existing = match self.load_chapters(&publication) {
            Ok(chapters) => chapters,
            Err(e) => {
                tracing::warn!(error = %e, "import aborted while loading existing chapters");
                return ImportResult::fatal(e);
            }
        };
        tracing::debug!(
            publication = %publication.collection.slug,
            existing = existing.len(),
            sections = document.sections.len(),
            "resolved import target"
        );

        let mut result = ImportResult {
            publication: Some(publication.clone()),
            ..ImportResult::default()
        };

        for section in &document.sections {
            let outcome = self.import_section(
                actor,
                &publication,
                &existing,
                section,
                options,
                &mut result.warnings,
            );
            match outcome {
                Ok(SectionOutcome::Created(title)) => result.chapters_created.push(title),
                Ok(SectionOutcome::Updated(title)) => result.chapters_updated.push(title),
                Ok(SectionOutcome::Skipped(message)) => result.errors.push(message),
                Err(e) => {
                    tracing::warn!(section = section.number, error = %e, "section failed");
                    result.errors.push(format!(
                        "Section {} ('{}') failed: {}",
                        section.number, section.title, e
                    ));
                }
            }
        }

        self.handle_cover(document, &publication, &mut result.warnings);

        result.success = result.errors.is_empty()
            || !result.chapters_created.is_empty()
            || !result.chapters_updated.is_empty();

        tracing::info!(
            publication = %publication.collection.slug,
            created = result.chapters_created.len(),
            updated = result.chapters_updated.len(),
            errors = result.errors.len(),
            elapsed = ?start.elapsed(),
            "import complete"
        );

        result
    }

    /// Step 1: locate or create the target publication. Every failure
    /// here is fatal and precedes any chapter write.
    fn resolve_target(
        &mut self,
        actor: &str,
        document: &ParsedDocument,
        options: &ImportOptions,
    ) -> Result<Publication, ImportError> {
        if let Some(id) = &options.publication_id {
            let collection = self
                .store
                .find_collection(id)?
                .ok_or_else(|| ImportError::PublicationNotFound(id.clone()))?;
            let config = self
                .store
                .publication_config(id)?
                .filter(|config| config.enabled)
                .ok_or_else(|| ImportError::NotAPublication(id.clone()))?;
            return Ok(Publication { collection, config });
        }

        let title = document
            .title
            .clone()
            .unwrap_or_else(|| "Untitled".to_string());
        let slug = options
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                let derived = slugify(&title);
                if derived.is_empty() {
                    random_slug()
                } else {
                    derived
                }
            });

        if self.store.find_by_slug(&slug)?.is_some() {
            return Err(ImportError::SlugTaken(slug));
        }

        let collection = self.store.create_collection(NewCollection {
            name: title,
            slug,
            owner: actor.to_string(),
            parent_id: None,
            style: Default::default(),
        })?;

        let config = PublicationConfig {
            enabled: true,
            kind: document.kind.clone(),
            author: document.author.clone(),
            description: document.description.clone(),
        };
        self.store
            .update_publication_config(&collection.id, config.clone())?;

        Ok(Publication { collection, config })
    }

    /// Step 2: load the enabled chapters already under the target
    fn load_chapters(&self, publication: &Publication) -> Result<Vec<Chapter>, ImportError> {
        let mut chapters = Vec::new();
        for collection in self.store.child_collections(&publication.collection.id)? {
            let Some(config) = self.store.chapter_config(&collection.id)? else {
                continue;
            };
            if !config.enabled {
                continue;
            }
            let content_thread = self.store.content_thread(&collection.id)?.map(|t| t.id);
            chapters.push(Chapter {
                collection,
                config,
                content_thread,
            });
        }
        Ok(chapters)
    }

    fn import_section(
        &mut self,
        actor: &str,
        publication: &Publication,
        existing: &[Chapter],
        section: &ParsedSection,
        options: &ImportOptions,
        warnings: &mut Vec<String>,
    ) -> Result<SectionOutcome, StoreError> {
        // Number first, then title. Checking both up front keeps the
        // outcome independent of scan order and lets a coincidental
        // title match on a different chapter be surfaced.
        let number_match = existing.iter().find(|c| c.config.number == section.number);
        let title_match = existing.iter().find(|c| {
            c.collection
                .name
                .trim()
                .eq_ignore_ascii_case(section.title.trim())
        });

        if let (Some(by_number), Some(by_title)) = (number_match, title_match) {
            if by_number.collection.id != by_title.collection.id {
                warnings.push(format!(
                    "Section {} matches chapter '{}' by number and chapter '{}' by title; using the number match",
                    section.number, by_number.collection.name, by_title.collection.name
                ));
            }
        }

        match number_match.or(title_match) {
            None => self.create_chapter(actor, publication, section, options),
            Some(chapter) if options.replace_existing => {
                self.update_chapter(actor, chapter, section)
            }
            Some(chapter) => Ok(SectionOutcome::Skipped(format!(
                "Chapter '{}' already exists (section {}); skipped",
                chapter.collection.name, section.number
            ))),
        }
    }

    fn create_chapter(
        &mut self,
        actor: &str,
        publication: &Publication,
        section: &ParsedSection,
        options: &ImportOptions,
    ) -> Result<SectionOutcome, StoreError> {
        let slug_body = {
            let derived = slugify(&section.title);
            if derived.is_empty() {
                section.number.to_string()
            } else {
                derived
            }
        };

        let collection = self.store.create_collection(NewCollection {
            name: section.title.clone(),
            slug: format!("{}-{}", publication.collection.slug, slug_body),
            owner: actor.to_string(),
            parent_id: Some(publication.collection.id.clone()),
            style: publication.collection.style.clone(),
        })?;

        self.store.update_chapter_config(
            &collection.id,
            ChapterConfig {
                enabled: true,
                number: section.number,
                access_level: options.access_level.clone(),
                published: options.publish,
                word_count: section.word_count,
            },
        )?;

        let thread = self.store.create_thread(NewThread {
            title: section.title.clone(),
            owner: actor.to_string(),
            collection_id: collection.id.clone(),
            pinned: true,
            content: true,
        })?;
        self.store
            .create_first_post(&thread.id, actor, &section.content)?;

        tracing::debug!(chapter = %section.title, number = section.number, "created chapter");
        Ok(SectionOutcome::Created(section.title.clone()))
    }

    /// Update a matched chapter in place: word count and the content
    /// thread's first post. The stored chapter number is left alone.
    fn update_chapter(
        &mut self,
        actor: &str,
        chapter: &Chapter,
        section: &ParsedSection,
    ) -> Result<SectionOutcome, StoreError> {
        let mut config = chapter.config.clone();
        config.word_count = section.word_count;
        self.store
            .update_chapter_config(&chapter.collection.id, config)?;

        match &chapter.content_thread {
            Some(thread_id) => match self.store.first_post(thread_id)? {
                Some(post) => {
                    self.store.revise_post(&post.id, actor, &section.content)?;
                }
                None => {
                    self.store
                        .create_first_post(thread_id, actor, &section.content)?;
                }
            },
            None => {
                // Content thread somehow missing; recreate it.
                let thread = self.store.create_thread(NewThread {
                    title: chapter.collection.name.clone(),
                    owner: actor.to_string(),
                    collection_id: chapter.collection.id.clone(),
                    pinned: true,
                    content: true,
                })?;
                self.store
                    .create_first_post(&thread.id, actor, &section.content)?;
            }
        }

        tracing::debug!(chapter = %chapter.collection.name, "updated chapter");
        Ok(SectionOutcome::Updated(section.title.clone()))
    }

    /// Cover upload hook. Without an injected uploader the cover is
    /// left unset; an uploader failure is a warning, not an error.
    fn handle_cover(
        &mut self,
        document: &ParsedDocument,
        publication: &Publication,
        warnings: &mut Vec<String>,
    ) {
        let Some(image) = &document.cover_image else {
            return;
        };

        match self.cover_uploader.as_mut() {
            Some(uploader) => {
                if let Err(e) = uploader.upload_cover(&publication.collection.id, image) {
                    tracing::warn!(error = %e, "cover upload failed");
                    warnings.push(format!("Cover upload failed: {}", e));
                }
            }
            None => {
                tracing::info!("cover image present but no uploader configured; cover left unset");
                warnings.push(
                    "Cover image present but cover upload is not configured; cover left unset"
                        .to_string(),
                );
            }
        }
    }
}
