//! Bundled-package handler
//!
//! A bundle is a directory carrying an `info.json` manifest, a `text.*`
//! body file, and an optional `assets/` subdirectory. The body is
//! structured markup; assets are collected as named blobs and a
//! `cover.*` asset becomes the document cover.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::error::{ParseError, Result};
use super::markdown;
use super::types::ParsedDocument;

const MANIFEST: &str = "info.json";

/// Parse a bundled package directory
pub(crate) fn parse(dir: &Path) -> Result<ParsedDocument> {
    let manifest_path = dir.join(MANIFEST);
    if !manifest_path.is_file() {
        return Err(ParseError::MissingFile(manifest_path.display().to_string()));
    }

    let body_path = find_body(dir)?;
    let body = fs::read_to_string(&body_path)?;
    let mut doc = markdown::parse(&body)?;

    // Manifest quirks degrade to absent metadata, never an error.
    apply_manifest(&manifest_path, &mut doc);
    collect_assets(dir, &mut doc)?;

    tracing::debug!(
        bundle = %dir.display(),
        sections = doc.sections.len(),
        assets = doc.assets.len(),
        "parsed bundle"
    );

    Ok(doc)
}

/// Locate the `text.*` body file
fn find_body(dir: &Path) -> Result<PathBuf> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path
                .file_stem()
                .is_some_and(|s| s.eq_ignore_ascii_case("text"))
        {
            return Ok(path);
        }
    }
    Err(ParseError::MissingFile(
        dir.join("text.*").display().to_string(),
    ))
}

/// Fill document metadata from manifest fields the body left unset
fn apply_manifest(path: &Path, doc: &mut ParsedDocument) {
    let Ok(raw) = fs::read_to_string(path) else {
        return;
    };
    let manifest: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(manifest = %path.display(), error = %e, "malformed manifest ignored");
            return;
        }
    };

    let field = |key: &str| manifest.get(key).and_then(Value::as_str).map(str::to_string);
    if doc.title.is_none() {
        doc.title = field("title");
    }
    if doc.author.is_none() {
        doc.author = field("author");
    }
    if doc.description.is_none() {
        doc.description = field("description");
    }
    if let Some(kind) = field("type") {
        // TextBundle manifests use UTIs here; only plain tags are kinds.
        if !kind.contains('.') {
            doc.kind = kind.into();
        }
    }
}

/// Collect `assets/` blobs; a `cover.*` file becomes the cover image
fn collect_assets(dir: &Path, doc: &mut ParsedDocument) -> Result<()> {
    let assets_dir = dir.join("assets");
    if !assets_dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(&assets_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        let data = fs::read(&path)?;

        let is_cover = path
            .file_stem()
            .is_some_and(|s| s.eq_ignore_ascii_case("cover"));
        if is_cover && doc.cover_image.is_none() {
            doc.cover_image = Some(data);
        } else {
            doc.assets.insert(name, data);
        }
    }

    Ok(())
}
