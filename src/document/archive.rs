//! Compressed-archive handler
//!
//! `.zip` / `.textpack` archives are extracted into a scratch directory
//! and re-dispatched to the bundle or folder handler depending on what
//! is inside. The scratch directory is removed on every exit path.

use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use super::bundle;
use super::error::Result;
use super::folder;
use super::types::ParsedDocument;

/// Parse an archive file on disk
pub(crate) fn parse_path(path: &Path) -> Result<ParsedDocument> {
    let file = fs::File::open(path)?;
    extract_and_parse(file)
}

/// Parse archive bytes (for uploads)
pub(crate) fn parse_bytes(content: &[u8]) -> Result<ParsedDocument> {
    extract_and_parse(Cursor::new(content))
}

fn extract_and_parse<R: Read + Seek>(reader: R) -> Result<ParsedDocument> {
    let mut archive = ZipArchive::new(reader)?;

    // TempDir removes the extraction root when dropped, so both the
    // success and error paths below clean up.
    let scratch = tempfile::tempdir()?;
    archive.extract(scratch.path())?;
    tracing::debug!(entries = archive.len(), "extracted archive to scratch directory");

    let root = unwrap_wrapper_dirs(scratch.path().to_path_buf())?;
    if root.join("info.json").is_file() {
        bundle::parse(&root)
    } else {
        folder::parse(&root)
    }
}

/// Descend through archives that wrap their content in a single
/// directory (the common `Book.textbundle/` or `book/` layout).
/// Metadata litter like `__MACOSX` is ignored.
fn unwrap_wrapper_dirs(mut root: PathBuf) -> Result<PathBuf> {
    loop {
        let mut entries: Vec<PathBuf> = fs::read_dir(&root)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| !n.starts_with('.') && n != "__MACOSX")
            })
            .collect();

        if entries.len() == 1 && entries[0].is_dir() {
            root = entries.remove(0);
        } else {
            return Ok(root);
        }
    }
}
