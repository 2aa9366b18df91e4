//! On-disk container format tests
//!
//! Exercises the bundle, folder, and archive handlers against real
//! directory and archive fixtures built in temp directories.

use std::fs;
use std::io::Write;
use std::path::Path;

use libretto::document::{DocumentParser, ParseError};

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

const BUNDLE_BODY: &str = "---\ntitle: Bundled Book\nauthor: Jane Doe\ntype: journal\n---\n\
# First\none two three\n\n\
# Second\nfour five\n";

fn build_bundle(dir: &Path) {
    write_file(&dir.join("info.json"), r#"{"version": 2, "type": "net.daringfireball.markdown"}"#);
    write_file(&dir.join("text.md"), BUNDLE_BODY);
    fs::create_dir_all(dir.join("assets")).unwrap();
    fs::write(dir.join("assets/cover.jpg"), [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    fs::write(dir.join("assets/figure1.png"), [0x89, 0x50, 0x4E, 0x47]).unwrap();
}

#[test]
fn test_parse_textbundle_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = tmp.path().join("Book.textbundle");
    build_bundle(&bundle);

    let doc = DocumentParser::from_path(&bundle).parse().unwrap();

    assert_eq!(doc.title.as_deref(), Some("Bundled Book"));
    assert_eq!(doc.author.as_deref(), Some("Jane Doe"));
    assert_eq!(doc.kind, libretto::document::DocumentKind::Journal);
    assert_eq!(doc.sections.len(), 2);
    assert_eq!(doc.sections[0].word_count, 3);
    assert_eq!(doc.cover_image.as_deref(), Some(&[0xFF, 0xD8, 0xFF, 0xE0][..]));
    assert!(doc.assets.contains_key("figure1.png"));
    assert!(!doc.assets.contains_key("cover.jpg"));
}

#[test]
fn test_bundle_without_manifest_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = tmp.path().join("Book.textbundle");
    write_file(&bundle.join("text.md"), BUNDLE_BODY);

    let err = DocumentParser::from_path(&bundle).parse().unwrap_err();
    assert!(matches!(err, ParseError::MissingFile(ref f) if f.contains("info.json")));
}

#[test]
fn test_bundle_without_body_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = tmp.path().join("Book.textbundle");
    write_file(&bundle.join("info.json"), "{}");

    let err = DocumentParser::from_path(&bundle).parse().unwrap_err();
    assert!(matches!(err, ParseError::MissingFile(ref f) if f.contains("text")));
}

#[test]
fn test_bundle_with_broken_manifest_still_parses() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = tmp.path().join("Book.textbundle");
    build_bundle(&bundle);
    write_file(&bundle.join("info.json"), "{not json at all");

    let doc = DocumentParser::from_path(&bundle).parse().unwrap();
    assert_eq!(doc.sections.len(), 2);
    // Body front matter still supplies metadata.
    assert_eq!(doc.title.as_deref(), Some("Bundled Book"));
}

#[test]
fn test_folder_with_index_directives() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    write_file(
        &dir.join("book.md"),
        "---\ntitle: Fragment Book\n---\n\
         /chapters/one.md\n\
         /chapters/two.md \"Custom Title\"\n\
         /chapters/missing.md\n",
    );
    write_file(&dir.join("chapters/one.md"), "# The Beginning\n\nIt begins.\n");
    write_file(&dir.join("chapters/two.md"), "It continues.\n");
    write_file(&dir.join("stray.md"), "# Stray\nnot referenced\n");

    let doc = DocumentParser::from_path(dir).parse().unwrap();

    assert_eq!(doc.title.as_deref(), Some("Fragment Book"));
    assert_eq!(doc.sections.len(), 2);
    assert_eq!(doc.sections[0].title, "The Beginning");
    assert_eq!(doc.sections[0].content, "It begins.");
    assert_eq!(doc.sections[1].title, "Custom Title");
    assert_eq!(doc.sections[1].content, "It continues.");
    assert_eq!(doc.sections[1].number, 2);
}

#[test]
fn test_folder_index_without_directives_is_the_document() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    write_file(
        &dir.join("index.md"),
        "---\ntitle: Inline Book\n---\n# Only Chapter\nbody text\n",
    );
    write_file(&dir.join("unused.md"), "# Unused\nnever read\n");

    let doc = DocumentParser::from_path(dir).parse().unwrap();
    assert_eq!(doc.title.as_deref(), Some("Inline Book"));
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].title, "Only Chapter");
}

#[test]
fn test_folder_without_index_uses_filename_order() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    write_file(&dir.join("00-meta.md"), "---\ntitle: Sorted Book\nauthor: A. Writer\n---\n");
    write_file(&dir.join("01-first.md"), "# First\none\n");
    write_file(&dir.join("02-second.md"), "second body without heading\n");
    write_file(&dir.join("notes.txt"), "not markup\n");

    let doc = DocumentParser::from_path(dir).parse().unwrap();

    // The front-matter-only leading file became document metadata.
    assert_eq!(doc.title.as_deref(), Some("Sorted Book"));
    assert_eq!(doc.author.as_deref(), Some("A. Writer"));
    assert_eq!(doc.sections.len(), 2);
    assert_eq!(doc.sections[0].title, "First");
    // No discoverable title: synthesized from position.
    assert_eq!(doc.sections[1].title, "Chapter 2");
    assert_eq!(doc.sections[1].content, "second body without heading");
}

#[test]
fn test_empty_folder_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let err = DocumentParser::from_path(tmp.path()).parse().unwrap_err();
    assert!(matches!(err, ParseError::NoSections(_)));
}

fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut buffer);
        let mut zip = ZipWriter::new(cursor);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

#[test]
fn test_parse_textpack_archive_from_path() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = build_zip(&[
        ("Book.textbundle/info.json", "{}"),
        ("Book.textbundle/text.md", BUNDLE_BODY),
    ]);
    let path = tmp.path().join("book.textpack");
    fs::write(&path, archive).unwrap();

    let doc = DocumentParser::from_path(&path).parse().unwrap();
    assert_eq!(doc.title.as_deref(), Some("Bundled Book"));
    assert_eq!(doc.sections.len(), 2);
}

#[test]
fn test_parse_zip_of_fragments_from_bytes() {
    let archive = build_zip(&[
        ("book/01-first.md", "# First\none two\n"),
        ("book/02-second.md", "# Second\nthree\n"),
    ]);

    let doc = DocumentParser::from_bytes(archive, "upload.zip")
        .parse()
        .unwrap();
    assert_eq!(doc.sections.len(), 2);
    assert_eq!(doc.sections[0].title, "First");
    assert_eq!(doc.sections[1].number, 2);
}

#[test]
fn test_corrupt_archive_is_fatal() {
    let err = DocumentParser::from_bytes(b"not a zip file".to_vec(), "upload.zip")
        .parse()
        .unwrap_err();
    assert!(matches!(err, ParseError::Archive(_)));
}

#[test]
fn test_markdown_file_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("book.md");
    write_file(&path, "# One\nbody\n");

    let doc = DocumentParser::from_path(&path).parse().unwrap();
    assert_eq!(doc.sections.len(), 1);
}

#[test]
fn test_plain_text_file_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("book.txt");
    write_file(&path, "TITLE: Disk Sample\n\nCHAPTER 1.\nbody text here.\n");

    let doc = DocumentParser::from_path(&path).parse().unwrap();
    assert_eq!(doc.title.as_deref(), Some("Disk Sample"));
    assert_eq!(doc.sections.len(), 1);
}

#[test]
fn test_unsupported_extension_on_disk_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("book.docx");
    fs::write(&path, b"binary").unwrap();

    let err = DocumentParser::from_path(&path).parse().unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedFormat(_)));
}
