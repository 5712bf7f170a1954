//! Filesystem source reader: walks a directory, reads every supported file,
//! normalizes its encoding and turns it into a [`Document`] ready for the
//! engine's bulk load.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use search_core::{document_id, encoding, Document};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Extensions (lower-case, without the dot) that are read as text.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "html", "htm", "md", "cpp", "h", "c", "hpp", "rs"];

/// Documents longer than this are cut before indexing.
pub const MAX_CONTENT_BYTES: usize = 10_000;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").expect("valid regex");
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("valid regex");
}

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    // last, so "&amp;lt;" decodes to "&lt;" and not "<"
    ("&amp;", "&"),
];

fn extension(path: &Path) -> Option<String> {
    path.extension().and_then(|s| s.to_str()).map(str::to_ascii_lowercase)
}

pub fn is_supported_file(path: &Path) -> bool {
    extension(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Recursively collect documents under `root`. Unreadable files and files
/// with no text are logged and skipped.
pub fn scan_directory<P: AsRef<Path>>(root: P) -> Vec<Document> {
    let root = root.as_ref();
    if !root.exists() {
        tracing::warn!(root = %root.display(), "directory does not exist");
        return Vec::new();
    }
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "path is not a directory");
        return Vec::new();
    }

    tracing::info!(root = %root.display(), "scanning directory");
    let mut docs = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_supported_file(path) {
            continue;
        }
        match parse_file(path) {
            Ok(doc) if doc.content.trim().is_empty() => {
                tracing::debug!(path = %path.display(), "skipping empty document");
            }
            Ok(doc) => {
                tracing::debug!(path = %path.display(), doc_id = %doc.id, "parsed file");
                docs.push(doc);
            }
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to parse file"),
        }
    }
    tracing::info!(num_docs = docs.len(), "scan complete");
    docs
}

/// Read one file into a document; HTML is reduced to its text.
pub fn parse_file(path: &Path) -> Result<Document> {
    let raw = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let text = encoding::normalize(&raw);
    let content = match extension(path).as_deref() {
        Some("html" | "htm") => extract_text_from_html(&text),
        _ => text,
    };
    let source_path = path.to_string_lossy().into_owned();
    Ok(Document::new(
        document_id(&source_path),
        extract_title(path),
        truncate_content(content, MAX_CONTENT_BYTES),
        source_path,
    ))
}

pub fn extract_text_from_html(html: &str) -> String {
    let mut text = TAG_RE.replace_all(html, " ").into_owned();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// File name without extension, with `_` and `-` turned into spaces.
pub fn extract_title(path: &Path) -> String {
    let stem = match path.file_stem() {
        Some(s) => s,
        None => return String::new(),
    };
    #[cfg(unix)]
    let name = {
        use std::os::unix::ffi::OsStrExt;
        encoding::normalize(stem.as_bytes())
    };
    #[cfg(not(unix))]
    let name = stem.to_string_lossy().into_owned();
    name.replace(['_', '-'], " ")
}

fn truncate_content(content: String, max_bytes: usize) -> String {
    if content.len() <= max_bytes {
        return content;
    }
    let mut cut = max_bytes;
    while !content.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &content[..cut])
}
