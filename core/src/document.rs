use crate::encoding;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Where the document was read from; the id is a hash of this path.
    pub source_path: String,
}

/// Stable identifier for a source path: `doc_` followed by the SHA-1 hex digest.
pub fn document_id(source_path: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(source_path.as_bytes());
    format!("doc_{:x}", hasher.finalize())
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), content: content.into(), source_path: source_path.into() }
    }

    /// Build a document from raw file bytes. Returns `None` when nothing but
    /// whitespace is left after encoding normalization.
    pub fn from_source(source_path: &str, title: &str, raw: &[u8]) -> Option<Self> {
        let content = encoding::normalize(raw);
        if content.trim().is_empty() {
            return None;
        }
        Some(Self::new(document_id(source_path), title, content, source_path))
    }
}
