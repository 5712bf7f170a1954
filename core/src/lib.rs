//! In-memory full-text search: encoding normalization, CJK-aware
//! tokenization, an inverted index guarded by a reader/writer lock, and
//! TF-IDF ranking.

pub mod config;
pub mod corpus;
pub mod document;
pub mod encoding;
pub mod engine;
pub mod index;
pub mod search;
pub mod tokenizer;

pub use config::EngineConfig;
pub use document::{document_id, Document};
pub use engine::Engine;
pub use index::{DocId, IndexStats, InvertedIndex, StoredDoc};
pub use search::SearchResult;
