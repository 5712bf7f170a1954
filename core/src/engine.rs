use crate::config::EngineConfig;
use crate::corpus::demo_corpus;
use crate::index::{DocId, DocTerms, IndexStats, InvertedIndex};
use crate::tokenizer::TextPipeline;
use crate::Document;
use parking_lot::RwLock;
use std::collections::BTreeSet;

/// In-memory search engine. Writers (`add_document`) take the lock
/// exclusively; `search` and `get_document` share it. Wrap in an `Arc` to
/// hand it to request handlers.
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) pipeline: TextPipeline,
    pub(crate) index: RwLock<InvertedIndex>,
}

impl Default for Engine {
    fn default() -> Self { Self::new() }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let pipeline = config.pipeline();
        Self { config, pipeline, index: RwLock::new(InvertedIndex::new()) }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &TextPipeline {
        &self.pipeline
    }

    /// Index `title + " " + content` under `id`, replacing any earlier version.
    pub fn add_document(&self, id: &str, title: &str, content: &str) {
        // Analysis touches no shared state; only the index update needs the lock.
        let terms = DocTerms::from_tokens(self.pipeline.analyze(&format!("{title} {content}")));
        let distinct = terms.counts.len();
        {
            let mut index = self.index.write();
            index.replace_document(id, title, content, terms);
        }
        tracing::debug!(doc_id = id, terms = distinct, "added document");
    }

    pub fn ingest(&self, doc: &Document) {
        self.add_document(&doc.id, &doc.title, &doc.content);
    }

    /// Bulk load: index every document in order. When the source yields
    /// nothing the demonstration corpus is indexed instead.
    pub fn load_documents<I: IntoIterator<Item = Document>>(&self, docs: I) -> IndexStats {
        tracing::info!("building index");
        let mut loaded = 0usize;
        for doc in docs {
            self.ingest(&doc);
            loaded += 1;
        }
        if loaded == 0 {
            tracing::info!("no source documents, indexing demo corpus");
            for doc in demo_corpus() {
                self.ingest(&doc);
            }
        }
        let stats = self.stats();
        tracing::info!(num_docs = stats.documents, num_terms = stats.terms, "index build complete");
        stats
    }

    pub fn stats(&self) -> IndexStats {
        self.index.read().stats()
    }

    /// `(title, content)` of a stored document, or two empty strings.
    pub fn get_document(&self, id: &str) -> (String, String) {
        let index = self.index.read();
        match index.document(id) {
            Some(doc) => (doc.title.clone(), doc.content.clone()),
            None => (String::new(), String::new()),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.read().contains(id)
    }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.index.read().document_frequency(term)
    }

    pub fn postings(&self, term: &str) -> BTreeSet<DocId> {
        self.index.read().postings(term).cloned().unwrap_or_default()
    }

    pub fn term_frequency(&self, id: &str, term: &str) -> u32 {
        self.index.read().term_frequency(id, term)
    }

    /// Run `f` against a consistent read-only view of the index.
    pub fn with_index<R>(&self, f: impl FnOnce(&InvertedIndex) -> R) -> R {
        f(&self.index.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_seeds_demo_corpus() {
        let engine = Engine::new();
        let stats = engine.load_documents(Vec::new());
        assert_eq!(stats.documents, 5);
        assert!(stats.terms > 0);
        assert_eq!(engine.get_document("doc3").0, "搜索引擎原理");
    }

    #[test]
    fn non_empty_source_skips_demo_corpus() {
        let engine = Engine::new();
        let stats = engine.load_documents(vec![Document::new("a", "Alpha", "lorem ipsum", "a.txt")]);
        assert_eq!(stats.documents, 1);
        assert!(!engine.contains("doc1"));
    }

    #[test]
    fn missing_document_is_empty() {
        let engine = Engine::new();
        assert_eq!(engine.get_document("nope"), (String::new(), String::new()));
    }
}
