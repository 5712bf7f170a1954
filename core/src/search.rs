use crate::engine::Engine;
use crate::index::{DocId, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    /// Opaque reference the caller turns into a document link.
    pub doc_id: DocId,
    pub score: f64,
}

/// Cut `content` to at most `max_bytes`, backing off continuation bytes so a
/// multi-byte character is never split, and mark the cut.
pub fn snippet(content: &str, max_bytes: usize) -> String {
    if content.len() <= max_bytes {
        return content.to_string();
    }
    let bytes = content.as_bytes();
    let mut cut = max_bytes;
    while cut > 0 && bytes[cut] & 0xC0 == 0x80 {
        cut -= 1;
    }
    format!("{}{}", &content[..cut], TRUNCATION_MARKER)
}

impl InvertedIndex {
    /// Union of the posting lists of `terms`.
    pub fn candidates<'a>(&'a self, terms: &[String]) -> BTreeSet<&'a DocId> {
        terms
            .iter()
            .filter_map(|t| self.postings(t))
            .flatten()
            .collect()
    }

    /// `raw_count / total_tokens * ln(N / df)`; zero whenever the term is
    /// missing or present in every document.
    pub fn tf_idf(&self, term: &str, id: &str) -> f64 {
        let Some(doc_terms) = self.doc_terms(id) else { return 0.0 };
        let Some(&count) = doc_terms.counts.get(term) else { return 0.0 };
        if doc_terms.total == 0 {
            return 0.0;
        }
        let tf = f64::from(count) / f64::from(doc_terms.total);

        let df = f64::from(self.document_frequency(term));
        let n = self.num_docs() as f64;
        let idf = if df > 0.0 && n > df { (n / df).ln() } else { 0.0 };
        tf * idf
    }

    pub fn relevance(&self, id: &str, terms: &[String]) -> f64 {
        terms.iter().map(|t| self.tf_idf(t, id)).sum()
    }
}

impl Engine {
    /// OR-candidates for `query`: every document holding at least one query term.
    pub fn candidates(&self, query: &str) -> BTreeSet<DocId> {
        let terms = self.pipeline.analyze(query);
        let index = self.index.read();
        index.candidates(&terms).into_iter().cloned().collect()
    }

    pub fn search_default(&self, query: &str) -> Vec<SearchResult> {
        self.search(query, self.config.default_max_results)
    }

    /// Rank documents against `query` by additive TF-IDF and return at most
    /// `max_results` hits, best first.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let terms = self.pipeline.analyze(query);
        if terms.is_empty() {
            tracing::debug!(query, "query has no searchable terms");
            return Vec::new();
        }

        let index = self.index.read();
        let mut scored: Vec<(&DocId, f64)> = index
            .candidates(&terms)
            .into_iter()
            .map(|id| (id, index.relevance(id, &terms)))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        // stable: equal scores keep ascending id order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let total_hits = scored.len();

        let results: Vec<SearchResult> = scored
            .into_iter()
            .filter_map(|(id, score)| {
                let doc = index.document(id)?;
                Some(SearchResult {
                    title: doc.title.clone(),
                    snippet: snippet(&doc.content, self.config.snippet_bytes),
                    doc_id: id.clone(),
                    score,
                })
            })
            .take(max_results)
            .collect();

        tracing::debug!(query, total_hits, returned = results.len(), "search completed");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_untouched() {
        assert_eq!(snippet("hello", 180), "hello");
    }

    #[test]
    fn snippet_backs_off_to_char_boundary() {
        // each char is 3 bytes; byte 4 is inside the second char
        let s = snippet("搜索引擎", 4);
        assert_eq!(s, "搜...");
        assert_eq!(snippet("abcdef", 3), "abc...");
    }

    #[test]
    fn idf_is_zero_for_ubiquitous_terms() {
        let engine = Engine::new();
        engine.add_document("a", "", "shared alpha");
        engine.add_document("b", "", "shared beta");
        engine.with_index(|idx| {
            assert_eq!(idx.tf_idf("shared", "a"), 0.0);
            assert!(idx.tf_idf("alpha", "a") > 0.0);
            assert_eq!(idx.tf_idf("alpha", "missing"), 0.0);
        });
        assert!(engine.search("shared", 10).is_empty());
    }
}
