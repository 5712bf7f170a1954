use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub type DocId = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDoc {
    pub title: String,
    pub content: String,
}

/// Raw term counts of one document after stop-word removal.
#[derive(Debug, Clone, Default)]
pub struct DocTerms {
    pub counts: HashMap<String, u32>,
    /// Sum of `counts`.
    pub total: u32,
}

impl DocTerms {
    pub fn from_tokens<I: IntoIterator<Item = String>>(tokens: I) -> Self {
        let mut counts: HashMap<String, u32> = HashMap::new();
        let mut total = 0u32;
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
            total += 1;
        }
        Self { counts, total }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub terms: usize,
}

/// Postings, document frequencies, per-document term counts and the raw
/// document store. `df[t] == postings[t].len()` holds between calls to
/// [`InvertedIndex::replace_document`]; callers guard it with a lock.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeSet<DocId>>, // ordered so candidate discovery is deterministic
    df: HashMap<String, u32>,
    tf: HashMap<DocId, DocTerms>,
    docs: HashMap<DocId, StoredDoc>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Store a document and make `terms` its only contribution to the index,
    /// retracting whatever an earlier version under the same id contributed.
    pub fn replace_document(&mut self, id: &str, title: &str, content: &str, terms: DocTerms) {
        self.docs.insert(id.to_string(), StoredDoc { title: title.to_string(), content: content.to_string() });

        if let Some(previous) = self.tf.remove(id) {
            for term in previous.counts.keys() {
                self.retract(term, id);
            }
        }

        for term in terms.counts.keys() {
            let newly_added = self.postings.entry(term.clone()).or_default().insert(id.to_string());
            if newly_added {
                *self.df.entry(term.clone()).or_insert(0) += 1;
            }
        }
        self.tf.insert(id.to_string(), terms);
    }

    fn retract(&mut self, term: &str, id: &str) {
        let Some(docs) = self.postings.get_mut(term) else { return };
        if !docs.remove(id) {
            return;
        }
        if docs.is_empty() {
            self.postings.remove(term);
            self.df.remove(term);
        } else if let Some(count) = self.df.get_mut(term) {
            *count -= 1;
        }
    }

    pub fn document(&self, id: &str) -> Option<&StoredDoc> {
        self.docs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.docs.contains_key(id)
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats { documents: self.num_docs(), terms: self.num_terms() }
    }

    pub fn postings(&self, term: &str) -> Option<&BTreeSet<DocId>> {
        self.postings.get(term)
    }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.df.get(term).copied().unwrap_or(0)
    }

    pub fn doc_terms(&self, id: &str) -> Option<&DocTerms> {
        self.tf.get(id)
    }

    pub fn term_frequency(&self, id: &str, term: &str) -> u32 {
        self.tf.get(id).and_then(|t| t.counts.get(term)).copied().unwrap_or(0)
    }

    /// Terms whose document frequency disagrees with their posting list.
    pub fn inconsistent_terms(&self) -> Vec<String> {
        let mut bad: Vec<String> = self
            .postings
            .iter()
            .filter(|(term, docs)| self.document_frequency(term) as usize != docs.len())
            .map(|(term, _)| term.clone())
            .collect();
        bad.extend(self.df.keys().filter(|t| !self.postings.contains_key(*t)).cloned());
        bad
    }
}
