use crate::error::{Error, Result};
use crate::postings::{DeltaVByte, Posting, PostingsCodec, PostingsStore};
use crate::tokenizer::tokenize;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: DocId,
    /// Display name, usually the base file name.
    pub name: String,
    /// Number of tokens extracted from the content.
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexMode {
    /// A name that is already indexed is skipped. Used for periodic re-scans.
    #[default]
    Incremental,
    /// Always index as a new document, even under a known name.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    Indexed { doc_id: DocId, size: u32 },
    Skipped { doc_id: DocId, size: u32 },
}

impl IndexOutcome {
    pub fn doc_id(&self) -> DocId {
        match *self {
            IndexOutcome::Indexed { doc_id, .. } | IndexOutcome::Skipped { doc_id, .. } => doc_id,
        }
    }

    pub fn size(&self) -> u32 {
        match *self {
            IndexOutcome::Indexed { size, .. } | IndexOutcome::Skipped { size, .. } => size,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, IndexOutcome::Skipped { .. })
    }
}

/// Drain `reader` into memory, tagging a failure with the document name.
pub(crate) fn read_content<R: Read>(name: &str, mut reader: R) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .map_err(|source| Error::Read { name: name.to_owned(), source })?;
    Ok(content)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub num_docs: usize,
    pub num_terms: usize,
    pub collection_size: u64,
    pub postings_bytes: usize,
}

/// In-memory inverted index: the document roster plus the term dictionary.
///
/// Documents live in an arena addressed by `doc_id - 1`, so postings resolve
/// to their document in constant time.
#[derive(Debug)]
pub struct InvertedIndex<C = DeltaVByte> {
    docs: Vec<Document>,
    by_name: HashMap<String, DocId>,
    postings: PostingsStore<C>,
}

impl<C> Default for InvertedIndex<C> {
    fn default() -> Self {
        Self { docs: Vec::new(), by_name: HashMap::new(), postings: PostingsStore::default() }
    }
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: PostingsCodec> InvertedIndex<C> {
    /// Tokenize `content` and add it under `name`.
    ///
    /// Term frequencies are gathered before anything is committed, and every
    /// posting of the new document carries the highest doc id so far, so the
    /// index is never left holding part of a document.
    pub fn index_document(&mut self, name: &str, content: &[u8], mode: IndexMode) -> Result<IndexOutcome> {
        if mode == IndexMode::Incremental {
            if let Some(doc) = self.document_by_name(name) {
                tracing::trace!(name, doc_id = doc.doc_id, "already indexed, skipping");
                return Ok(IndexOutcome::Skipped { doc_id: doc.doc_id, size: doc.size });
            }
        }

        let mut tf_counts: HashMap<String, u32> = HashMap::new();
        let mut size: u32 = 0;
        for term in tokenize(content) {
            *tf_counts.entry(term).or_insert(0) += 1;
            size += 1;
        }

        let doc_id = self.docs.len() as DocId + 1;
        for (term, freq) in &tf_counts {
            self.postings.append(term, Posting { doc_id, freq: *freq })?;
        }
        self.docs.push(Document { doc_id, name: name.to_owned(), size });
        self.by_name.insert(name.to_owned(), doc_id);

        tracing::debug!(name, doc_id, size, terms = tf_counts.len(), "indexed document");
        Ok(IndexOutcome::Indexed { doc_id, size })
    }

    /// Read `reader` to the end, then index it. A read failure leaves the
    /// index exactly as it was.
    pub fn index_reader<R: Read>(&mut self, name: &str, reader: R, mode: IndexMode) -> Result<IndexOutcome> {
        if mode == IndexMode::Incremental {
            if let Some(doc) = self.document_by_name(name) {
                return Ok(IndexOutcome::Skipped { doc_id: doc.doc_id, size: doc.size });
            }
        }
        let content = read_content(name, reader)?;
        self.index_document(name, &content, mode)
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        let idx = (doc_id as usize).checked_sub(1)?;
        self.docs.get(idx)
    }

    pub fn document_by_name(&self, name: &str) -> Option<&Document> {
        self.by_name.get(name).and_then(|&id| self.document(id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All documents in doc id order.
    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn postings(&self) -> &PostingsStore<C> {
        &self.postings
    }

    #[cfg(test)]
    pub(crate) fn postings_mut(&mut self) -> &mut PostingsStore<C> {
        &mut self.postings
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Total token count, derived from the document sizes.
    pub fn collection_size(&self) -> u64 {
        self.docs.iter().map(|d| d.size as u64).sum()
    }

    /// `None` for an empty corpus.
    pub fn avg_doc_len(&self) -> Option<f64> {
        if self.docs.is_empty() {
            return None;
        }
        Some(self.collection_size() as f64 / self.docs.len() as f64)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_docs: self.num_docs(),
            num_terms: self.postings.term_count(),
            collection_size: self.collection_size(),
            postings_bytes: self.postings.encoded_bytes(),
        }
    }
}
