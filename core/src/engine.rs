use crate::config::Bm25Params;
use crate::error::Result;
use crate::index::{read_content, Document, IndexMode, IndexOutcome, IndexStats, InvertedIndex};
use crate::scorer;
use crate::topk::Hit;
use crate::DocId;
use parking_lot::Mutex;
use std::io::Read;
use std::time::Instant;

/// Shareable search engine.
///
/// The index sits behind a single lock: at most one query is evaluated at a
/// time, and a query never observes a half-indexed document.
#[derive(Debug, Default)]
pub struct Engine {
    index: Mutex<InvertedIndex>,
    params: Bm25Params,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: Bm25Params) -> Self {
        Self { index: Mutex::new(InvertedIndex::new()), params }
    }

    pub fn index_document(&self, name: &str, content: &[u8], mode: IndexMode) -> Result<IndexOutcome> {
        self.index.lock().index_document(name, content, mode)
    }

    /// The stream is drained before the lock is taken.
    pub fn index_reader<R: Read>(&self, name: &str, reader: R, mode: IndexMode) -> Result<IndexOutcome> {
        if mode == IndexMode::Incremental {
            if let Some(doc) = self.index.lock().document_by_name(name) {
                return Ok(IndexOutcome::Skipped { doc_id: doc.doc_id, size: doc.size });
            }
        }
        let content = read_content(name, reader)?;
        self.index_document(name, &content, mode)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.lock().contains(name)
    }

    pub fn search(&self, query: &str, k: usize) -> Result<Vec<Hit>> {
        self.search_with_total(query, k).map(|(hits, _)| hits)
    }

    /// Like [`search`](Self::search), also returning the number of documents
    /// the query was ranked against, read under the same lock.
    pub fn search_with_total(&self, query: &str, k: usize) -> Result<(Vec<Hit>, usize)> {
        let start = Instant::now();
        let index = self.index.lock();
        let hits = scorer::search(&*index, query, k, &self.params)?;
        let total = index.num_docs();
        tracing::debug!(query, k, hits = hits.len(), total, took_us = start.elapsed().as_micros() as u64, "search");
        Ok((hits, total))
    }

    pub fn document(&self, doc_id: DocId) -> Option<Document> {
        self.index.lock().document(doc_id).cloned()
    }

    pub fn stats(&self) -> IndexStats {
        self.index.lock().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_ingest_and_search_see_whole_documents() {
        let engine = Arc::new(Engine::new());
        let writer = {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..200 {
                    engine
                        .index_document(&format!("doc{i}"), b"needle hay hay hay", IndexMode::Incremental)
                        .unwrap();
                }
            })
        };
        for _ in 0..50 {
            let stats = engine.stats();
            assert_eq!(stats.collection_size, stats.num_docs as u64 * 4);
            let hits = engine.search("needle", 500).unwrap();
            assert!(hits.iter().all(|h| h.size == 4));
        }
        writer.join().unwrap();
        assert_eq!(engine.stats().num_docs, 200);
    }

    #[test]
    fn search_reports_corpus_size_with_hits() {
        let engine = Engine::new();
        for name in ["a", "b", "c"] {
            engine.index_document(name, b"shared words here", IndexMode::Incremental).unwrap();
        }
        let (hits, total) = engine.search_with_total("words", 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(total, 3);
        assert_eq!(engine.search("words", 2).unwrap(), hits);

        let (hits, total) = Engine::new().search_with_total("words", 2).unwrap();
        assert!(hits.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn reader_skips_known_names_without_reading() {
        struct Unreadable;
        impl Read for Unreadable {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "must not be read"))
            }
        }

        let engine = Engine::new();
        engine.index_document("a", b"alpha", IndexMode::Incremental).unwrap();
        let outcome = engine.index_reader("a", Unreadable, IndexMode::Incremental).unwrap();
        assert!(outcome.is_skipped());
        assert!(engine.index_reader("b", Unreadable, IndexMode::Incremental).is_err());
        assert_eq!(engine.stats().num_docs, 1);
        assert_eq!(engine.document(1).unwrap().name, "a");
        assert!(engine.document(2).is_none());
    }
}
