//! BM25 ranking over an [`InvertedIndex`].
//!
//! Scores accumulate in a buffer created for each call and indexed by
//! `doc_id - 1`, so nothing from one query can leak into the next.

use crate::config::Bm25Params;
use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::postings::PostingsCodec;
use crate::tokenizer::tokenize;
use crate::topk::{select_top_k, Hit};
use std::collections::BTreeMap;

/// Query term frequencies, normalized with the document tokenizer. Ordered so
/// that floating point accumulation is the same on every call.
pub fn query_terms(query: &str) -> BTreeMap<String, u32> {
    let mut fqt = BTreeMap::new();
    for term in tokenize(query.as_bytes()) {
        *fqt.entry(term).or_insert(0) += 1;
    }
    fqt
}

/// Query-side weight of a term: IDF scaled by query term frequency.
pub fn query_weight(n: f64, ft: f64, fqt: f64, params: &Bm25Params) -> f64 {
    let ratio = (n - ft + 0.5) / (ft + 0.5);
    let idf = if params.smoothed_idf { ratio.ln_1p() } else { ratio.ln() };
    idf * (params.k3 + 1.0) * fqt / (params.k3 + fqt)
}

/// Document-side weight of a term with in-document frequency `fdt` in a
/// document of `wd` tokens.
pub fn doc_weight(fdt: f64, wd: f64, avg_doc_len: f64, params: &Bm25Params) -> f64 {
    let len_ratio = if avg_doc_len > 0.0 { wd / avg_doc_len } else { 0.0 };
    let kd = params.k1 * ((1.0 - params.b) + params.b * len_ratio);
    (params.k1 + 1.0) * fdt / (kd + fdt)
}

/// BM25 score of every document, indexed by `doc_id - 1`. Empty for an empty
/// corpus.
pub fn score_documents<C: PostingsCodec>(index: &InvertedIndex<C>, query: &str, params: &Bm25Params) -> Result<Vec<f64>> {
    let Some(avg_doc_len) = index.avg_doc_len() else {
        return Ok(Vec::new());
    };
    let n = index.num_docs() as f64;
    let docs = index.documents();
    let mut scores = vec![0.0f64; docs.len()];

    for (term, fqt) in query_terms(query) {
        let Some(list) = index.postings().get(&term) else {
            continue;
        };
        if list.is_empty() {
            continue;
        }
        let wqt = query_weight(n, list.len() as f64, fqt as f64, params);
        for posting in list.iter() {
            let posting = posting?;
            let slot = (posting.doc_id as usize)
                .checked_sub(1)
                .filter(|&slot| slot < docs.len())
                .ok_or(Error::CorruptPostings("posting refers to an unknown document"))?;
            let wd = docs[slot].size as f64;
            scores[slot] += wqt * doc_weight(posting.freq as f64, wd, avg_doc_len, params);
        }
    }
    Ok(scores)
}

/// Rank the whole corpus against `query` and return at most `k` documents.
pub fn search<C: PostingsCodec>(index: &InvertedIndex<C>, query: &str, k: usize, params: &Bm25Params) -> Result<Vec<Hit>> {
    let scores = score_documents(index, query, params)?;
    let hits = index
        .documents()
        .iter()
        .zip(scores)
        .map(|(doc, score)| Hit { doc_id: doc.doc_id, name: doc.name.clone(), size: doc.size, score })
        .collect();
    Ok(select_top_k(hits, k))
}
