pub mod config;
pub mod corpus;
pub mod delta;
pub mod engine;
pub mod error;
pub mod index;
pub mod postings;
pub mod scorer;
pub mod tokenizer;
pub mod topk;
pub mod varint;

pub use config::Bm25Params;
pub use corpus::{CorpusConfig, ScanSummary};
pub use engine::Engine;
pub use error::{Error, Result};
pub use index::{Document, IndexMode, IndexOutcome, IndexStats, InvertedIndex};
pub use postings::{Posting, PostingList, PostingsStore};
pub use topk::Hit;

/// 1-based sequence number assigned to a document the first time it is indexed.
pub type DocId = u32;
