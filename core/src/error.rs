use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The content stream of a document could not be read to the end.
    #[error("failed to read document `{name}`: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A variable-byte or delta stream is truncated or otherwise malformed.
    #[error("corrupt postings: {0}")]
    CorruptPostings(&'static str),

    #[error("postings out of order: doc {doc_id} appended after doc {last_doc_id}")]
    UnorderedPostings { last_doc_id: u32, doc_id: u32 },
}

impl Error {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::CorruptPostings(_))
    }
}
