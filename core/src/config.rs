//! BM25 tuning constants.
//!
//! The defaults reproduce the reference ranking exactly; override them through
//! [`Bm25Params`] when constructing an [`Engine`](crate::Engine).

use serde::{Deserialize, Serialize};

/// Term frequency saturation.
pub const BM25_K1: f64 = 1.2;

/// Document length normalization. 0.0 disables it, 1.0 normalizes fully.
pub const BM25_B: f64 = 0.75;

/// Query term frequency saturation. Large enough that repeated query terms
/// scale almost linearly.
pub const BM25_K3: f64 = 100_000.0;

/// Default number of results returned by the front ends.
pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
    pub k3: f64,
    /// Use `ln(1 + (N - ft + 0.5) / (ft + 0.5))` instead of the classic
    /// `ln((N - ft + 0.5) / (ft + 0.5))`, which goes negative once a term
    /// appears in more than half of the corpus.
    pub smoothed_idf: bool,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: BM25_K1, b: BM25_B, k3: BM25_K3, smoothed_idf: false }
    }
}

impl Bm25Params {
    pub fn smoothed() -> Self {
        Self { smoothed_idf: true, ..Self::default() }
    }
}
