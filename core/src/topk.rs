use crate::DocId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One ranked document for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: DocId,
    pub name: String,
    pub size: u32,
    pub score: f64,
}

fn rank(a: &Hit, b: &Hit) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.doc_id.cmp(&b.doc_id))
}

/// Order by score descending (ties by ascending doc id) and keep at most `k`.
pub fn select_top_k(mut hits: Vec<Hit>, k: usize) -> Vec<Hit> {
    hits.sort_by(rank);
    hits.truncate(k);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(doc_id: DocId, score: f64) -> Hit {
        Hit { doc_id, name: format!("d{doc_id}"), size: 1, score }
    }

    fn ids(hits: &[Hit]) -> Vec<DocId> {
        hits.iter().map(|h| h.doc_id).collect()
    }

    #[test]
    fn orders_by_descending_score() {
        let top = select_top_k(vec![hit(1, 0.5), hit(2, 2.0), hit(3, -1.0), hit(4, 1.0)], 3);
        assert_eq!(ids(&top), vec![2, 4, 1]);
    }

    #[test]
    fn ties_break_by_doc_id() {
        let top = select_top_k(vec![hit(3, 1.0), hit(1, 1.0), hit(2, 1.0)], 10);
        assert_eq!(ids(&top), vec![1, 2, 3]);
    }

    #[test]
    fn k_is_clamped_to_available_hits() {
        assert_eq!(select_top_k(vec![hit(1, 1.0), hit(2, 0.0)], 50).len(), 2);
        assert!(select_top_k(Vec::new(), 10).is_empty());
        assert!(select_top_k(vec![hit(1, 1.0)], 0).is_empty());
    }
}
