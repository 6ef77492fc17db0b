//! Gap encoding of strictly increasing document id sequences.

use crate::error::{Error, Result};
use crate::DocId;

/// Gap from `prev` to `id`. The first id of a sequence (`prev == None`) is its
/// own gap.
pub fn gap(prev: Option<DocId>, id: DocId) -> Result<DocId> {
    match prev {
        Some(last) if id <= last => Err(Error::UnorderedPostings { last_doc_id: last, doc_id: id }),
        Some(last) => Ok(id - last),
        None => Ok(id),
    }
}

/// Inverse of [`gap`]: the id reached by stepping `gap` past `prev`.
pub fn undo(prev: Option<DocId>, gap: DocId) -> Result<DocId> {
    match prev {
        None => Ok(gap),
        Some(_) if gap == 0 => Err(Error::CorruptPostings("repeated doc id")),
        Some(last) => last
            .checked_add(gap)
            .ok_or(Error::CorruptPostings("doc id gap overflows")),
    }
}

/// Replace every id by its distance from the previous one (0 before the first).
pub fn encode(ids: &[DocId]) -> Result<Vec<DocId>> {
    let mut gaps = Vec::with_capacity(ids.len());
    let mut prev = None;
    for &id in ids {
        gaps.push(gap(prev, id)?);
        prev = Some(id);
    }
    Ok(gaps)
}

/// Inverse of [`encode`]: running sum of the gaps.
pub fn decode(gaps: &[DocId]) -> Result<Vec<DocId>> {
    let mut ids = Vec::with_capacity(gaps.len());
    let mut prev = None;
    for &g in gaps {
        let id = undo(prev, g)?;
        ids.push(id);
        prev = Some(id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaps_of_consecutive_ids_are_one() {
        assert_eq!(encode(&[1, 2, 3, 4]).unwrap(), vec![1, 1, 1, 1]);
        assert_eq!(encode(&[3, 10, 250]).unwrap(), vec![3, 7, 240]);
        assert!(encode(&[]).unwrap().is_empty());
    }

    #[test]
    fn decode_reverses_encode() {
        let seqs: [&[DocId]; 4] = [&[1], &[1, 2, 3], &[5, 6, 1000, 1001, 70_000], &[0, DocId::MAX]];
        for seq in seqs {
            assert_eq!(decode(&encode(seq).unwrap()).unwrap(), seq);
        }
    }

    #[test]
    fn rejects_non_increasing_input() {
        assert!(matches!(
            encode(&[1, 3, 3]),
            Err(Error::UnorderedPostings { last_doc_id: 3, doc_id: 3 })
        ));
        assert!(encode(&[5, 4]).is_err());
    }

    #[test]
    fn overflowing_gaps_are_corrupt() {
        assert!(decode(&[DocId::MAX, 1]).unwrap_err().is_corrupt());
    }

    #[test]
    fn zero_gap_after_first_is_corrupt() {
        assert_eq!(decode(&[0, 4]).unwrap(), vec![0, 4]);
        assert!(decode(&[3, 0]).unwrap_err().is_corrupt());
    }

    #[test]
    fn single_steps_match_bulk_encoding() {
        assert_eq!(gap(None, 7).unwrap(), 7);
        assert_eq!(gap(Some(7), 9).unwrap(), 2);
        assert!(gap(Some(9), 9).is_err());
        assert_eq!(undo(None, 7).unwrap(), 7);
        assert_eq!(undo(Some(7), 2).unwrap(), 9);
    }
}
