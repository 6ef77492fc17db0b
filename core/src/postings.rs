//! Compressed postings lists.
//!
//! A list keeps its entries as `(doc id gap, frequency)` pairs in the byte form
//! chosen by its [`PostingsCodec`]. Entries are appended in ascending doc id
//! order and decoded lazily when scanned.

use crate::delta;
use crate::error::Result;
use crate::varint;
use crate::DocId;
use std::collections::HashMap;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    /// Occurrences of the term in the document.
    pub freq: u32,
}

/// Byte layout of a single postings entry.
pub trait PostingsCodec {
    fn write(buf: &mut Vec<u8>, gap: DocId, freq: u32);

    /// Returns `(gap, freq, bytes consumed)`.
    fn read(buf: &[u8]) -> Result<(DocId, u32, usize)>;
}

/// Variable-byte gap followed by variable-byte frequency.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeltaVByte;

impl PostingsCodec for DeltaVByte {
    fn write(buf: &mut Vec<u8>, gap: DocId, freq: u32) {
        varint::encode_u64(gap as u64, buf);
        varint::encode_u64(freq as u64, buf);
    }

    fn read(buf: &[u8]) -> Result<(DocId, u32, usize)> {
        let (gap, a) = varint::decode_u32(buf)?;
        let (freq, b) = varint::decode_u32(&buf[a..])?;
        Ok((gap, freq, a + b))
    }
}

#[derive(Debug, Clone)]
pub struct PostingList<C = DeltaVByte> {
    bytes: Vec<u8>,
    len: u32,
    last_doc_id: Option<DocId>,
    codec: PhantomData<C>,
}

impl<C> Default for PostingList<C> {
    fn default() -> Self {
        Self { bytes: Vec::new(), len: 0, last_doc_id: None, codec: PhantomData }
    }
}

impl PostingList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: PostingsCodec> PostingList<C> {
    /// Build a list from postings already sorted by doc id.
    pub fn from_postings(postings: &[Posting]) -> Result<Self> {
        let ids: Vec<DocId> = postings.iter().map(|p| p.doc_id).collect();
        let gaps = delta::encode(&ids)?;
        let mut list = Self::default();
        for (gap, p) in gaps.into_iter().zip(postings) {
            C::write(&mut list.bytes, gap, p.freq);
        }
        list.len = postings.len() as u32;
        list.last_doc_id = ids.last().copied();
        Ok(list)
    }

    pub fn append(&mut self, posting: Posting) -> Result<()> {
        let gap = delta::gap(self.last_doc_id, posting.doc_id)?;
        C::write(&mut self.bytes, gap, posting.freq);
        self.last_doc_id = Some(posting.doc_id);
        self.len += 1;
        Ok(())
    }

    /// Number of documents containing the term.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn last_doc_id(&self) -> Option<DocId> {
        self.last_doc_id
    }

    pub fn encoded_len(&self) -> usize {
        self.bytes.len()
    }

    #[cfg(test)]
    pub(crate) fn truncate_bytes(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    pub fn iter(&self) -> PostingIter<'_, C> {
        PostingIter { buf: &self.bytes, remaining: self.len, prev: None, codec: PhantomData }
    }

    /// Decode every doc id, in order.
    pub fn doc_ids(&self) -> Result<Vec<DocId>> {
        let mut gaps = Vec::with_capacity(self.len());
        let mut buf = self.bytes.as_slice();
        for _ in 0..self.len {
            let (gap, _, used) = C::read(buf)?;
            gaps.push(gap);
            buf = &buf[used..];
        }
        delta::decode(&gaps)
    }
}

/// Lazily decoding cursor over a [`PostingList`]. Stops after the first error.
pub struct PostingIter<'a, C> {
    buf: &'a [u8],
    remaining: u32,
    prev: Option<DocId>,
    codec: PhantomData<C>,
}

impl<C: PostingsCodec> Iterator for PostingIter<'_, C> {
    type Item = Result<Posting>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let decoded = C::read(self.buf).and_then(|(gap, freq, used)| {
            let doc_id = delta::undo(self.prev, gap)?;
            Ok((Posting { doc_id, freq }, used))
        });
        match decoded {
            Ok((posting, used)) => {
                self.buf = &self.buf[used..];
                self.prev = Some(posting.doc_id);
                self.remaining -= 1;
                Some(Ok(posting))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

/// Term dictionary: normalized term to its compressed postings.
#[derive(Debug)]
pub struct PostingsStore<C = DeltaVByte> {
    terms: HashMap<String, PostingList<C>>,
}

impl<C> Default for PostingsStore<C> {
    fn default() -> Self {
        Self { terms: HashMap::new() }
    }
}

impl PostingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: PostingsCodec> PostingsStore<C> {
    pub fn append(&mut self, term: &str, posting: Posting) -> Result<()> {
        match self.terms.get_mut(term) {
            Some(list) => list.append(posting),
            None => {
                let mut list = PostingList::<C>::default();
                list.append(posting)?;
                self.terms.insert(term.to_owned(), list);
                Ok(())
            }
        }
    }

    pub fn get(&self, term: &str) -> Option<&PostingList<C>> {
        self.terms.get(term)
    }

    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, term: &str) -> Option<&mut PostingList<C>> {
        self.terms.get_mut(term)
    }

    /// Document frequency of `term`; 0 when it was never indexed.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.get(term).map_or(0, PostingList::len)
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn encoded_bytes(&self) -> usize {
        self.terms.values().map(PostingList::encoded_len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn p(doc_id: DocId, freq: u32) -> Posting {
        Posting { doc_id, freq }
    }

    #[test]
    fn append_then_scan() {
        let mut list: PostingList = PostingList::new();
        for posting in [p(1, 3), p(2, 1), p(200, 7), p(70_000, 1)] {
            list.append(posting).unwrap();
        }
        assert_eq!(list.len(), 4);
        assert_eq!(list.last_doc_id(), Some(70_000));
        let scanned: Vec<_> = list.iter().collect::<Result<_>>().unwrap();
        assert_eq!(scanned, vec![p(1, 3), p(2, 1), p(200, 7), p(70_000, 1)]);
        assert_eq!(list.doc_ids().unwrap(), vec![1, 2, 200, 70_000]);
    }

    #[test]
    fn consecutive_ids_take_one_byte_per_field() {
        let mut list: PostingList = PostingList::new();
        for doc in 1..=100 {
            list.append(p(doc, 2)).unwrap();
        }
        assert_eq!(list.encoded_len(), 200);
    }

    #[test]
    fn rejects_out_of_order_and_duplicate_docs() {
        let mut list: PostingList = PostingList::new();
        list.append(p(5, 1)).unwrap();
        assert!(matches!(list.append(p(5, 1)), Err(Error::UnorderedPostings { .. })));
        assert!(list.append(p(4, 1)).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn bulk_build_matches_appends() {
        let postings = [p(2, 1), p(9, 4), p(10, 1)];
        let bulk: PostingList = PostingList::from_postings(&postings).unwrap();
        let mut incremental: PostingList = PostingList::new();
        for posting in postings {
            incremental.append(posting).unwrap();
        }
        assert_eq!(bulk.bytes, incremental.bytes);
        assert!(PostingList::<DeltaVByte>::from_postings(&[p(3, 1), p(1, 1)]).is_err());
    }

    #[test]
    fn truncated_bytes_surface_as_corrupt() {
        let mut list: PostingList = PostingList::new();
        list.append(p(1, 1)).unwrap();
        list.append(p(300, 1)).unwrap();
        list.truncate_bytes(list.encoded_len() - 2);
        let decoded: Vec<_> = list.iter().collect();
        assert_eq!(decoded.len(), 2);
        assert!(decoded[0].is_ok());
        assert!(decoded[1].as_ref().unwrap_err().is_corrupt());
    }

    #[test]
    fn store_groups_by_term() {
        let mut store: PostingsStore = PostingsStore::new();
        store.append("dog", p(1, 1)).unwrap();
        store.append("dog", p(2, 3)).unwrap();
        store.append("ran", p(1, 1)).unwrap();
        assert_eq!(store.term_count(), 2);
        assert_eq!(store.doc_freq("dog"), 2);
        assert_eq!(store.doc_freq("cat"), 0);
        assert!(store.get("cat").is_none());
        assert_eq!(store.encoded_bytes(), 6);
    }
}
