//! Live pair-frequency table for BPE training.
//!
//! Tracks the count of every adjacent symbol pair currently present in the
//! training sequence. The table is populated once from the raw input (in
//! parallel if requested) and then kept consistent incrementally by the merge
//! engine: one decrement per pair destroyed, one increment per pair created.
//! At every point the table equals what a full rescan of the chain would
//! produce.

use crate::training::chain::SymbolChain;
use ahash::AHashMap;
use bytepair_core::{MergeCandidate, Pair, PairPriorityQueue};
use rayon::prelude::*;

/// Chunk size for parallel initial counting.
const COUNT_CHUNK: usize = 64 * 1024;

/// Live count of every adjacent symbol pair in the training sequence.
#[derive(Debug, Default)]
pub struct PairTable {
    queue: PairPriorityQueue,
}

impl PairTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            queue: PairPriorityQueue::new(),
        }
    }

    /// Count the adjacent byte pairs of the raw input.
    ///
    /// Initial counting is embarrassingly parallel: the input is split into
    /// chunks, counted locally, and the sub-tables merged. Only this initial
    /// scan may run in parallel; incremental updates during merging are
    /// inherently sequential.
    pub fn from_bytes(bytes: &[u8], parallel: bool) -> Self {
        let counts = if parallel {
            count_byte_pairs_parallel(bytes)
        } else {
            count_byte_pairs_sequential(bytes)
        };

        let mut queue = PairPriorityQueue::with_capacity(counts.len());
        for (pair, count) in counts {
            queue.set_count(pair, count);
        }
        Self { queue }
    }

    /// Rebuild the table by rescanning a live chain.
    ///
    /// This is the reference answer the incremental table must match; the
    /// invariant tests compare against it after every merge.
    pub fn from_chain(chain: &SymbolChain) -> Self {
        let mut counts: AHashMap<Pair, u64> = AHashMap::new();
        for node in chain.iter_nodes() {
            if let Some(next) = chain.next(node) {
                let pair = (chain.symbol(node), chain.symbol(next));
                *counts.entry(pair).or_insert(0) += 1;
            }
        }

        let mut queue = PairPriorityQueue::with_capacity(counts.len());
        for (pair, count) in counts {
            queue.set_count(pair, count);
        }
        Self { queue }
    }

    /// Record one new occurrence of `pair`.
    pub fn increment(&mut self, pair: Pair) {
        let count = self.queue.count(pair);
        self.queue.set_count(pair, count + 1);
    }

    /// Record the removal of one occurrence of `pair`.
    ///
    /// The entry disappears when its count reaches zero. Decrementing a pair
    /// the table does not hold would mean the table and the chain have
    /// diverged, which the incremental update discipline rules out.
    pub fn decrement(&mut self, pair: Pair) {
        let count = self.queue.count(pair);
        debug_assert!(count > 0, "decrement of untracked pair {pair:?}");
        self.queue.set_count(pair, count.saturating_sub(1));
    }

    /// The most frequent pair, ties broken toward the numerically smallest
    /// `(left, right)`. `None` once no adjacent pair remains.
    pub fn argmax(&mut self) -> Option<MergeCandidate> {
        self.queue.argmax()
    }

    /// The live count for a pair, zero if absent.
    pub fn count(&self, pair: Pair) -> u64 {
        self.queue.count(pair)
    }

    /// The live count table.
    pub fn counts(&self) -> &AHashMap<Pair, u64> {
        self.queue.counts()
    }

    /// Number of distinct pairs currently present.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no pair remains.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

fn count_byte_pairs_sequential(bytes: &[u8]) -> AHashMap<Pair, u64> {
    let mut counts: AHashMap<Pair, u64> = AHashMap::new();
    for window in bytes.windows(2) {
        let pair = (u32::from(window[0]), u32::from(window[1]));
        *counts.entry(pair).or_insert(0) += 1;
    }
    counts
}

fn count_byte_pairs_parallel(bytes: &[u8]) -> AHashMap<Pair, u64> {
    if bytes.len() < 2 {
        return AHashMap::new();
    }

    bytes
        .par_chunks(COUNT_CHUNK)
        .enumerate()
        .map(|(chunk_index, chunk)| {
            let mut counts: AHashMap<Pair, u64> = AHashMap::new();
            for window in chunk.windows(2) {
                let pair = (u32::from(window[0]), u32::from(window[1]));
                *counts.entry(pair).or_insert(0) += 1;
            }

            // The pair straddling this chunk and the next one.
            let boundary = (chunk_index + 1) * COUNT_CHUNK;
            if boundary < bytes.len() {
                let pair = (u32::from(chunk[chunk.len() - 1]), u32::from(bytes[boundary]));
                *counts.entry(pair).or_insert(0) += 1;
            }

            counts
        })
        .reduce(AHashMap::new, |mut acc, sub| {
            for (pair, count) in sub {
                *acc.entry(pair).or_insert(0) += count;
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_counts_adjacent_pairs() {
        let table = PairTable::from_bytes(b"abab", false);

        assert_eq!(table.count((97, 98)), 2);
        assert_eq!(table.count((98, 97)), 1);
        assert_eq!(table.count((98, 98)), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_parallel_counting_matches_sequential() {
        // Long enough to span several chunks.
        let bytes: Vec<u8> = (0..300_000u32).map(|i| (i % 7) as u8).collect();

        let sequential = count_byte_pairs_sequential(&bytes);
        let parallel = count_byte_pairs_parallel(&bytes);

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut table = PairTable::from_bytes(b"ab", false);
        assert_eq!(table.count((97, 98)), 1);

        table.increment((97, 98));
        assert_eq!(table.count((97, 98)), 2);

        table.decrement((97, 98));
        table.decrement((97, 98));
        assert_eq!(table.count((97, 98)), 0);
        assert!(table.is_empty());
        assert!(table.argmax().is_none());
    }

    #[test]
    fn test_argmax_prefers_highest_then_smallest() {
        let mut table = PairTable::from_bytes(b"ababcdcd", false);
        // (97,98) x2, (98,97) x1, (98,99) x1, (99,100) x2, (100,99) x1

        let best = table.argmax().unwrap();
        assert_eq!(best.pair, (97, 98));
        assert_eq!(best.count, 2);
    }

    #[test]
    fn test_from_chain_matches_from_bytes() {
        let bytes = b"the theme thesis";
        let chain = SymbolChain::from_bytes(bytes);

        let from_chain = PairTable::from_chain(&chain);
        let from_bytes = PairTable::from_bytes(bytes, false);

        assert_eq!(from_chain.counts(), from_bytes.counts());
    }

    #[test]
    fn test_single_byte_input_has_no_pairs() {
        let table = PairTable::from_bytes(b"x", true);
        assert!(table.is_empty());
    }
}
