//! Merge rule management for BPE.
//!
//! Merge rules are stored twice: as an ordered list, because the order in
//! which merges were learned is the external contract for re-applying them,
//! and as a pair-keyed map for fast lookup during encoding.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A pair of adjacent symbol ids that can be merged.
pub type Pair = (u32, u32);

/// Merge rule lookup: pair -> (rank, new symbol id).
///
/// The rank is the position of the rule in learned order (lower rank =
/// learned earlier = applied first when encoding).
pub type MergeMap = AHashMap<Pair, (u32, u32)>;

/// A single learned merge: `pair` was replaced by `new_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    /// The pair of symbol ids that was merged
    pub pair: Pair,
    /// The symbol id created by the merge
    pub new_id: u32,
}

/// Ordered collection of BPE merge rules with pair-keyed lookup.
#[derive(Debug, Clone, Default)]
pub struct MergeRules {
    /// Rules in the exact order they were learned
    rules: Vec<MergeRule>,
    /// Lookup: pair -> (rank, new symbol id)
    by_pair: MergeMap,
}

impl MergeRules {
    /// Create an empty collection of merge rules.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            by_pair: MergeMap::new(),
        }
    }

    /// Create an empty collection with capacity for `capacity` rules.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
            by_pair: MergeMap::with_capacity(capacity),
        }
    }

    /// Record the next merge rule; its rank is the current rule count.
    pub fn push(&mut self, pair: Pair, new_id: u32) {
        let rank = self.rules.len() as u32;
        self.rules.push(MergeRule { pair, new_id });
        self.by_pair.insert(pair, (rank, new_id));
    }

    /// Look up the merge rule for a pair.
    ///
    /// Returns `Some((rank, new_id))` if this pair was learned as a merge,
    /// `None` otherwise.
    #[inline]
    pub fn get(&self, pair: Pair) -> Option<(u32, u32)> {
        self.by_pair.get(&pair).copied()
    }

    /// The rule at a given rank.
    #[inline]
    pub fn rule(&self, rank: u32) -> Option<&MergeRule> {
        self.rules.get(rank as usize)
    }

    /// Iterate rules in learned order.
    pub fn iter(&self) -> impl Iterator<Item = &MergeRule> + '_ {
        self.rules.iter()
    }

    /// The ordered `(left, right)` pairs, the canonical serialized form.
    pub fn pairs(&self) -> Vec<Pair> {
        self.rules.iter().map(|r| r.pair).collect()
    }

    /// Number of learned rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules have been learned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
