//! Core BPE data structures.
//!
//! This module contains the fundamental building blocks for byte-pair
//! encoding: symbol ids, merge rules, the pair-frequency priority structure,
//! and the vocabulary.

pub mod merges;
pub mod priority;
pub mod symbols;
pub mod vocab;

pub use merges::{MergeMap, MergeRule, MergeRules, Pair};
pub use priority::{MergeCandidate, PairPriorityQueue};
pub use symbols::{SymbolTable, BYTE_SYMBOLS};
pub use vocab::Vocabulary;
