//! Bytepair-core - Core BPE data structures
//!
//! This crate provides the fundamental data structures for byte-level
//! byte-pair encoding: symbol ids with byte expansions, ordered merge rules,
//! a pair-frequency priority structure, and the vocabulary.
//!
//! # Features
//!
//! - Dense `u32` symbol ids: `0..256` are raw bytes, higher ids are merges
//! - Ordered merge rules with `AHashMap`-backed pair lookup
//! - Heap-backed pair-frequency maximum with a fixed, deterministic tie-break
//! - Error handling with detailed diagnostics
//!
//! # Example
//!
//! ```rust
//! use bytepair_core::{SymbolTable, Vocabulary};
//!
//! let mut symbols = SymbolTable::new();
//! let hi = symbols.new_symbol(104, 105);
//!
//! let vocab = Vocabulary::from_symbols(&symbols);
//! assert_eq!(vocab.expansion(hi), Some(&b"hi"[..]));
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

// Core BPE data structure modules
pub mod core;
pub use core::{
    MergeCandidate, MergeMap, MergeRule, MergeRules, Pair, PairPriorityQueue, SymbolTable,
    Vocabulary, BYTE_SYMBOLS,
};
