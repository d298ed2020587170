//! Bytepair-training - BPE training engine
//!
//! This crate learns BPE merge rules from raw bytes. The input is held as an
//! arena-backed doubly-linked chain of symbol occurrences; a live
//! pair-frequency table is kept consistent with the chain incrementally, one
//! update per destroyed or created pair, so no merge ever rescans the whole
//! sequence.
//!
//! # Features
//!
//! - O(1) splice per merged occurrence, cache-friendly index-based traversal
//! - Heap-backed most-frequent-pair selection with a deterministic tie-break
//! - Parallel initial pair counting (the merge loop itself is sequential)
//! - Cooperative cancellation with valid partial results
//!
//! # Example
//!
//! ```rust
//! use bytepair_training::BpeTrainer;
//!
//! let outcome = BpeTrainer::with_target_vocab_size(260).train(b"abab abab")?;
//! assert_eq!(outcome.merges.len(), 4);
//! # Ok::<(), bytepair_training::TokenizerError>(())
//! ```

pub use bytepair_core::{Result, TokenizerError};

// Training infrastructure
pub mod training;
pub use training::{
    BpeTrainer, CancelToken, PairTable, StopReason, SymbolChain, TrainOutcome, TrainingConfig,
};
