//! Training infrastructure for BPE tokenizers.
//!
//! This module provides the mutable training sequence, the live
//! pair-frequency table, and the merge engine that learns merge rules
//! from raw bytes.

pub mod chain;
pub mod counter;
pub mod trainer;

pub use chain::SymbolChain;
pub use counter::PairTable;
pub use trainer::{BpeTrainer, CancelToken, StopReason, TrainOutcome, TrainingConfig};
