//! Bytepair-tokenizer - High-level tokenizer API
//!
//! This crate provides the user-facing interface for byte-level BPE
//! tokenization: training, encoding, decoding, and model persistence.
//!
//! # Features
//!
//! - Encoding that replays merge rules in their learned order
//! - Lossless decode back to bytes for arbitrary, even non-UTF-8, ids
//! - Compact canonical serialization: the ordered rule list alone
//! - Plain-text `merges.txt` interoperability format
//!
//! # Example
//!
//! ```rust
//! use bytepair_tokenizer::{Tokenizer, TrainingConfig};
//!
//! let config = TrainingConfig {
//!     target_vocab_size: 300,
//!     ..Default::default()
//! };
//! let (tokenizer, _stop) = Tokenizer::train(b"low lower lowest", config)?;
//!
//! let ids = tokenizer.encode("lower")?;
//! assert_eq!(tokenizer.decode(&ids)?, b"lower");
//! # Ok::<(), bytepair_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use bytepair_core::{MergeRules, Result, TokenizerError, Vocabulary};

// Re-export the training surface callers need to train through this crate
pub use bytepair_training::{CancelToken, StopReason, TrainingConfig};

// Tokenizer API
pub mod tokenizer;
pub use tokenizer::Tokenizer;

// IO/Serialization
pub mod io;
pub use io::{ModelLoader, ModelSaver, SerializedModel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
