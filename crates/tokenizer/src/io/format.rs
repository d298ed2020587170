//! Format definitions for model serialization.
//!
//! The canonical artifact is deliberately small: a header plus the ordered
//! `(left, right)` rule list. The full vocabulary is reconstructed
//! deterministically from the 256 raw byte symbols and the rules, so
//! persisting the rules alone is sufficient.

use serde::{Deserialize, Serialize};

/// Serialized BPE model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedModel {
    /// Format version
    pub version: String,
    /// Final vocabulary size: 256 byte symbols plus one per merge
    pub vocab_size: usize,
    /// Merge rules as `(left, right)` pairs, in learned order
    pub merges: Vec<(u32, u32)>,
}

impl SerializedModel {
    /// Wrap an ordered rule list in the current format version.
    pub fn from_pairs(merges: Vec<(u32, u32)>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            vocab_size: 256 + merges.len(),
            merges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_roundtrip() {
        let model = SerializedModel::from_pairs(vec![(97, 98), (256, 99)]);

        let json = serde_json::to_string(&model).unwrap();
        let deserialized: SerializedModel = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.version, model.version);
        assert_eq!(deserialized.vocab_size, 258);
        assert_eq!(deserialized.merges, model.merges);
    }
}
