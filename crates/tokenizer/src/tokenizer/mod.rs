//! Main tokenizer implementation.
//!
//! This module provides the high-level `Tokenizer` struct that applies a
//! trained vocabulary and merge-rule list to new input. Encoding replays the
//! merge rules in the exact order they were learned, so a text that appeared
//! in the training corpus tokenizes the same way it did during training.

use crate::io::load::rebuild_model;
use crate::io::{ModelLoader, ModelSaver};
use bytepair_core::{
    MergeRules, Pair, Result, TokenizerError, Vocabulary, BYTE_SYMBOLS,
};
use bytepair_training::{BpeTrainer, StopReason, TrainingConfig};
use std::path::Path;

/// A trained BPE tokenizer: vocabulary plus ordered merge rules.
#[derive(Debug)]
pub struct Tokenizer {
    /// Vocabulary, id -> byte expansion
    vocab: Vocabulary,
    /// Merge rules in learned order
    merges: MergeRules,
}

impl Tokenizer {
    /// Create a tokenizer from a trained vocabulary and rule list.
    ///
    /// The two must describe the same model: ids dense from 256 in rule
    /// order, every rule built only from earlier symbols. Inconsistent
    /// inputs fail with `InvalidMerge`.
    pub fn new(vocab: Vocabulary, merges: MergeRules) -> Result<Self> {
        let expected_len = BYTE_SYMBOLS as usize + merges.len();
        if vocab.len() != expected_len {
            return Err(TokenizerError::InvalidMerge(format!(
                "vocabulary has {} entries, expected {} (256 byte symbols + {} merges)",
                vocab.len(),
                expected_len,
                merges.len()
            )));
        }

        for (rank, rule) in merges.iter().enumerate() {
            let expected_id = BYTE_SYMBOLS + rank as u32;
            if rule.new_id != expected_id {
                return Err(TokenizerError::InvalidMerge(format!(
                    "rule {rank} creates id {}, expected {expected_id}",
                    rule.new_id
                )));
            }
            if rule.pair.0 >= expected_id || rule.pair.1 >= expected_id {
                return Err(TokenizerError::InvalidMerge(format!(
                    "rule {rank} refers to a symbol not yet created: {:?}",
                    rule.pair
                )));
            }
        }

        Ok(Self { vocab, merges })
    }

    /// Train a tokenizer on raw bytes.
    ///
    /// Returns the tokenizer together with the reason training stopped;
    /// `StopReason::ExhaustedPairs` still yields a fully usable model.
    pub fn train(bytes: &[u8], config: TrainingConfig) -> Result<(Self, StopReason)> {
        let outcome = BpeTrainer::new(config).train(bytes)?;
        let tokenizer = Self::new(outcome.vocab, outcome.merges)?;
        Ok((tokenizer, outcome.stop))
    }

    /// Rebuild a tokenizer from an ordered `(left, right)` rule list alone.
    ///
    /// The vocabulary is derived deterministically from the 256 raw byte
    /// symbols plus the rules; this is the canonical deserialization path.
    pub fn from_pairs(pairs: &[Pair]) -> Result<Self> {
        let (vocab, merges) = rebuild_model(pairs)?;
        Self::new(vocab, merges)
    }

    /// Encode text to symbol ids.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        self.encode_bytes(text.as_bytes())
    }

    /// Encode raw bytes to symbol ids.
    ///
    /// Starts from the identity byte symbols and repeatedly applies the
    /// earliest-learned rule whose pair still occurs, merging its leftmost
    /// occurrences first, until no rule's pair appears.
    pub fn encode_bytes(&self, bytes: &[u8]) -> Result<Vec<u32>> {
        let mut ids: Vec<u32> = bytes.iter().map(|&b| u32::from(b)).collect();

        while ids.len() >= 2 {
            // The lowest-rank rule whose pair currently occurs.
            let mut best: Option<(u32, u32, Pair)> = None;
            for window in ids.windows(2) {
                let pair = (window[0], window[1]);
                if let Some((rank, new_id)) = self.merges.get(pair) {
                    if best.map_or(true, |(best_rank, _, _)| rank < best_rank) {
                        best = Some((rank, new_id, pair));
                    }
                }
            }
            let Some((_, new_id, pair)) = best else {
                break;
            };
            merge_occurrences(&mut ids, pair, new_id);
        }

        Ok(ids)
    }

    /// Decode symbol ids back to bytes.
    pub fn decode(&self, ids: &[u32]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(ids.len());
        for &id in ids {
            let expansion = self
                .vocab
                .expansion(id)
                .ok_or(TokenizerError::UnknownTokenId(id))?;
            out.extend_from_slice(expansion);
        }
        Ok(out)
    }

    /// Decode symbol ids to text, replacing invalid UTF-8 sequences.
    pub fn decode_lossy(&self, ids: &[u32]) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.decode(ids)?).into_owned())
    }

    /// The vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// A reference to the vocabulary.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// A reference to the merge rules.
    pub fn merges(&self) -> &MergeRules {
        &self.merges
    }

    /// Save the model to a directory as `model.json`.
    pub fn save(&self, path: &Path) -> Result<()> {
        ModelSaver::new(&self.merges).save(path)
    }

    /// Save the ordered rule list to a directory as `merges.txt`.
    pub fn save_merges_txt(&self, path: &Path) -> Result<()> {
        ModelSaver::new(&self.merges).save_merges_txt(path)
    }

    /// Load a model saved by [`Tokenizer::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let (vocab, merges) = ModelLoader::load(path)?;
        Self::new(vocab, merges)
    }

    /// Load a model from a `merges.txt` rule list.
    pub fn load_merges_txt(path: &Path) -> Result<Self> {
        let (vocab, merges) = ModelLoader::load_merges_txt(path)?;
        Self::new(vocab, merges)
    }
}

/// Merge every occurrence of `pair` in `ids`, leftmost first.
///
/// Scanning resumes after each merged position, so overlapping runs merge
/// pairwise instead of cascading into the fresh id.
fn merge_occurrences(ids: &mut Vec<u32>, pair: Pair, new_id: u32) {
    let mut i = 0;
    while i + 1 < ids.len() {
        if ids[i] == pair.0 && ids[i + 1] == pair.1 {
            ids[i] = new_id;
            ids.remove(i + 1);
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained(bytes: &[u8], target: usize) -> Tokenizer {
        let config = TrainingConfig {
            target_vocab_size: target,
            ..Default::default()
        };
        Tokenizer::train(bytes, config).unwrap().0
    }

    #[test]
    fn test_untrained_tokenizer_is_byte_identity() {
        let tokenizer = trained(b"", 256);

        let ids = tokenizer.encode("hi").unwrap();
        assert_eq!(ids, vec![104, 105]);
        assert_eq!(tokenizer.decode(&ids).unwrap(), b"hi");
    }

    #[test]
    fn test_encode_replays_training_merges() {
        let tokenizer = trained(b"aaaa", 258);

        assert_eq!(tokenizer.encode("aaaa").unwrap(), vec![257]);
        assert_eq!(tokenizer.encode("aaa").unwrap(), vec![256, 97]);
        assert_eq!(tokenizer.encode("aab").unwrap(), vec![256, 98]);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let corpus = b"the cat sat on the mat, the cat sat still";
        let tokenizer = trained(corpus, 280);

        for text in ["the cat", "on the mat", "entirely unseen text!", ""] {
            let ids = tokenizer.encode(text).unwrap();
            assert_eq!(tokenizer.decode(&ids).unwrap(), text.as_bytes());
        }
    }

    #[test]
    fn test_roundtrip_with_non_utf8_bytes() {
        let tokenizer = trained(&[0xff, 0xfe, 0xff, 0xfe], 258);

        let input = [0xff, 0xfe, 0x00, 0xff];
        let ids = tokenizer.encode_bytes(&input).unwrap();
        assert_eq!(tokenizer.decode(&ids).unwrap(), input);
    }

    #[test]
    fn test_decode_unknown_id_fails() {
        let tokenizer = trained(b"abab", 257);

        let err = tokenizer.decode(&[257]).unwrap_err();
        assert!(matches!(err, TokenizerError::UnknownTokenId(257)));
    }

    #[test]
    fn test_rules_apply_in_learned_order() {
        // Training on "ababab" learns (a,b) -> 256 first, then (256,256) -> 257.
        let tokenizer = trained(b"ababab", 258);

        // Rank 0 must be applied before rank 1 even though both pairs occur
        // once the first has been applied.
        assert_eq!(tokenizer.encode("abab").unwrap(), vec![257]);
        assert_eq!(tokenizer.encode("aba").unwrap(), vec![256, 97]);
    }

    #[test]
    fn test_from_pairs_rebuilds_model() {
        let tokenizer = Tokenizer::from_pairs(&[(97, 97), (256, 256)]).unwrap();

        assert_eq!(tokenizer.vocab_size(), 258);
        assert_eq!(tokenizer.vocab().expansion(257), Some(&b"aaaa"[..]));
        assert_eq!(tokenizer.encode("aaaa").unwrap(), vec![257]);
    }

    #[test]
    fn test_forward_referencing_rules_rejected() {
        let err = Tokenizer::from_pairs(&[(97, 300)]).unwrap_err();
        assert!(matches!(err, TokenizerError::InvalidMerge(_)));
    }

    #[test]
    fn test_inconsistent_vocab_rejected() {
        let mut merges = MergeRules::new();
        merges.push((97, 98), 256);

        // Base vocabulary without the merged entry.
        let err = Tokenizer::new(Vocabulary::base(), merges).unwrap_err();
        assert!(matches!(err, TokenizerError::InvalidMerge(_)));
    }

    #[test]
    fn test_merge_occurrences_is_leftmost_non_overlapping() {
        let mut ids = vec![97, 97, 97];
        merge_occurrences(&mut ids, (97, 97), 256);
        assert_eq!(ids, vec![256, 97]);

        let mut ids = vec![97, 97, 97, 97];
        merge_occurrences(&mut ids, (97, 97), 256);
        assert_eq!(ids, vec![256, 256]);
    }
}
