//! BPE trainer: the merge engine.
//!
//! The trainer owns the outer loop: pick the most frequent adjacent pair,
//! allocate a symbol for it, record the rule, and apply the merge across the
//! chain in a single left-to-right pass while updating the pair table
//! incrementally. The pass advances past each consumed pair, so a freshly
//! merged node is never re-matched against its own right neighbour within the
//! same pass; overlapping runs like `aaaa` therefore merge at independent
//! positions.

use crate::training::chain::SymbolChain;
use crate::training::counter::PairTable;
use bytepair_core::{
    MergeRules, Pair, Result, SymbolTable, TokenizerError, Vocabulary, BYTE_SYMBOLS,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration for BPE training.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Target vocabulary size, raw byte symbols included
    pub target_vocab_size: usize,
    /// Minimum frequency for a pair to be merged
    pub min_frequency: u64,
    /// Whether initial pair counting may use parallel processing
    pub parallel: bool,
    /// Treat an empty input as a configuration mistake instead of a
    /// well-defined degenerate run
    pub reject_empty_input: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            target_vocab_size: 30_000,
            min_frequency: 1,
            parallel: true,
            reject_empty_input: false,
        }
    }
}

/// Shared flag for cooperative cancellation of a training run.
///
/// Checked once before each outer iteration; a cancelled run returns the
/// merges accepted so far as a valid partial result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a training run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The vocabulary reached the target size
    TargetReached,
    /// No adjacent pair remained; the sequence collapsed
    ExhaustedPairs,
    /// The best remaining pair fell below the configured minimum frequency
    BelowMinFrequency,
    /// The caller cancelled the run
    Cancelled,
}

/// Result of a training run.
///
/// Always usable: a run that stopped early carries fewer merges than
/// requested but a consistent vocabulary and rule list.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    /// The trained vocabulary, id -> byte expansion
    pub vocab: Vocabulary,
    /// Merge rules in learned order
    pub merges: MergeRules,
    /// Why the run stopped
    pub stop: StopReason,
}

/// BPE trainer.
///
/// Learns merge rules from raw bytes by iteratively merging the most
/// frequent adjacent symbol pair until the target vocabulary size is
/// reached or no mergeable pair remains.
#[derive(Debug, Clone)]
pub struct BpeTrainer {
    config: TrainingConfig,
}

impl BpeTrainer {
    /// Create a new BPE trainer with the given configuration.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Create a new BPE trainer with default configuration.
    pub fn with_target_vocab_size(target_vocab_size: usize) -> Self {
        Self::new(TrainingConfig {
            target_vocab_size,
            ..Default::default()
        })
    }

    /// The trainer's configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train on the given bytes.
    pub fn train(&self, bytes: &[u8]) -> Result<TrainOutcome> {
        self.train_cancellable(bytes, &CancelToken::new())
    }

    /// Train on the given bytes, checking `cancel` before each merge.
    pub fn train_cancellable(&self, bytes: &[u8], cancel: &CancelToken) -> Result<TrainOutcome> {
        self.validate(bytes)?;

        let target = self.config.target_vocab_size;
        let mut symbols = SymbolTable::with_capacity(target - BYTE_SYMBOLS as usize);
        let mut merges = MergeRules::with_capacity(target - BYTE_SYMBOLS as usize);
        let mut chain = SymbolChain::from_bytes(bytes);
        let mut pairs = PairTable::from_bytes(bytes, self.config.parallel);

        let stop = loop {
            if symbols.len() >= target {
                break StopReason::TargetReached;
            }
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            let Some(candidate) = pairs.argmax() else {
                break StopReason::ExhaustedPairs;
            };
            if candidate.count < self.config.min_frequency {
                break StopReason::BelowMinFrequency;
            }

            let new_symbol = symbols.new_symbol(candidate.pair.0, candidate.pair.1);
            merges.push(candidate.pair, new_symbol);
            apply_merge(&mut chain, &mut pairs, candidate.pair, new_symbol);
        };

        Ok(TrainOutcome {
            vocab: Vocabulary::from_symbols(&symbols),
            merges,
            stop,
        })
    }

    /// Reject bad configurations before any structure is built.
    fn validate(&self, bytes: &[u8]) -> Result<()> {
        let target = self.config.target_vocab_size;
        if target < BYTE_SYMBOLS as usize {
            return Err(TokenizerError::InvalidConfig(format!(
                "target vocabulary size {target} is below the {BYTE_SYMBOLS} byte symbols"
            )));
        }
        if target > u32::MAX as usize {
            return Err(TokenizerError::InvalidConfig(format!(
                "target vocabulary size {target} does not fit 32-bit symbol ids"
            )));
        }
        if bytes.len() >= u32::MAX as usize {
            return Err(TokenizerError::InvalidConfig(format!(
                "input of {} bytes exceeds the 32-bit node index range",
                bytes.len()
            )));
        }
        if bytes.is_empty() && self.config.reject_empty_input {
            return Err(TokenizerError::EmptyInput);
        }
        Ok(())
    }
}

/// Apply one merge across the whole chain, keeping the pair table live.
///
/// For each occurrence, the consumed pair and the two neighbour pairs are
/// decremented before the splice and the two new neighbour pairs incremented
/// after it. The cursor then jumps past the consumed pair.
fn apply_merge(chain: &mut SymbolChain, pairs: &mut PairTable, pair: Pair, new_symbol: u32) {
    let mut cursor = chain.head();
    while let Some(node) = cursor {
        let Some(right) = chain.next(node) else {
            break;
        };
        if (chain.symbol(node), chain.symbol(right)) != pair {
            cursor = Some(right);
            continue;
        }

        let before = chain.prev(node);
        let after = chain.next(right);

        pairs.decrement(pair);
        if let Some(p) = before {
            pairs.decrement((chain.symbol(p), chain.symbol(node)));
        }
        if let Some(q) = after {
            pairs.decrement((chain.symbol(right), chain.symbol(q)));
        }

        chain.merge_at(node, right, new_symbol);

        if let Some(p) = before {
            pairs.increment((chain.symbol(p), new_symbol));
        }
        if let Some(q) = after {
            pairs.increment((new_symbol, chain.symbol(q)));
        }

        cursor = after;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train(bytes: &[u8], target: usize) -> TrainOutcome {
        BpeTrainer::with_target_vocab_size(target)
            .train(bytes)
            .unwrap()
    }

    #[test]
    fn test_target_256_yields_identity_vocabulary() {
        let outcome = train(b"hello world", 256);

        assert_eq!(outcome.stop, StopReason::TargetReached);
        assert!(outcome.merges.is_empty());
        assert_eq!(outcome.vocab.len(), 256);
        for b in 0..=u8::MAX {
            assert_eq!(outcome.vocab.expansion(u32::from(b)), Some(&[b][..]));
        }
    }

    #[test]
    fn test_target_below_256_is_invalid() {
        let err = BpeTrainer::with_target_vocab_size(100)
            .train(b"abc")
            .unwrap_err();
        assert!(matches!(err, TokenizerError::InvalidConfig(_)));
    }

    #[test]
    fn test_single_merge_picks_most_frequent_pair() {
        // (h,e) x1, (e,l) x1, (l,l) x2, (l,o) x1, ...
        let outcome = train(b"llhello", 257);

        assert_eq!(outcome.merges.len(), 1);
        let rule = outcome.merges.rule(0).unwrap();
        assert_eq!(rule.pair, (108, 108));
        assert_eq!(rule.new_id, 256);
        assert_eq!(outcome.vocab.expansion(256), Some(&b"ll"[..]));
    }

    #[test]
    fn test_frequency_ties_break_toward_smallest_pair() {
        // Every adjacent pair occurs once; (97, 98) is numerically smallest.
        let outcome = train(b"cbab", 257);

        assert_eq!(outcome.merges.rule(0).unwrap().pair, (97, 98));
    }

    #[test]
    fn test_overlapping_run_merges_pairwise() {
        let outcome = train(b"aaaa", 258);

        assert_eq!(outcome.stop, StopReason::TargetReached);
        assert_eq!(outcome.merges.len(), 2);
        assert_eq!(outcome.merges.rule(0).unwrap().pair, (97, 97));
        assert_eq!(outcome.merges.rule(0).unwrap().new_id, 256);
        assert_eq!(outcome.merges.rule(1).unwrap().pair, (256, 256));
        assert_eq!(outcome.merges.rule(1).unwrap().new_id, 257);
        assert_eq!(outcome.vocab.len(), 258);
        assert_eq!(outcome.vocab.expansion(257), Some(&b"aaaa"[..]));
    }

    #[test]
    fn test_exhausted_pairs_reported_not_failed() {
        // 8 identical bytes collapse after 3 doubling merges.
        let outcome = train(&[b'b'; 8], 1000);

        assert_eq!(outcome.stop, StopReason::ExhaustedPairs);
        assert_eq!(outcome.merges.len(), 3);
        assert_eq!(outcome.vocab.len(), 259);
        assert_eq!(outcome.vocab.expansion(258), Some(&[b'b'; 8][..]));
    }

    #[test]
    fn test_empty_input_returns_base_vocabulary() {
        let outcome = train(b"", 300);

        assert_eq!(outcome.stop, StopReason::ExhaustedPairs);
        assert!(outcome.merges.is_empty());
        assert_eq!(outcome.vocab.len(), 256);
    }

    #[test]
    fn test_empty_input_rejected_on_request() {
        let trainer = BpeTrainer::new(TrainingConfig {
            target_vocab_size: 300,
            reject_empty_input: true,
            ..Default::default()
        });

        let err = trainer.train(b"").unwrap_err();
        assert!(matches!(err, TokenizerError::EmptyInput));
    }

    #[test]
    fn test_min_frequency_stops_early() {
        let trainer = BpeTrainer::new(TrainingConfig {
            target_vocab_size: 300,
            min_frequency: 2,
            ..Default::default()
        });

        // Every pair occurs exactly once.
        let outcome = trainer.train(b"abcdef").unwrap();
        assert_eq!(outcome.stop, StopReason::BelowMinFrequency);
        assert!(outcome.merges.is_empty());
    }

    #[test]
    fn test_cancellation_returns_partial_result() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = BpeTrainer::with_target_vocab_size(300)
            .train_cancellable(b"ababab", &cancel)
            .unwrap();

        assert_eq!(outcome.stop, StopReason::Cancelled);
        assert!(outcome.merges.is_empty());
        assert_eq!(outcome.vocab.len(), 256);
    }

    #[test]
    fn test_training_is_deterministic() {
        let bytes = b"the quick brown fox jumps over the lazy dog the end";

        let first = train(bytes, 270);
        let second = train(bytes, 270);

        let first_pairs = first.merges.pairs();
        let second_pairs = second.merges.pairs();
        assert_eq!(first_pairs, second_pairs);
        assert_eq!(first.vocab.len(), second.vocab.len());
    }

    #[test]
    fn test_parallel_and_sequential_counting_agree() {
        let bytes: Vec<u8> = (0..200_000u32).map(|i| (i % 11) as u8 + b'a').collect();

        let sequential = BpeTrainer::new(TrainingConfig {
            target_vocab_size: 280,
            parallel: false,
            ..Default::default()
        })
        .train(&bytes)
        .unwrap();
        let parallel = BpeTrainer::new(TrainingConfig {
            target_vocab_size: 280,
            parallel: true,
            ..Default::default()
        })
        .train(&bytes)
        .unwrap();

        assert_eq!(sequential.merges.pairs(), parallel.merges.pairs());
    }

    // Deterministic xorshift generator so the property test needs no
    // external crate.
    fn xorshift_bytes(seed: u64, len: usize, alphabet: u8) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state % u64::from(alphabet)) as u8
            })
            .collect()
    }

    #[test]
    fn test_incremental_counts_match_rescan_after_every_merge() {
        for seed in [3, 17, 2026] {
            let bytes = xorshift_bytes(seed, 4_000, 5);
            let mut symbols = SymbolTable::new();
            let mut chain = SymbolChain::from_bytes(&bytes);
            let mut pairs = PairTable::from_bytes(&bytes, false);

            for _ in 0..40 {
                let Some(candidate) = pairs.argmax() else {
                    break;
                };
                let new_symbol = symbols.new_symbol(candidate.pair.0, candidate.pair.1);
                apply_merge(&mut chain, &mut pairs, candidate.pair, new_symbol);

                let rescan = PairTable::from_chain(&chain);
                assert_eq!(pairs.counts(), rescan.counts(), "seed {seed} diverged");
                assert_eq!(pairs.count(candidate.pair), 0);
            }
        }
    }

    #[test]
    fn test_merged_sequence_expands_back_to_input() {
        let bytes = b"abracadabra abracadabra";
        let mut symbols = SymbolTable::new();
        let mut chain = SymbolChain::from_bytes(bytes);
        let mut pairs = PairTable::from_bytes(bytes, false);

        for _ in 0..10 {
            let Some(candidate) = pairs.argmax() else {
                break;
            };
            let new_symbol = symbols.new_symbol(candidate.pair.0, candidate.pair.1);
            apply_merge(&mut chain, &mut pairs, candidate.pair, new_symbol);
        }

        let expanded: Vec<u8> = chain
            .symbols()
            .into_iter()
            .flat_map(|s| symbols.expand(s))
            .collect();
        assert_eq!(expanded, bytes);
    }
}
