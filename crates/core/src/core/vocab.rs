//! Vocabulary storage and lookup.
//!
//! The vocabulary maps every symbol id to its byte expansion, with a reverse
//! map from byte sequence to id for exact-match lookups. Ids are dense, so
//! the forward direction is a plain vector.

use crate::core::symbols::SymbolTable;
use ahash::AHashMap;

/// Mapping from symbol id to byte expansion and back.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    /// Expansion per symbol id
    expansions: Vec<Vec<u8>>,
    /// Reverse lookup: byte sequence -> symbol id (first id wins)
    index: AHashMap<Vec<u8>, u32>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self {
            expansions: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Create the base vocabulary: the 256 single-byte expansions.
    pub fn base() -> Self {
        let mut vocab = Self::with_capacity(256);
        for b in 0..=u8::MAX {
            vocab.push_expansion(vec![b]);
        }
        vocab
    }

    /// Create an empty vocabulary with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            expansions: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
        }
    }

    /// Build the complete vocabulary from a symbol table.
    ///
    /// Every id from 0 to `symbols.len() - 1` gets its memoized expansion.
    pub fn from_symbols(symbols: &SymbolTable) -> Self {
        let mut vocab = Self::with_capacity(symbols.len());
        for expansion in symbols.expansions() {
            vocab.push_expansion(expansion);
        }
        vocab
    }

    /// Append the expansion for the next dense id and return that id.
    ///
    /// Two distinct merge trees can flatten to the same byte sequence; the
    /// reverse index keeps the first id seen.
    pub fn push_expansion(&mut self, bytes: Vec<u8>) -> u32 {
        let id = self.expansions.len() as u32;
        self.index.entry(bytes.clone()).or_insert(id);
        self.expansions.push(bytes);
        id
    }

    /// The byte expansion of a symbol id.
    #[inline]
    pub fn expansion(&self, id: u32) -> Option<&[u8]> {
        self.expansions.get(id as usize).map(Vec::as_slice)
    }

    /// Exact-match lookup of a byte sequence.
    #[inline]
    pub fn id_of(&self, bytes: &[u8]) -> Option<u32> {
        self.index.get(bytes).copied()
    }

    /// Iterate `(id, expansion)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u8])> + '_ {
        self.expansions
            .iter()
            .enumerate()
            .map(|(id, bytes)| (id as u32, bytes.as_slice()))
    }

    /// Number of symbols in the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    /// Whether the vocabulary has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }
}
