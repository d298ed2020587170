//! Arena-backed symbol chain: the mutable training sequence.
//!
//! The input is represented as a doubly-linked chain of symbol occurrences,
//! one node per input byte to begin with. Nodes live in a flat preallocated
//! arena and link to each other by `u32` index, so traversal is
//! cache-friendly and there are no reference cycles to manage. Merging two
//! adjacent nodes is O(1): the left node takes the merged symbol and the
//! right node is unlinked. Unlinked slots stay in the arena but are
//! unreachable from the head, so a traversal never revisits them.

/// One occurrence of a symbol in the training sequence.
#[derive(Debug, Clone, Copy)]
struct ChainNode {
    /// Current symbol id at this position
    symbol: u32,
    /// Arena index of the previous live node
    prev: Option<u32>,
    /// Arena index of the next live node
    next: Option<u32>,
}

/// Doubly-linked chain of symbol occurrences in a flat arena.
#[derive(Debug, Clone)]
pub struct SymbolChain {
    nodes: Vec<ChainNode>,
    head: Option<u32>,
    live: usize,
}

impl SymbolChain {
    /// Build the chain from raw input bytes in O(n), one node per byte.
    ///
    /// Inputs longer than `u32::MAX - 1` bytes do not fit the arena index
    /// width; callers validate length before building.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() < u32::MAX as usize);
        let last = bytes.len().wrapping_sub(1);
        let nodes: Vec<ChainNode> = bytes
            .iter()
            .enumerate()
            .map(|(i, &b)| ChainNode {
                symbol: u32::from(b),
                prev: if i == 0 { None } else { Some((i - 1) as u32) },
                next: if i == last { None } else { Some((i + 1) as u32) },
            })
            .collect();

        Self {
            head: if nodes.is_empty() { None } else { Some(0) },
            live: nodes.len(),
            nodes,
        }
    }

    /// Index of the first live node.
    #[inline]
    pub fn head(&self) -> Option<u32> {
        self.head
    }

    /// The symbol currently held at `node`.
    #[inline]
    pub fn symbol(&self, node: u32) -> u32 {
        self.nodes[node as usize].symbol
    }

    /// The live node after `node`.
    #[inline]
    pub fn next(&self, node: u32) -> Option<u32> {
        self.nodes[node as usize].next
    }

    /// The live node before `node`.
    #[inline]
    pub fn prev(&self, node: u32) -> Option<u32> {
        self.nodes[node as usize].prev
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no live node remains.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Merge adjacent nodes `a` and `b` into `a`, which takes `new_symbol`.
    ///
    /// `b` must be `a`'s current successor. `b` is unlinked and its slot is
    /// never revisited. A chain of exactly two nodes collapses to a single
    /// node; that is a normal outcome, not an error.
    pub fn merge_at(&mut self, a: u32, b: u32, new_symbol: u32) {
        debug_assert_eq!(self.nodes[a as usize].next, Some(b));
        debug_assert_eq!(self.nodes[b as usize].prev, Some(a));

        let after = self.nodes[b as usize].next;
        self.nodes[a as usize].symbol = new_symbol;
        self.nodes[a as usize].next = after;
        if let Some(q) = after {
            self.nodes[q as usize].prev = Some(a);
        }

        self.nodes[b as usize].prev = None;
        self.nodes[b as usize].next = None;
        self.live -= 1;
    }

    /// Iterate live node indices from the head.
    pub fn iter_nodes(&self) -> NodeIter<'_> {
        NodeIter {
            chain: self,
            cursor: self.head,
        }
    }

    /// Collect the live symbol sequence in order.
    pub fn symbols(&self) -> Vec<u32> {
        self.iter_nodes().map(|n| self.symbol(n)).collect()
    }
}

/// Iterator over live node indices in sequence order.
pub struct NodeIter<'a> {
    chain: &'a SymbolChain,
    cursor: Option<u32>,
}

impl Iterator for NodeIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let node = self.cursor?;
        self.cursor = self.chain.next(node);
        Some(node)
    }
}
