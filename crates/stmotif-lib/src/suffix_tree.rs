//! Suffix tree built online with Ukkonen's algorithm
//!
//! [`SuffixTree`] bundles the text, the node arena and the active point of
//! one index. Each call to [`extend`](SuffixTree::extend) appends a symbol
//! and runs one phase of the construction, so after `n` symbols the tree is
//! the (implicit) suffix tree of the text so far, built in O(n) total.
//!
//! Leaves use an open edge end that follows the text frontier; extending
//! every leaf by the new symbol is therefore free. Within a phase each
//! extension applies one of:
//! - the new symbol already follows the active point: extend the active
//!   length and stop the phase,
//! - the active node has no edge for the symbol: hang a new leaf off it,
//! - the active edge diverges: split it and hang a new leaf off the split.

use crate::{
    active_point::ActivePoint,
    arena::{EdgeEnd, Node, NodeArena, NodeId},
    constants::max_nodes,
    encoding::Alphabet,
};
use thiserror::Error;
use tracing::{debug, info};

/// Errors reported by tree construction and queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A symbol outside the alphabet was supplied
    #[error("Invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol {
        /// Offending symbol
        symbol: char,
        /// Position in the text, input sequence or motif
        position: usize,
    },
    /// The terminator was already appended; the text is closed
    #[error("Text is already terminated; cannot extend at position {position}")]
    AlreadyTerminated {
        /// Position the rejected symbol would have taken
        position: usize,
    },
    /// Motif queries need at least one symbol
    #[error("Motif must not be empty")]
    EmptyMotif,
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The worker pool for batch queries could not be created
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),
}

/// Suffix tree over a small alphabet
#[derive(Debug, Clone)]
pub struct SuffixTree {
    alphabet: Alphabet,
    /// Text as alphabet codes
    text: Vec<u8>,
    arena: NodeArena,
    active: ActivePoint,
    num_leaves: usize,
    terminated: bool,
}

impl SuffixTree {
    /// Create an empty tree holding only the root
    pub fn new(alphabet: Alphabet) -> Self {
        Self::with_capacity(alphabet, 0)
    }

    /// Create an empty tree with room for a text of `capacity` symbols
    pub fn with_capacity(alphabet: Alphabet, capacity: usize) -> Self {
        let mut arena = NodeArena::with_capacity(max_nodes(capacity));
        let root = arena.allocate(0, EdgeEnd::Closed(0));
        debug_assert_eq!(root, NodeId::ROOT);

        Self {
            alphabet,
            text: Vec::with_capacity(capacity),
            arena,
            active: ActivePoint::default(),
            num_leaves: 0,
            terminated: false,
        }
    }

    /// Build a tree from a whole sequence
    ///
    /// The sequence is indexed as given; append the terminator yourself to
    /// get an explicit tree.
    pub fn from_sequence(alphabet: Alphabet, sequence: &[u8]) -> Result<Self, TreeError> {
        let mut tree = Self::with_capacity(alphabet, sequence.len());
        tree.build(sequence)?;
        Ok(tree)
    }

    /// Append one symbol and run one phase of the construction.
    ///
    /// # Errors
    /// - [`TreeError::InvalidSymbol`] if `symbol` is not in the alphabet
    /// - [`TreeError::AlreadyTerminated`] if the terminator was appended before
    ///
    /// The tree is unchanged when an error is returned.
    pub fn extend(&mut self, symbol: u8) -> Result<(), TreeError> {
        let position = self.text.len();
        if self.terminated {
            return Err(TreeError::AlreadyTerminated { position });
        }
        let code = self
            .alphabet
            .encode(symbol)
            .map_err(|_| TreeError::InvalidSymbol {
                symbol: symbol as char,
                position,
            })?;

        self.extend_code(code);
        if code == self.alphabet.terminator_code() {
            self.terminated = true;
            debug_assert_eq!(self.active.remainder, 0, "terminator left implicit suffixes");
        }
        Ok(())
    }

    /// Append every symbol of `sequence` in order.
    ///
    /// Stops at the first failing symbol; the error reports its offset in
    /// `sequence` and the tree keeps every symbol before it.
    pub fn build(&mut self, sequence: &[u8]) -> Result<(), TreeError> {
        let before = self.text.len();
        self.text.reserve(sequence.len());
        self.arena.reserve(2 * sequence.len());

        for (offset, &symbol) in sequence.iter().enumerate() {
            self.extend(symbol).map_err(|err| match err {
                TreeError::InvalidSymbol { symbol, .. } => TreeError::InvalidSymbol {
                    symbol,
                    position: offset,
                },
                TreeError::AlreadyTerminated { .. } => {
                    TreeError::AlreadyTerminated { position: offset }
                }
                other => other,
            })?;
        }

        debug!(
            "Indexed {} symbols ({} total) into {} nodes",
            self.text.len() - before,
            self.text.len(),
            self.arena.len()
        );
        Ok(())
    }

    /// One phase of Ukkonen's algorithm for the symbol with code `code`
    fn extend_code(&mut self, code: u8) {
        let position = self.text.len();
        self.text.push(code);
        let frontier = position + 1;

        let mut pending_link: Option<NodeId> = None;
        self.active.remainder += 1;

        while self.active.remainder > 0 {
            if self.active.on_node() {
                self.active.edge = position;
            }
            let edge_code = self.text[self.active.edge];

            match self.arena.get(self.active.node).child(edge_code) {
                None => {
                    let leaf = self.new_leaf(position);
                    self.arena.get_mut(self.active.node).children[edge_code as usize] = Some(leaf);
                    Self::add_suffix_link(&mut self.arena, &mut pending_link, self.active.node);
                }
                Some(next) => {
                    if self.active.walk_down(&self.arena, next, frontier) {
                        continue;
                    }

                    let next_start = self.arena.get(next).start;
                    if self.text[next_start + self.active.length] == code {
                        self.active.length += 1;
                        Self::add_suffix_link(&mut self.arena, &mut pending_link, self.active.node);
                        break;
                    }

                    let split_end = next_start + self.active.length;
                    let split = self.arena.allocate(next_start, EdgeEnd::Closed(split_end));
                    self.arena.get_mut(self.active.node).children[edge_code as usize] = Some(split);

                    let leaf = self.new_leaf(position);
                    self.arena.get_mut(split).children[code as usize] = Some(leaf);

                    self.arena.get_mut(next).start = split_end;
                    let rehomed_code = self.text[split_end];
                    self.arena.get_mut(split).children[rehomed_code as usize] = Some(next);

                    Self::add_suffix_link(&mut self.arena, &mut pending_link, split);
                }
            }

            self.active.remainder -= 1;
            self.active.advance(&self.arena, position);
        }
    }

    /// Allocate the leaf for the longest pending suffix of the phase at `position`
    fn new_leaf(&mut self, position: usize) -> NodeId {
        let leaf = self.arena.allocate(position, EdgeEnd::Open);
        self.arena.get_mut(leaf).suffix_start = Some(position + 1 - self.active.remainder);
        self.num_leaves += 1;
        leaf
    }

    /// Point the node waiting for a suffix link at `node`, then make `node`
    /// the one waiting. The root never waits for a link.
    #[inline]
    fn add_suffix_link(arena: &mut NodeArena, pending: &mut Option<NodeId>, node: NodeId) {
        if let Some(waiting) = *pending {
            arena.get_mut(waiting).suffix_link = Some(node);
        }
        *pending = (node != NodeId::ROOT).then_some(node);
    }

    /// Alphabet used to encode the text
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of symbols indexed so far (terminator included)
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when no symbol has been indexed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True once the terminator has been appended
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Indexed text as alphabet codes
    #[inline]
    pub fn codes(&self) -> &[u8] {
        &self.text
    }

    /// Indexed text as symbols
    pub fn text(&self) -> Vec<u8> {
        self.alphabet.decode_sequence(&self.text)
    }

    /// Total number of nodes, root included
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.arena.len()
    }

    /// Number of leaves (suffixes made explicit so far)
    #[inline]
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Number of suffixes that are still implicit
    #[inline]
    pub fn num_pending(&self) -> usize {
        self.active.remainder
    }

    /// Current active point
    pub fn active_point(&self) -> ActivePoint {
        self.active
    }

    /// Borrow a node
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    pub(crate) fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Edge label of `id` as alphabet codes
    pub fn edge_codes(&self, id: NodeId) -> &[u8] {
        let node = self.arena.get(id);
        &self.text[node.start..node.end_at(self.text.len())]
    }

    /// Approximate heap and inline size of the index in bytes
    pub fn num_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.text.capacity() + self.arena.num_bytes()
    }

    /// Log a breakdown of the memory used by the tree
    pub fn print_space_breakdown(&self) {
        let total = self.num_bytes();
        info!("Suffix tree space breakdown:");
        info!("  text:   {} bytes", self.text.capacity());
        info!(
            "  nodes:  {} bytes ({} nodes, {} leaves)",
            self.arena.num_bytes(),
            self.arena.len(),
            self.num_leaves
        );
        info!("  total:  {:.2} KB", total as f64 / 1024.0);
        if !self.text.is_empty() {
            debug!("  bytes per symbol: {:.2}", total as f64 / self.text.len() as f64);
        }
    }

    /// Check the structural invariants of the tree.
    ///
    /// Intended for tests and the CLI `check` command; returns a description
    /// of the first violation found.
    pub fn check_structure(&self) -> Result<(), String> {
        let frontier = self.text.len();
        let mut leaves = 0usize;

        for (id, node) in self.arena.iter() {
            if node.is_leaf() && id != NodeId::ROOT {
                leaves += 1;
                if node.suffix_start.is_none() {
                    return Err(format!("leaf {:?} has no suffix start", id));
                }
            }
            if id != NodeId::ROOT {
                if node.edge_length(frontier) == 0 {
                    return Err(format!("node {:?} has an empty edge label", id));
                }
                if !node.is_leaf() && node.children().count() < 2 {
                    return Err(format!("internal node {:?} has fewer than two children", id));
                }
            }
            for (code, child) in node.children.iter().enumerate() {
                if let Some(child) = child {
                    let first = self.text[self.arena.get(*child).start];
                    if first as usize != code {
                        return Err(format!(
                            "child {:?} of {:?} stored under code {} but its label starts with {}",
                            child, id, code, first
                        ));
                    }
                }
            }
        }

        if leaves != self.num_leaves || leaves + self.active.remainder != frontier {
            return Err(format!(
                "{} leaves and {} pending suffixes for a text of {} symbols",
                leaves, self.active.remainder, frontier
            ));
        }
        if self.terminated && frontier >= 2 && self.arena.len() > max_nodes(frontier) {
            return Err(format!(
                "{} nodes exceed the bound of {} for {} symbols",
                self.arena.len(),
                max_nodes(frontier),
                frontier
            ));
        }
        Ok(())
    }
}
