//! Node storage for the suffix tree
//!
//! All nodes live in one append-only vector and are addressed by [`NodeId`].
//! Nodes are never freed individually; the whole arena is dropped together
//! with the tree that owns it.

use crate::constants::MAX_ALPHABET_SIZE;

/// Stable handle to a node in a [`NodeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root is always the first node allocated
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// End bound of an edge label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    /// Fixed exclusive end, used by internal nodes
    Closed(usize),
    /// Leaf edge that grows with the text; resolves to the current frontier
    Open,
}

/// A suffix tree node together with the label of its incoming edge
#[derive(Debug, Clone)]
pub struct Node {
    /// Inclusive text index where the incoming edge label begins
    pub start: usize,
    /// End of the incoming edge label
    pub end: EdgeEnd,
    /// Suffix link, `None` when unset
    pub suffix_link: Option<NodeId>,
    /// Child per alphabet code
    pub children: [Option<NodeId>; MAX_ALPHABET_SIZE],
    /// Start of the suffix spelled by the root-to-leaf path (leaves only)
    pub suffix_start: Option<usize>,
}

impl Node {
    fn new(start: usize, end: EdgeEnd) -> Self {
        Self {
            start,
            end,
            suffix_link: None,
            children: [None; MAX_ALPHABET_SIZE],
            suffix_start: None,
        }
    }

    /// Exclusive end of the edge label once the text has `frontier` symbols
    #[inline]
    pub fn end_at(&self, frontier: usize) -> usize {
        match self.end {
            EdgeEnd::Closed(end) => end.min(frontier),
            EdgeEnd::Open => frontier,
        }
    }

    /// Length of the edge label once the text has `frontier` symbols
    #[inline]
    pub fn edge_length(&self, frontier: usize) -> usize {
        self.end_at(frontier).saturating_sub(self.start)
    }

    /// Child reached by the symbol with code `code`
    #[inline]
    pub fn child(&self, code: u8) -> Option<NodeId> {
        self.children[code as usize]
    }

    /// Iterate over present children in code order
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children.iter().filter_map(|child| *child)
    }

    /// True when the node has no children
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// Append-only owner of every node of one tree
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty arena with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Append a node and return its handle
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` nodes.
    pub fn allocate(&mut self, start: usize, end: EdgeEnd) -> NodeId {
        let id = u32::try_from(self.nodes.len()).expect("node arena exceeds u32::MAX nodes");
        self.nodes.push(Node::new(start, end));
        NodeId(id)
    }

    /// Borrow a node
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Mutably borrow a node
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Number of allocated nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node has been allocated
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reserve room for at least `additional` more nodes
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Heap bytes held by the node vector (capacity, not length)
    pub fn num_bytes(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node>()
    }

    /// Iterate over all nodes in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }
}
