//! Active point of Ukkonen's construction
//!
//! The active point marks where the next suffix extension starts: a node,
//! the text position whose symbol picks the outgoing edge, and how far along
//! that edge the position lies. `remainder` counts the suffixes that are
//! still implicit and must be inserted by later extensions.

use crate::arena::{NodeArena, NodeId};

/// Cursor into the implicit suffix tree between extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePoint {
    /// Node the active position hangs off
    pub node: NodeId,
    /// Text index whose symbol selects the outgoing edge (valid when `length > 0`)
    pub edge: usize,
    /// Number of symbols matched along the active edge
    pub length: usize,
    /// Suffixes not yet inserted explicitly
    pub remainder: usize,
}

impl Default for ActivePoint {
    fn default() -> Self {
        Self {
            node: NodeId::ROOT,
            edge: 0,
            length: 0,
            remainder: 0,
        }
    }
}

impl ActivePoint {
    /// True when the active point sits exactly on `node`
    #[inline]
    pub fn on_node(&self) -> bool {
        self.length == 0
    }

    /// Skip/count descent: jump over the whole edge into `next` when the
    /// active length covers it.
    ///
    /// Returns `true` if the active point moved.
    #[inline]
    pub fn walk_down(&mut self, arena: &NodeArena, next: NodeId, frontier: usize) -> bool {
        let edge_length = arena.get(next).edge_length(frontier);
        if self.length >= edge_length {
            self.edge += edge_length;
            self.length -= edge_length;
            self.node = next;
            true
        } else {
            false
        }
    }

    /// Move to the position of the next shorter pending suffix after one
    /// extension of the phase ending at text index `position`.
    pub fn advance(&mut self, arena: &NodeArena, position: usize) {
        if self.node == NodeId::ROOT && self.length > 0 {
            self.length -= 1;
            self.edge = position + 1 - self.remainder;
        } else {
            self.node = arena.get(self.node).suffix_link.unwrap_or(NodeId::ROOT);
        }
    }
}
