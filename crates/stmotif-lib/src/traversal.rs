//! Depth-first traversals over the node arena
//!
//! All walks use an explicit stack: a tree over `n` symbols can be `n`
//! levels deep, which is too much for recursion on long genomes.

use crate::{
    arena::{NodeArena, NodeId},
    suffix_tree::SuffixTree,
};
use std::io::{self, Write};

/// Number of leaves in the subtree rooted at `node` (a leaf counts itself)
pub fn count_leaves(arena: &NodeArena, node: NodeId) -> u64 {
    let mut count = 0u64;
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        let current = arena.get(id);
        if current.is_leaf() {
            count += 1;
        } else {
            stack.extend(current.children());
        }
    }
    count
}

/// Append the suffix starts of every leaf under `node` to `out`
pub fn collect_suffix_starts(arena: &NodeArena, node: NodeId, out: &mut Vec<usize>) {
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        let current = arena.get(id);
        if let Some(start) = current.suffix_start {
            out.push(start);
        }
        stack.extend(current.children());
    }
}

impl SuffixTree {
    /// Visit every non-root node in depth-first preorder, children in
    /// alphabet code order.
    ///
    /// The callback receives the node, its depth in edges and the decoded
    /// label of the path from the root down to and including its edge.
    pub fn visit_paths<F>(&self, mut visit: F)
    where
        F: FnMut(NodeId, usize, &[u8]),
    {
        let alphabet = self.alphabet();
        let mut path: Vec<u8> = Vec::new();
        // (node, depth in edges, path length of the parent)
        let mut stack: Vec<(NodeId, usize, usize)> = self
            .node(NodeId::ROOT)
            .children()
            .rev()
            .map(|child| (child, 1, 0))
            .collect();

        while let Some((id, depth, parent_len)) = stack.pop() {
            path.truncate(parent_len);
            path.extend(self.edge_codes(id).iter().map(|&code| alphabet.decode(code)));
            visit(id, depth, &path);

            let path_len = path.len();
            stack.extend(
                self.node(id)
                    .children()
                    .rev()
                    .map(|child| (child, depth + 1, path_len)),
            );
        }
    }

    /// Write one path label per line, in depth-first order
    pub fn write_tree<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut result = Ok(());
        self.visit_paths(|_, _, path| {
            if result.is_ok() {
                result = writer
                    .write_all(path)
                    .and_then(|_| writer.write_all(b"\n"));
            }
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Alphabet;

    #[test]
    fn test_count_leaves_from_root() {
        let tree = SuffixTree::from_sequence(Alphabet::dna(), b"GATTACA$").unwrap();
        assert_eq!(count_leaves(tree.arena(), NodeId::ROOT), 8);
    }

    #[test]
    fn test_collect_suffix_starts_covers_all_suffixes() {
        let tree = SuffixTree::from_sequence(Alphabet::dna(), b"ACACAC$").unwrap();
        let mut starts = Vec::new();
        collect_suffix_starts(tree.arena(), NodeId::ROOT, &mut starts);
        starts.sort_unstable();
        assert_eq!(starts, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_write_tree() {
        let tree = SuffixTree::from_sequence(Alphabet::dna(), b"AA$").unwrap();
        let mut out = Vec::new();
        tree.write_tree(&mut out).unwrap();
        // Children in code order: A (0) before $ (4)
        assert_eq!(String::from_utf8(out).unwrap(), "A\nAA$\nA$\n$\n");
    }

    #[test]
    fn test_visit_paths_reports_depths() {
        let tree = SuffixTree::from_sequence(Alphabet::dna(), b"AA$").unwrap();
        let mut seen = Vec::new();
        tree.visit_paths(|_, depth, path| seen.push((depth, path.to_vec())));
        assert_eq!(
            seen,
            vec![
                (1, b"A".to_vec()),
                (2, b"AA$".to_vec()),
                (2, b"A$".to_vec()),
                (1, b"$".to_vec()),
            ]
        );
    }

    #[test]
    fn test_leaf_paths_are_suffixes() {
        let text = b"TGCATGCA$";
        let tree = SuffixTree::from_sequence(Alphabet::dna(), text).unwrap();
        let mut leaf_paths = Vec::new();
        tree.visit_paths(|id, _, path| {
            if let Some(start) = tree.node(id).suffix_start {
                leaf_paths.push((start, path.to_vec()));
            }
        });
        assert_eq!(leaf_paths.len(), text.len());
        for (start, path) in leaf_paths {
            assert_eq!(path, text[start..].to_vec());
        }
    }
}
