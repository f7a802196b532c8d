//! Motif occurrence queries
//!
//! A motif is matched by walking down from the root, comparing it against
//! edge labels symbol by symbol. Every leaf below the node where the walk
//! ends is one occurrence, so counting costs O(|motif|) for the walk plus
//! the size of that subtree.
//!
//! Until the terminator is appended the shortest suffixes may still be
//! implicit (they end inside the tree and have no leaf). Queries add those
//! pending suffixes explicitly, so counts are exact at every point of the
//! online construction.

use crate::{
    arena::NodeId,
    suffix_tree::{SuffixTree, TreeError},
    traversal::{collect_suffix_starts, count_leaves},
};
use rayon::prelude::*;
use tracing::debug;

impl SuffixTree {
    /// Encode a motif, rejecting empty motifs and unknown symbols
    fn encode_motif(&self, motif: &[u8]) -> Result<Vec<u8>, TreeError> {
        if motif.is_empty() {
            return Err(TreeError::EmptyMotif);
        }
        motif
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                self.alphabet()
                    .encode(symbol)
                    .map_err(|_| TreeError::InvalidSymbol {
                        symbol: symbol as char,
                        position,
                    })
            })
            .collect()
    }

    /// Walk the encoded motif down from the root.
    ///
    /// Returns the node whose incoming edge contains the end of the motif,
    /// or `None` if the motif leaves the tree.
    fn locate(&self, motif: &[u8]) -> Option<NodeId> {
        let mut node = NodeId::ROOT;
        let mut matched = 0;

        while matched < motif.len() {
            node = self.node(node).child(motif[matched])?;
            let label = self.edge_codes(node);
            let take = label.len().min(motif.len() - matched);
            if label[..take] != motif[matched..matched + take] {
                return None;
            }
            matched += take;
        }

        Some(node)
    }

    /// Start positions of implicit suffixes that begin with `motif`
    fn pending_matches<'a>(&'a self, motif: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
        let text = self.codes();
        (text.len() - self.num_pending()..text.len())
            .filter(move |&start| text[start..].starts_with(motif))
    }

    /// Count the occurrences of `motif` in the indexed text (overlaps included).
    ///
    /// # Errors
    /// - [`TreeError::EmptyMotif`] for an empty motif
    /// - [`TreeError::InvalidSymbol`] for a symbol outside the alphabet; the
    ///   position is the offset in `motif`
    pub fn count(&self, motif: &[u8]) -> Result<u64, TreeError> {
        let codes = self.encode_motif(motif)?;
        let Some(node) = self.locate(&codes) else {
            return Ok(0);
        };
        let explicit = count_leaves(self.arena(), node);
        let implicit = self.pending_matches(&codes).count() as u64;
        Ok(explicit + implicit)
    }

    /// Whether `motif` occurs at least once
    pub fn contains(&self, motif: &[u8]) -> Result<bool, TreeError> {
        let codes = self.encode_motif(motif)?;
        Ok(self.locate(&codes).is_some())
    }

    /// Sorted start positions of every occurrence of `motif`
    pub fn positions(&self, motif: &[u8]) -> Result<Vec<usize>, TreeError> {
        let codes = self.encode_motif(motif)?;
        let Some(node) = self.locate(&codes) else {
            return Ok(Vec::new());
        };

        let mut starts = Vec::new();
        collect_suffix_starts(self.arena(), node, &mut starts);
        starts.extend(self.pending_matches(&codes));
        starts.sort_unstable();
        Ok(starts)
    }

    /// Count many motifs in parallel on the current rayon pool.
    ///
    /// Results are returned in input order.
    pub fn count_many<M>(&self, motifs: &[M]) -> Vec<Result<u64, TreeError>>
    where
        M: AsRef<[u8]> + Sync,
    {
        motifs.par_iter().map(|motif| self.count(motif.as_ref())).collect()
    }

    /// Count many motifs on a dedicated pool of `num_threads` workers.
    ///
    /// `num_threads == 0` uses all available cores.
    pub fn count_many_with_threads<M>(
        &self,
        motifs: &[M],
        num_threads: usize,
    ) -> Result<Vec<Result<u64, TreeError>>, TreeError>
    where
        M: AsRef<[u8]> + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| TreeError::ThreadPool(e.to_string()))?;

        debug!(
            "Counting {} motifs on {} threads",
            motifs.len(),
            pool.current_num_threads()
        );
        Ok(pool.install(|| self.count_many(motifs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Alphabet;

    fn dna_tree(text: &[u8]) -> SuffixTree {
        SuffixTree::from_sequence(Alphabet::dna(), text).unwrap()
    }

    #[test]
    fn test_count_atgatg() {
        let tree = dna_tree(b"ATGATG$");
        assert_eq!(tree.count(b"ATG").unwrap(), 2);
        assert_eq!(tree.count(b"TGA").unwrap(), 1);
        assert_eq!(tree.count(b"G").unwrap(), 2);
        assert_eq!(tree.count(b"C").unwrap(), 0);
        assert_eq!(tree.count(b"ATGATG").unwrap(), 1);
        assert_eq!(tree.count(b""), Err(TreeError::EmptyMotif));
        assert_eq!(
            tree.count(b"X"),
            Err(TreeError::InvalidSymbol { symbol: 'X', position: 0 })
        );
    }

    #[test]
    fn test_count_homopolymer() {
        let tree = dna_tree(b"AAAA$");
        assert_eq!(tree.count(b"A").unwrap(), 4);
        assert_eq!(tree.count(b"AA").unwrap(), 3);
        assert_eq!(tree.count(b"AAAA").unwrap(), 1);
        assert_eq!(tree.count(b"AAAAA").unwrap(), 0);
    }

    #[test]
    fn test_terminator_matches_literally() {
        let tree = dna_tree(b"ATGATG$");
        assert_eq!(tree.count(b"$").unwrap(), 1);
        assert_eq!(tree.count(b"G$").unwrap(), 1);
        assert_eq!(tree.count(b"$A").unwrap(), 0);
    }

    #[test]
    fn test_lowercase_motif() {
        let tree = dna_tree(b"ATGATG$");
        assert_eq!(tree.count(b"atg").unwrap(), 2);
    }

    #[test]
    fn test_mismatch_inside_edge() {
        let tree = dna_tree(b"GATTACA$");
        assert_eq!(tree.count(b"GATC").unwrap(), 0);
        assert_eq!(tree.count(b"TTAC").unwrap(), 1);
        assert!(tree.contains(b"TAC").unwrap());
        assert!(!tree.contains(b"CAT").unwrap());
    }

    #[test]
    fn test_invalid_symbol_position_in_motif() {
        let tree = dna_tree(b"ATGATG$");
        assert_eq!(
            tree.count(b"ATN"),
            Err(TreeError::InvalidSymbol { symbol: 'N', position: 2 })
        );
    }

    #[test]
    fn test_positions() {
        let tree = dna_tree(b"ATGATG$");
        assert_eq!(tree.positions(b"ATG").unwrap(), vec![0, 3]);
        assert_eq!(tree.positions(b"G").unwrap(), vec![2, 5]);
        assert!(tree.positions(b"C").unwrap().is_empty());
    }

    #[test]
    fn test_counts_exact_before_terminator() {
        let mut tree = SuffixTree::new(Alphabet::dna());
        tree.build(b"AAAA").unwrap();
        assert!(tree.num_pending() > 0);
        assert_eq!(tree.count(b"A").unwrap(), 4);
        assert_eq!(tree.count(b"AA").unwrap(), 3);
        assert_eq!(tree.count(b"AAA").unwrap(), 2);
        assert_eq!(tree.positions(b"AA").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_count_many_keeps_order() {
        let tree = dna_tree(b"ATGATG$");
        let motifs = vec!["ATG", "", "C", "G"];
        let results = tree.count_many_with_threads(&motifs, 2).unwrap();
        assert_eq!(
            results,
            vec![Ok(2), Err(TreeError::EmptyMotif), Ok(0), Ok(2)]
        );
        assert_eq!(tree.count_many(&motifs), results);
    }
}
