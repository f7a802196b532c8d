// stmotif: suffix trees over small alphabets
//
// Builds the suffix tree of a DNA text online with Ukkonen's algorithm and
// counts motif occurrences in time proportional to the motif length.

//! Suffix tree index for motif counting over a small alphabet.
//!
//! ```
//! use stmotif_lib::{Alphabet, SuffixTree};
//!
//! let tree = SuffixTree::from_sequence(Alphabet::dna(), b"ATGATG$").unwrap();
//! assert_eq!(tree.count(b"ATG").unwrap(), 2);
//! assert_eq!(tree.positions(b"TG").unwrap(), vec![1, 4]);
//! ```

#![warn(missing_docs)]

pub mod active_point;
pub mod arena;
pub mod builder;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod motif_query;
pub mod source;
pub mod suffix_tree;
pub mod traversal;

// Re-export common types at crate root
pub use active_point::ActivePoint;
pub use arena::{EdgeEnd, Node, NodeArena, NodeId};
pub use builder::TreeBuilder;
pub use config::TreeConfiguration;
pub use encoding::{Alphabet, EncodingError};
pub use suffix_tree::{SuffixTree, TreeError};

/// Version information
pub fn version() -> (u8, u8, u8) {
    constants::VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let (major, minor, patch) = version();
        assert_eq!(major, 0);
        assert_eq!(minor, 1);
        assert_eq!(patch, 0);
    }

    #[test]
    fn test_tree_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SuffixTree>();
    }
}
