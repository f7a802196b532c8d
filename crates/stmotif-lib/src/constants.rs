//! Constants shared across the suffix tree implementation
//!
//! Alphabet limits, the default DNA symbol set and version information.

/// Maximum number of symbols an alphabet may hold (terminator included).
///
/// Every node carries a child table of exactly this width, so it is kept small.
pub const MAX_ALPHABET_SIZE: usize = 8;

/// Symbols of the default DNA alphabet, in code order (A=0, T=1, G=2, C=3, $=4)
pub const DNA_SYMBOLS: &[u8] = b"ATGC$";

/// Default terminator symbol appended to every indexed text
pub const DEFAULT_TERMINATOR: u8 = b'$';

/// Letter used on the interactive prompt to stop querying
pub const QUIT_COMMAND: &str = "Q";

/// Version number
pub const VERSION: (u8, u8, u8) = (0, 1, 0);

/// Upper bound on the node count of a suffix tree over a terminated text of
/// `n` symbols.
///
/// A terminated text of length `n >= 2` yields at most `n` leaves and
/// `n - 1` branching nodes (root included). A single-symbol text yields the
/// root plus one leaf.
#[inline]
pub const fn max_nodes(n: usize) -> usize {
    if n < 2 {
        n + 1
    } else {
        2 * n - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dna_symbols_fit() {
        assert!(DNA_SYMBOLS.len() <= MAX_ALPHABET_SIZE);
        assert_eq!(DNA_SYMBOLS.last(), Some(&DEFAULT_TERMINATOR));
    }

    #[test]
    fn test_max_nodes() {
        assert_eq!(max_nodes(0), 1);
        assert_eq!(max_nodes(1), 2);
        assert_eq!(max_nodes(2), 3);
        assert_eq!(max_nodes(7), 13);
    }
}
