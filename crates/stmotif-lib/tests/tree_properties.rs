//! Property-based tests for suffix tree queries.
//!
//! Properties checked against a brute-force scan:
//!
//! 1. **Exact counts**: `count(m)` equals the number of overlapping matches
//! 2. **Monotonicity**: extending a motif never increases its count
//! 3. **Online equivalence**: symbol-by-symbol construction equals `build`
//! 4. **Node bound**: at most `2n - 1` nodes for a terminated text

use proptest::prelude::*;
use stmotif_lib::{constants::max_nodes, Alphabet, SuffixTree};

fn arb_dna(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ATGC".to_vec()), 1..max_len)
}

fn brute_force_count(text: &[u8], motif: &[u8]) -> u64 {
    if motif.len() > text.len() {
        return 0;
    }
    text.windows(motif.len()).filter(|window| *window == motif).count() as u64
}

fn build(body: &[u8]) -> SuffixTree {
    let mut text = body.to_vec();
    text.push(b'$');
    SuffixTree::from_sequence(Alphabet::dna(), &text).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn count_matches_brute_force(body in arb_dna(60), motif in arb_dna(6)) {
        let tree = build(&body);
        prop_assert_eq!(tree.count(&motif).unwrap(), brute_force_count(&body, &motif));
    }

    #[test]
    fn substring_counts_match_brute_force(body in arb_dna(60), start in 0usize..60, len in 1usize..10) {
        let start = start % body.len();
        let end = (start + len).min(body.len());
        let motif = &body[start..end];
        let tree = build(&body);
        let count = tree.count(motif).unwrap();
        prop_assert!(count >= 1);
        prop_assert_eq!(count, brute_force_count(&body, motif));
    }

    #[test]
    fn longer_motifs_never_count_more(body in arb_dna(60), motif in arb_dna(8)) {
        let tree = build(&body);
        for split in 1..motif.len() {
            let shorter = tree.count(&motif[..split]).unwrap();
            let longer = tree.count(&motif[..split + 1]).unwrap();
            prop_assert!(shorter >= longer);
        }
    }

    #[test]
    fn online_equals_batch(body in arb_dna(60), motif in arb_dna(5)) {
        let batch = build(&body);
        let mut online = SuffixTree::new(Alphabet::dna());
        for &symbol in body.iter().chain(b"$") {
            online.extend(symbol).unwrap();
        }
        prop_assert_eq!(online.num_nodes(), batch.num_nodes());
        prop_assert_eq!(online.count(&motif), batch.count(&motif));
    }

    #[test]
    fn node_count_is_bounded(body in arb_dna(200)) {
        let tree = build(&body);
        prop_assert!(tree.num_nodes() <= max_nodes(body.len() + 1));
        prop_assert!(tree.check_structure().is_ok());
    }
}
