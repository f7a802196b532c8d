//! Tree builder orchestration
//!
//! Validates the configuration, sizes the tree for the input and runs the
//! online construction over the whole text, appending the terminator when
//! the input does not end with it.

use crate::{
    config::TreeConfiguration,
    suffix_tree::{SuffixTree, TreeError},
};
use std::time::Instant;
use tracing::{debug, info};

/// Builder for suffix trees over a configured alphabet
pub struct TreeBuilder {
    config: TreeConfiguration,
}

impl TreeBuilder {
    /// Create a new builder with the given configuration
    pub fn new(config: TreeConfiguration) -> Result<Self, TreeError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration used by this builder
    pub fn config(&self) -> &TreeConfiguration {
        &self.config
    }

    /// Build the explicit suffix tree of `text`.
    ///
    /// The terminator is appended unless `text` already ends with it. A
    /// terminator anywhere else is rejected, since every suffix must end in
    /// its own leaf.
    pub fn build_from_text(&self, text: &[u8]) -> Result<SuffixTree, TreeError> {
        let alphabet = &self.config.alphabet;
        let needs_terminator = text.last().map_or(true, |&last| !alphabet.is_terminator(last));
        let total = text.len() + usize::from(needs_terminator);

        if self.config.verbose {
            self.config.print();
            info!("Building suffix tree over {} symbols", total);
        }

        let start = Instant::now();
        let mut tree = SuffixTree::with_capacity(alphabet.clone(), total);
        tree.build(text)?;
        if needs_terminator {
            tree.extend(alphabet.terminator())?;
        }
        let elapsed = start.elapsed();

        if self.config.verbose {
            info!(
                "Suffix tree built in {:.3} ms: {} nodes, {} leaves",
                elapsed.as_secs_f64() * 1000.0,
                tree.num_nodes(),
                tree.num_leaves()
            );
        } else {
            debug!("Suffix tree built in {:?}", elapsed);
        }
        Ok(tree)
    }
}
