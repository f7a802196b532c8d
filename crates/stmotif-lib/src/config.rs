//! Configuration for suffix tree construction and querying
//!
//! Groups the alphabet with the resource settings used by the builder and
//! by batch queries.

use crate::{encoding::Alphabet, suffix_tree::TreeError};

/// Configuration parameters for building and querying a suffix tree
#[derive(Debug, Clone)]
pub struct TreeConfiguration {
    /// Alphabet of the indexed text, terminator included
    pub alphabet: Alphabet,

    /// Number of threads for batch queries (0 = all available cores)
    pub num_threads: usize,

    /// Log construction progress at info level
    pub verbose: bool,
}

impl Default for TreeConfiguration {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::dna(),
            num_threads: 0,
            verbose: true,
        }
    }
}

impl TreeConfiguration {
    /// Create a configuration for the given alphabet
    pub fn new(alphabet: Alphabet) -> Result<Self, TreeError> {
        let config = Self {
            alphabet,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.alphabet.len() < 2 {
            return Err(TreeError::InvalidConfiguration(format!(
                "alphabet needs at least one symbol besides the terminator, got {:?}",
                String::from_utf8_lossy(self.alphabet.symbols())
            )));
        }
        Ok(())
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Tree Configuration:");
        tracing::info!(
            "  alphabet = {}",
            String::from_utf8_lossy(self.alphabet.symbols())
        );
        tracing::debug!("  terminator = {:?}", self.alphabet.terminator() as char);
        if self.num_threads == 0 {
            tracing::info!("  num_threads = all available cores");
        } else {
            tracing::info!("  num_threads = {}", self.num_threads);
        }
        tracing::debug!("  verbose = {}", self.verbose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TreeConfiguration::default();
        assert_eq!(config.alphabet, Alphabet::dna());
        assert_eq!(config.num_threads, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_config() {
        let alphabet = Alphabet::new(b"01#", b'#').unwrap();
        let config = TreeConfiguration::new(alphabet.clone()).unwrap();
        assert_eq!(config.alphabet, alphabet);
    }

    #[test]
    fn test_terminator_only_alphabet_rejected() {
        let alphabet = Alphabet::new(b"$", b'$').unwrap();
        assert!(matches!(
            TreeConfiguration::new(alphabet),
            Err(TreeError::InvalidConfiguration(_))
        ));
    }
}
