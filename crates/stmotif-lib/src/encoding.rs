//! Alphabet encoding
//!
//! Maps the symbols of a small fixed alphabet onto dense codes `0..k` and
//! back. The code of a symbol doubles as its slot in every node's child
//! table, so codes must stay dense.
//!
//! Default DNA encoding:
//! - A (65/97)  -> 0
//! - T (84/116) -> 1
//! - G (71/103) -> 2
//! - C (67/99)  -> 3
//! - $ (36)     -> 4 (terminator)

use crate::constants::{DEFAULT_TERMINATOR, DNA_SYMBOLS, MAX_ALPHABET_SIZE};
use thiserror::Error;

/// Marks an unused byte in the encoding table
const NO_CODE: u8 = u8::MAX;

/// Error type for encoding operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The input byte is not part of the alphabet
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(char),
    /// A sequence contained a byte outside the alphabet
    #[error("Invalid symbol {symbol:?} at position {position}")]
    InvalidSymbolAt {
        /// Offending symbol
        symbol: char,
        /// Index of the byte in the input sequence
        position: usize,
    },
    /// The alphabet has no symbols
    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,
    /// The alphabet exceeds the child table width
    #[error("Alphabet too large: at most {max} symbols, got {actual}")]
    AlphabetTooLarge {
        /// Maximum supported size
        max: usize,
        /// Requested size
        actual: usize,
    },
    /// The same symbol was listed twice
    #[error("Duplicate symbol in alphabet: {0:?}")]
    DuplicateSymbol(char),
    /// The terminator is not one of the alphabet symbols
    #[error("Terminator {0:?} is not part of the alphabet")]
    MissingTerminator(char),
}

/// Bidirectional symbol/code mapping for one alphabet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    /// Symbols in code order
    symbols: Vec<u8>,
    /// Byte -> code table, `NO_CODE` for bytes outside the alphabet
    codes: [u8; 256],
    terminator: u8,
}

impl Alphabet {
    /// Create an alphabet from its symbols (in code order) and terminator.
    ///
    /// # Errors
    /// Fails if the symbol list is empty, longer than
    /// [`MAX_ALPHABET_SIZE`], contains duplicates, or does not contain the
    /// terminator.
    pub fn new(symbols: &[u8], terminator: u8) -> Result<Self, EncodingError> {
        if symbols.is_empty() {
            return Err(EncodingError::EmptyAlphabet);
        }
        if symbols.len() > MAX_ALPHABET_SIZE {
            return Err(EncodingError::AlphabetTooLarge {
                max: MAX_ALPHABET_SIZE,
                actual: symbols.len(),
            });
        }

        let mut codes = [NO_CODE; 256];
        for (code, &symbol) in symbols.iter().enumerate() {
            if codes[symbol as usize] != NO_CODE {
                return Err(EncodingError::DuplicateSymbol(symbol as char));
            }
            codes[symbol as usize] = code as u8;
        }
        if codes[terminator as usize] == NO_CODE {
            return Err(EncodingError::MissingTerminator(terminator as char));
        }

        Ok(Self {
            symbols: symbols.to_vec(),
            codes,
            terminator,
        })
    }

    /// The DNA alphabet `A, T, G, C, $`, accepting lowercase bases
    pub fn dna() -> Self {
        Self::new(DNA_SYMBOLS, DEFAULT_TERMINATOR)
            .expect("built-in DNA alphabet is valid")
            .case_insensitive()
    }

    /// Also accept the other ASCII case of every letter symbol.
    ///
    /// Aliases never shadow a symbol that is itself part of the alphabet.
    pub fn case_insensitive(mut self) -> Self {
        for (code, &symbol) in self.symbols.iter().enumerate() {
            let alias = if symbol.is_ascii_uppercase() {
                symbol.to_ascii_lowercase()
            } else {
                symbol.to_ascii_uppercase()
            };
            if alias != symbol && self.codes[alias as usize] == NO_CODE {
                self.codes[alias as usize] = code as u8;
            }
        }
        self
    }

    /// Encode a single symbol to its code
    #[inline]
    pub fn encode(&self, symbol: u8) -> Result<u8, EncodingError> {
        match self.codes[symbol as usize] {
            NO_CODE => Err(EncodingError::InvalidSymbol(symbol as char)),
            code => Ok(code),
        }
    }

    /// Decode a code back to its symbol
    ///
    /// # Panics
    /// Panics if `code` is not below [`len`](Self::len).
    #[inline]
    pub fn decode(&self, code: u8) -> u8 {
        self.symbols[code as usize]
    }

    /// Encode a whole sequence
    ///
    /// # Errors
    /// Returns [`EncodingError::InvalidSymbolAt`] for the first byte outside
    /// the alphabet.
    pub fn encode_sequence(&self, sequence: &[u8]) -> Result<Vec<u8>, EncodingError> {
        sequence
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                self.encode(symbol)
                    .map_err(|_| EncodingError::InvalidSymbolAt {
                        symbol: symbol as char,
                        position,
                    })
            })
            .collect()
    }

    /// Decode a sequence of codes into symbols
    pub fn decode_sequence(&self, codes: &[u8]) -> Vec<u8> {
        codes.iter().map(|&code| self.decode(code)).collect()
    }

    /// Terminator symbol
    #[inline]
    pub fn terminator(&self) -> u8 {
        self.terminator
    }

    /// Code of the terminator symbol
    #[inline]
    pub fn terminator_code(&self) -> u8 {
        self.codes[self.terminator as usize]
    }

    /// Whether `symbol` is the terminator (after case folding)
    #[inline]
    pub fn is_terminator(&self, symbol: u8) -> bool {
        self.codes[symbol as usize] == self.terminator_code()
    }

    /// Symbols in code order
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Number of symbols (terminator included)
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: an alphabet holds at least its terminator
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::dna()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dna_codes() {
        let alphabet = Alphabet::dna();
        assert_eq!(alphabet.encode(b'A').unwrap(), 0);
        assert_eq!(alphabet.encode(b'T').unwrap(), 1);
        assert_eq!(alphabet.encode(b'G').unwrap(), 2);
        assert_eq!(alphabet.encode(b'C').unwrap(), 3);
        assert_eq!(alphabet.encode(b'$').unwrap(), 4);
        assert_eq!(alphabet.terminator_code(), 4);
        assert_eq!(alphabet.len(), 5);

        // Lowercase aliases
        assert_eq!(alphabet.encode(b'a').unwrap(), 0);
        assert_eq!(alphabet.encode(b'c').unwrap(), 3);

        // Invalid symbols
        assert_eq!(alphabet.encode(b'N'), Err(EncodingError::InvalidSymbol('N')));
        assert!(alphabet.encode(b'X').is_err());
        assert!(alphabet.encode(b'0').is_err());
    }

    #[test]
    fn test_decode() {
        let alphabet = Alphabet::dna();
        for &symbol in DNA_SYMBOLS {
            let code = alphabet.encode(symbol).unwrap();
            assert_eq!(alphabet.decode(code), symbol);
        }
        assert_eq!(alphabet.decode(alphabet.encode(b'g').unwrap()), b'G');
    }

    #[test]
    fn test_encode_sequence_reports_position() {
        let alphabet = Alphabet::dna();
        assert_eq!(alphabet.encode_sequence(b"ATgc$").unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(
            alphabet.encode_sequence(b"ATNG"),
            Err(EncodingError::InvalidSymbolAt { symbol: 'N', position: 2 })
        );
        assert_eq!(alphabet.decode_sequence(&[3, 2, 1, 0]), b"CGTA".to_vec());
    }

    #[test]
    fn test_case_sensitive_alphabet() {
        let alphabet = Alphabet::new(b"ab#", b'#').unwrap();
        assert!(alphabet.encode(b'A').is_err());
        let folded = alphabet.case_insensitive();
        assert_eq!(folded.encode(b'B').unwrap(), 1);
        assert!(folded.is_terminator(b'#'));
    }

    #[test]
    fn test_invalid_alphabets() {
        assert_eq!(Alphabet::new(b"", b'$'), Err(EncodingError::EmptyAlphabet));
        assert_eq!(
            Alphabet::new(b"ACGTNRYK$", b'$'),
            Err(EncodingError::AlphabetTooLarge { max: MAX_ALPHABET_SIZE, actual: 9 })
        );
        assert_eq!(Alphabet::new(b"AAC$", b'$'), Err(EncodingError::DuplicateSymbol('A')));
        assert_eq!(Alphabet::new(b"ACGT", b'$'), Err(EncodingError::MissingTerminator('$')));
    }

    #[test]
    fn test_alias_does_not_shadow_symbol() {
        let alphabet = Alphabet::new(b"aA$", b'$').unwrap().case_insensitive();
        assert_eq!(alphabet.encode(b'a').unwrap(), 0);
        assert_eq!(alphabet.encode(b'A').unwrap(), 1);
    }
}
