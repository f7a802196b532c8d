//! Text input with automatic format detection
//!
//! Reads the text to index from FASTA/FASTQ (gzip transparent) or from a
//! plain file holding the raw sequence, validates it against the alphabet
//! and appends the terminator.

use crate::encoding::Alphabet;
use anyhow::{Context, Result};
use needletail::parse_fastx_file;
use std::path::Path;
use tracing::{info, warn};

/// Read the text stored at `path` and append the alphabet terminator.
///
/// FASTA/FASTQ records are concatenated in file order. Any other file is
/// read as a raw sequence with line breaks and other whitespace dropped.
///
/// # Errors
/// Returns error if:
/// - File cannot be read
/// - The sequence contains a symbol outside the alphabet
/// - The sequence contains the terminator
pub fn read_text<P: AsRef<Path>>(path: P, alphabet: &Alphabet) -> Result<Vec<u8>> {
    let path = path.as_ref();

    let mut text = match read_fastx(path) {
        Ok(text) => text,
        Err(_) => {
            info!("  File is not FASTA/FASTQ, reading it as a plain sequence...");
            read_plain(path)?
        }
    };

    validate_sequence(&text, alphabet)
        .with_context(|| format!("Invalid sequence in {}", path.display()))?;
    text.push(alphabet.terminator());
    Ok(text)
}

/// Concatenate the sequences of every FASTA/FASTQ record
fn read_fastx(path: &Path) -> Result<Vec<u8>> {
    // needletail automatically handles gzip decompression
    let mut reader = parse_fastx_file(path)
        .with_context(|| format!("Failed to open sequence file: {}", path.display()))?;

    let mut text = Vec::new();
    let mut num_records = 0usize;
    while let Some(record) = reader.next() {
        let record = record
            .with_context(|| format!("Failed to parse sequence record in {}", path.display()))?;
        text.extend_from_slice(&record.seq());
        num_records += 1;
    }

    if num_records > 1 {
        warn!(
            "{} records in {} were concatenated; matches may span record boundaries",
            num_records,
            path.display()
        );
    }
    Ok(text)
}

/// Read a raw sequence, skipping whitespace
fn read_plain(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read sequence file: {}", path.display()))?;
    Ok(bytes
        .into_iter()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect())
}

/// Validate that a sequence only holds non-terminator alphabet symbols
///
/// # Errors
/// Returns error naming the first offending symbol and its position
pub fn validate_sequence(seq: &[u8], alphabet: &Alphabet) -> Result<()> {
    for (i, &symbol) in seq.iter().enumerate() {
        if alphabet.encode(symbol).is_err() {
            return Err(anyhow::anyhow!(
                "Invalid symbol '{}' at position {}. Allowed symbols: {}",
                symbol as char,
                i,
                String::from_utf8_lossy(alphabet.symbols())
            ));
        }
        if alphabet.is_terminator(symbol) {
            return Err(anyhow::anyhow!(
                "Terminator '{}' found at position {}; it is appended automatically",
                symbol as char,
                i
            ));
        }
    }
    Ok(())
}
