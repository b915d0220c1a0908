//! Utility module for dna-motif

use config::{read_to_string, CliError};
use std::fmt::Debug;
use std::path::Path;

/// Loads a sequence for motif scanning.
///
/// Header lines are dropped wherever they appear, the remaining
/// lines are uppercased and concatenated. Ambiguity codes are kept
/// so a pattern can still match across them.
///
/// # Arguments
///
/// * `file` - Path to the sequence file
///
/// # Returns
///
/// The sequence as a single uppercase string.
pub fn load_motif_sequence<P: AsRef<Path> + Debug>(file: P) -> Result<String, CliError> {
    let contents = read_to_string(file)?;

    let seq = contents
        .lines()
        .filter(|line| !line.starts_with('>'))
        .map(|line| line.trim().to_ascii_uppercase())
        .collect::<String>();

    Ok(seq)
}
