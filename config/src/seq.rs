//! Sequence primitives shared by the dnatools subcommands
//!
//! A sequence is a plain byte string over the uppercase DNA
//! alphabet. Cleaning is lossy: every byte outside the alphabet
//! is dropped and the surviving fragments are concatenated, so
//! positions in a cleaned sequence do not map back to the raw
//! input. Callers that need verbatim coordinates (e.g. exon
//! splicing) load the raw sequence instead.

use flate2::read::MultiGzDecoder;
use thiserror::Error;

use std::fmt::Debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::fns::CliError;
use crate::DNA_ALPHABET;

/// error handling for sequence transforms
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Invalid base '{0}' in sequence")]
    InvalidBase(char),
}

/// an uppercase DNA sequence held in memory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence(Vec<u8>);

impl Sequence {
    pub fn new(bases: &[u8]) -> Self {
        Sequence(bases.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Uppercase a raw text and drop every byte outside the alphabet
///
/// Non-alphabet runs act as delimiters: the retained fragments are
/// concatenated back together in a single linear pass. The result
/// only holds bytes from `alphabet`; an input with no such bytes
/// yields an empty sequence, which is not an error.
///
/// # Example
///
/// ```rust
/// use config::{clean_sequence, DNA_ALPHABET};
///
/// let seq = clean_sequence("xx atcgNNatcg xx", DNA_ALPHABET);
/// assert_eq!(seq.as_bytes(), b"ATCGATCG");
/// ```
pub fn clean_sequence(raw: &str, alphabet: &[u8]) -> Sequence {
    let bases = raw
        .bytes()
        .map(|b| b.to_ascii_uppercase())
        .filter(|b| alphabet.contains(b))
        .collect::<Vec<u8>>();

    Sequence(bases)
}

/// complement a single uppercase base, A<->T and C<->G
///
/// No case normalization happens here; callers pre-uppercase.
/// Any byte outside the four-letter alphabet is a lookup failure.
#[inline(always)]
pub fn complement(base: u8) -> Result<u8, SequenceError> {
    match base {
        b'A' => Ok(b'T'),
        b'T' => Ok(b'A'),
        b'C' => Ok(b'G'),
        b'G' => Ok(b'C'),
        _ => Err(SequenceError::InvalidBase(base as char)),
    }
}

/// Reverse-complement a sequence of uppercase bases
///
/// The output has the same length as the input and the transform
/// is an involution: applying it twice returns the input. Fails
/// on the first byte outside {A, C, G, T}.
///
/// # Example
///
/// ```rust
/// use config::reverse_complement;
///
/// let rc = reverse_complement(b"ATCG").unwrap();
/// assert_eq!(rc, b"CGAT");
/// ```
pub fn reverse_complement(seq: &[u8]) -> Result<Vec<u8>, SequenceError> {
    let mut out = Vec::with_capacity(seq.len());
    for &base in seq.iter().rev() {
        out.push(complement(base)?);
    }

    Ok(out)
}

/// read a whole file into a string, transparently inflating .gz
pub fn read_to_string<P: AsRef<Path> + Debug>(file: P) -> Result<String, CliError> {
    let path = file.as_ref();
    let handle = File::open(path)?;
    let mut contents = String::new();

    if path.extension().is_some_and(|ext| ext == "gz") {
        let mut decoder = MultiGzDecoder::new(handle);
        decoder.read_to_string(&mut contents)?;
    } else {
        let mut handle = handle;
        handle.read_to_string(&mut contents)?;
    }

    Ok(contents)
}

/// Load a cleaned sequence from a file
///
/// The first line is treated as a header/annotation and discarded;
/// the remainder is uppercased and stripped to the DNA alphabet.
/// Unreadable files fail with an IO error; a file with no alphabet
/// bytes after cleaning loads as an empty sequence.
pub fn load_sequence<P: AsRef<Path> + Debug>(file: P) -> Result<Sequence, CliError> {
    let contents = read_to_string(file)?;
    let body = contents.split_once('\n').map_or("", |(_, rest)| rest);

    Ok(clean_sequence(body, DNA_ALPHABET))
}

/// Load a verbatim sequence from a file
///
/// The first line is discarded as a header and the remaining lines
/// are concatenated with line breaks removed. No alphabet cleaning
/// or case folding happens, so byte offsets into the result are
/// coordinates on the file's own sequence text.
pub fn load_raw_sequence<P: AsRef<Path> + Debug>(file: P) -> Result<String, CliError> {
    let contents = read_to_string(file)?;
    let body = contents.split_once('\n').map_or("", |(_, rest)| rest);

    Ok(body
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .collect::<String>())
}
