//! Core module for counting reverse-complement palindromes
//!
//! This module contains the main function for scanning a DNA
//! sequence with a moving window and counting, for each window
//! length in a configurable range, the substrings that are equal
//! to their own reverse complement.
//!
//! In short, the query file is read once, the first line is
//! dropped as a header and everything outside A/C/G/T is
//! stripped. Each window length is then scanned independently
//! over the cleaned sequence, in parallel, and the per-length
//! totals are rendered as a two-column table.

pub mod cli;
pub mod core;

use anyhow::Result;

/// Runs the palindrome counter from an in-process argument vector.
pub fn lib_dna_palindrome(args: Vec<String>) -> Result<()> {
    let args = cli::Args::from(args);
    core::count_palindromes(args)
}
