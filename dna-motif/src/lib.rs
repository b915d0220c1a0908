//! Core module for locating binding motifs
//!
//! This module contains the main function for scanning one or more
//! DNA sequences for a motif given as a regular expression. The
//! default pattern describes the CTCF binding site, two fixed CC/AG
//! anchors and a GG tail with degenerate positions in between.
//!
//! Each query file is scanned independently, in parallel. Matches
//! are reported per file with their half-open coordinates on the
//! concatenated sequence, alongside the matched substring.

pub mod cli;
pub mod core;
pub mod utils;

use anyhow::Result;

/// Runs the motif finder from an in-process argument vector.
pub fn lib_dna_motif(args: Vec<String>) -> Result<()> {
    let args = cli::Args::from(args);
    core::identify_motifs(args)
}
