//! Core module for splicing exons out of a genomic sequence
//!
//! This module contains the main function for cutting exon
//! intervals out of a genomic DNA sequence and concatenating them
//! into a coding sequence, written out as a single-record FASTA.
//!
//! Coordinates address the sequence as stored in the file, with
//! the header line dropped and line breaks removed; no alphabet
//! cleaning happens, so every offset in the coordinate file means
//! the same base it meant to whoever annotated it. Slices are
//! applied in file order and clipped at the sequence end.

pub mod cli;
pub mod core;
pub mod utils;

use anyhow::Result;

/// Runs the exon splicer from an in-process argument vector.
pub fn lib_dna_exon(args: Vec<String>) -> Result<()> {
    let args = cli::Args::from(args);
    core::splice_exons(args)
}
