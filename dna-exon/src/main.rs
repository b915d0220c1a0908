//! Core module for splicing exons out of a genomic sequence
//!
//! This module contains the main function for cutting exon
//! intervals out of a genomic DNA sequence and concatenating them
//! into a coding sequence, written out as a single-record FASTA.

use clap::{self, Parser};
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use dna_exon::cli::Args;
use dna_exon::core::splice_exons;

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();
    args.check().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    splice_exons(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:?}", elapsed);
}
