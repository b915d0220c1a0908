//! Core module for counting reverse-complement palindromes
//!
//! This module contains the main function for scanning a DNA
//! sequence with a moving window and counting, for each window
//! length in a configurable range, the substrings that are equal
//! to their own reverse complement.

use clap::{self, Parser};
use config::ArgCheck;
use log::{error, info, Level};
use simple_logger::init_with_level;

use dna_palindrome::cli::Args;
use dna_palindrome::core::count_palindromes;

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();
    args.check().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .unwrap();

    count_palindromes(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:?}", elapsed);
}
