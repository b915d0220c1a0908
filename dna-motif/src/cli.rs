//! Command-line interface for dna-motif
//!
//! This module defines the command-line arguments accepted by the
//! motif finder and the validation rules applied to them before
//! any sequence is read.

use clap::Parser;
use config::{ArgCheck, CliError, CTCF_MOTIF, MIN_THREADS};
use regex::Regex;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Locate transcription-factor binding motifs in DNA sequences"
)]
pub struct Args {
    #[arg(
        short = 'q',
        long = "query",
        required = true,
        value_name = "PATH",
        num_args(1..),
        help = "Path(s) to sequence files to scan [.fa, .txt or gzipped versions]"
    )]
    pub query: Vec<PathBuf>,

    #[arg(
        short = 'p',
        long = "pattern",
        value_name = "REGEX",
        default_value = CTCF_MOTIF,
        help = "Motif to search for, as a regular expression"
    )]
    pub pattern: String,

    #[arg(
        short = 'o',
        long = "output",
        required = false,
        value_name = "PATH",
        help = "Write the hit table to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'j',
        long = "json",
        help = "Emit the hit table as JSON",
        value_name = "FLAG",
        default_value = "false"
    )]
    pub json: bool,

    #[arg(
        short = 't',
        long = "threads",
        help = "Number of threads",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,
}

impl Args {
    /// Builds Args from an in-process argument vector.
    ///
    /// Used by the umbrella binary to chain tools without spawning
    /// a new process per step.
    pub fn from(args: Vec<String>) -> Self {
        let mut args = args;
        args.insert(0, env!("CARGO_PKG_NAME").to_string());
        Args::parse_from(args)
    }
}

impl ArgCheck for Args {
    fn check(&self) -> Result<(), CliError> {
        if self.threads < MIN_THREADS {
            let err = format!("Number of threads must be at least {}!", MIN_THREADS);
            return Err(CliError::InvalidInput(err));
        }

        if let Err(e) = Regex::new(&self.pattern) {
            let err = format!("Motif pattern '{}' does not compile: {}", self.pattern, e);
            return Err(CliError::InvalidInput(err));
        }

        self.validate_args()
    }

    fn get_inputs(&self) -> Vec<&PathBuf> {
        self.query.iter().collect()
    }
}
