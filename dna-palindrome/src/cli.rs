//! Command-line interface for dna-palindrome
//!
//! This module defines the command-line arguments accepted by the
//! palindrome counter and the validation rules applied to them
//! before any sequence is read.

use clap::Parser;
use config::{ArgCheck, CliError, MAX_WINDOW, MIN_THREADS, MIN_WINDOW};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Count reverse-complement palindromic windows in a DNA sequence"
)]
pub struct Args {
    #[arg(
        short = 'q',
        long = "query",
        required = true,
        value_name = "PATH",
        help = "Path to sequence file [.fa, .txt or gzipped versions]"
    )]
    pub query: PathBuf,

    #[arg(
        short = 'm',
        long = "min-window",
        value_name = "SIZE",
        default_value_t = MIN_WINDOW,
        help = "Smallest window length to scan"
    )]
    pub min_window: usize,

    #[arg(
        short = 'M',
        long = "max-window",
        value_name = "SIZE",
        default_value_t = MAX_WINDOW,
        help = "Largest window length to scan"
    )]
    pub max_window: usize,

    #[arg(
        short = 'd',
        long = "drop-tails",
        help = "Skip windows truncated by the end of the sequence instead of counting them",
        value_name = "FLAG",
        default_value = "false"
    )]
    pub drop_tails: bool,

    #[arg(
        short = 'o',
        long = "output",
        required = false,
        value_name = "PATH",
        help = "Write the window table to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'j',
        long = "json",
        help = "Emit the window table as JSON",
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

        if self.min_window < 1 {
            let err = "Minimum window length must be at least 1!".to_string();
            return Err(CliError::InvalidInput(err));
        }

        if self.min_window > self.max_window {
            let err = format!(
                "Minimum window length ({}) exceeds maximum window length ({})!",
                self.min_window, self.max_window
            );
            return Err(CliError::InvalidInput(err));
        }

        self.validate_args()
    }

    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.query]
    }
}
