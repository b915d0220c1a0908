//! Command-line interface for dna-exon
//!
//! This module defines the command-line arguments accepted by the
//! exon splicer and the validation rules applied to them before
//! any sequence is read.

use clap::Parser;
use config::{ArgCheck, SPLICED_FASTA};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Splice exon intervals out of a genomic sequence into a coding sequence"
)]
pub struct Args {
    #[arg(
        short = 'q',
        long = "query",
        required = true,
        value_name = "PATH",
        help = "Path to genomic sequence file [.fa, .txt or gzipped versions]"
    )]
    pub query: PathBuf,

    #[arg(
        short = 'e',
        long = "exons",
        required = true,
        value_name = "PATH",
        help = "Path to exon coordinate file, one 'start,stop' pair per line"
    )]
    pub exons: PathBuf,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = SPLICED_FASTA,
        help = "Path to the spliced FASTA record"
    )]
    pub output: PathBuf,

    #[arg(
        short = 'n',
        long = "name",
        required = false,
        value_name = "NAME",
        help = "Record name for the FASTA header [default: output file stem]"
    )]
    pub name: Option<String>,
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

    /// Record name to write, falling back to the output file stem.
    pub fn resolved_name(&self) -> String {
        match self.name {
            Some(ref name) => name.clone(),
            None => self
                .output
                .file_stem()
                .map_or_else(|| "spliced".to_string(), |stem| stem.to_string_lossy().to_string()),
        }
    }
}

impl ArgCheck for Args {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.query, &self.exons]
    }
}
