//! Command-line interface for dna-mutect
//!
//! This module defines the command-line arguments accepted by the
//! workflow runner. The jar, reference and germline-resource paths
//! are required arguments, validated before any planning happens.

use clap::Parser;
use config::{ArgCheck, CliError, DEFAULT_HEAP, WORKFLOW_JOBS};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Run the Mutect2 somatic variant-calling workflow over tumor/normal pairs"
)]
pub struct Args {
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "PATH",
        default_value = ".",
        help = "Directory holding the *_WEX.bam files"
    )]
    pub dir: PathBuf,

    #[arg(
        short = 'g',
        long = "gatk",
        required = true,
        value_name = "PATH",
        help = "Path to the GATK local jar"
    )]
    pub gatk: PathBuf,

    #[arg(
        short = 'r',
        long = "reference",
        required = true,
        value_name = "PATH",
        help = "Path to the reference genome FASTA"
    )]
    pub reference: PathBuf,

    #[arg(
        short = 'l',
        long = "germline",
        required = true,
        value_name = "PATH",
        help = "Path to the germline resource VCF"
    )]
    pub germline: PathBuf,

    #[arg(
        short = 'm',
        long = "memory",
        value_name = "HEAP",
        default_value = DEFAULT_HEAP,
        help = "Java heap size passed to every tool as -Xmx"
    )]
    pub memory: String,

    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "JOBS",
        default_value_t = WORKFLOW_JOBS,
        help = "Maximum concurrent task instances within a step"
    )]
    pub jobs: usize,

    #[arg(
        short = 'n',
        long = "dry-run",
        help = "Print the planned commands without executing anything",
        value_name = "FLAG",
        default_value = "false"
    )]
    pub dry_run: bool,
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
        if self.jobs < 1 {
            let err = "Job count must be at least 1!".to_string();
            return Err(CliError::InvalidInput(err));
        }

        if !self.dir.is_dir() {
            let err = format!("{:?} is not a directory", self.dir);
            return Err(CliError::InvalidInput(err));
        }

        self.validate_args()
    }

    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.gatk, &self.reference, &self.germline]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: PathBuf) -> Args {
        Args {
            dir,
            gatk: PathBuf::from("gatk.jar"),
            reference: PathBuf::from("grch37.fa"),
            germline: PathBuf::from("germline.vcf.gz"),
            memory: "8g".to_string(),
            jobs: 2,
            dry_run: false,
        }
    }

    #[test]
    fn zero_jobs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path().to_path_buf());
        args.jobs = 0;

        assert!(args.check().is_err());
    }

    #[test]
    fn missing_working_directory_is_rejected() {
        let args = args(PathBuf::from("/definitely/not/here"));

        assert!(args.check().is_err());
    }
}
