//! dnatools: small DNA sequence-analysis tools
//!
//! This is the entry point for the dnatools CLI.
//! It is responsible for parsing the CLI arguments
//! and executing the appropriate subcommand [dna-tool].
//!
//! This wrapper offers 5 different subcommands:
//! - dna-palindrome
//! - dna-motif
//! - dna-exon
//! - dna-mutect
//! - run
//!
//! Each subcommand/submodule offers a different functionality:
//! counting reverse-complement palindromic windows, locating
//! binding motifs, splicing exons into a coding sequence, and
//! running the Mutect2 somatic variant-calling workflow. The
//! `run` subcommand chains the two sequence scanners in-process
//! over a single query file. A shared hidden crate, 'config',
//! holds the universal constants and sequence primitives.
//!
//! To get help on the subcommands, you can run:
//!
//! ```shell
//! dnatools dna-palindrome -- --help
//! ```

use clap::{Args, Parser, Subcommand};
use dnatools::lib;
use log::{error, info, Level};
use simple_logger::init_with_level;

use std::process::Command;

const ENTRY: &str = env!("CARGO_MANIFEST_DIR");
const RELEASES: &str = "target/release";

const HELP: &str = r#"
Usage: dnatools run --query <PATH> --outdir <DIR>

 Options:
  --query <PATH>              Path to sequence file to scan [.fa, .txt or gzipped versions]
  --outdir <DIR>              Output directory for the motif and palindrome tables
  -h, --help                  Print help
"#;

#[derive(Parser)]
#[command(name = "dnatools")]
#[command(about = "dnatools: small DNA sequence-analysis tools")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "dna-palindrome")]
    Palindrome(DnaArgs),
    #[command(name = "dna-motif")]
    Motif(DnaArgs),
    #[command(name = "dna-exon")]
    Exon(DnaArgs),
    #[command(name = "dna-mutect")]
    Mutect(DnaArgs),
    #[command(name = "run")]
    Run(DnaArgs),
}

#[derive(Args)]
struct DnaArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, help = HELP)]
    args: Vec<String>,
}

fn main() {
    init_with_level(Level::Info).unwrap();
    let cli = Cli::parse();

    init();

    let (cmd, args) = match cli.command {
        Commands::Palindrome(args) => ("dna-palindrome", args.args),
        Commands::Motif(args) => ("dna-motif", args.args),
        Commands::Exon(args) => ("dna-exon", args.args),
        Commands::Mutect(args) => ("dna-mutect", args.args),
        Commands::Run(args) => ("run", args.args),
    };

    match cmd {
        "run" => lib(args),
        _ => {
            let package = std::path::Path::new(ENTRY)
                .parent()
                .expect("ERROR: Could not get parent dir")
                .join(RELEASES)
                .join(cmd);

            if args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
                let output = Command::new(package)
                    .arg("--help")
                    .output()
                    .expect("ERROR: Failed to execute process");

                check_output(output);
            } else {
                let output = Command::new(package)
                    .args(args)
                    .output()
                    .expect("ERROR: Failed to execute process");

                check_output(output);
            }
        }
    }
}

fn check_output(output: std::process::Output) {
    if output.status.success() {
        info!("{}", String::from_utf8_lossy(&output.stdout));
    } else {
        error!("{}", String::from_utf8_lossy(&output.stderr));
        std::process::exit(1);
    }
}

fn init() {
    let message = format!(
        r#"

        dnatools: small DNA sequence-analysis tools

        this is the entry point for the dnatools CLI
        and it is responsible for parsing the CLI arguments
        for each dna-tool:

        - dna-palindrome
        - dna-motif
        - dna-exon
        - dna-mutect

        > version: {}

        * to get help on the subcommands, run:
            dnatools <SUBCOMMAND> -- --help

        "#,
        env!("CARGO_PKG_VERSION")
    );

    println!("{}", message);
}
