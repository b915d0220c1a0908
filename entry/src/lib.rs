//! In-process chain behind the `run` subcommand
//!
//! Scans one query file with both sequence tools without spawning
//! a process per step: the motif finder first, then the palindrome
//! counter, each writing its table into the output directory.

use config::{MOTIF_HITS, PALINDROME_TABLE};

use dna_motif::lib_dna_motif;
use dna_palindrome::lib_dna_palindrome;

const KEYS: [&str; 2] = ["--query", "--outdir"];

pub fn lib(args: Vec<String>) {
    __check_args(&args);

    let query = value_of(&args, "--query");
    let outdir = value_of(&args, "--outdir");

    std::fs::create_dir_all(&outdir).expect("ERROR: Failed to create output directory");

    lib_dna_motif(vec![
        "--query".to_string(),
        query.clone(),
        "--output".to_string(),
        format!("{}/{}", outdir, MOTIF_HITS),
    ])
    .expect("ERROR: Failed to scan for motifs");

    lib_dna_palindrome(vec![
        "--query".to_string(),
        query,
        "--output".to_string(),
        format!("{}/{}", outdir, PALINDROME_TABLE),
    ])
    .expect("ERROR: Failed to count palindromes");
}

/// Check if all required arguments are present
///
/// # Arguments
///
/// * `args` - A vector of strings representing the command line arguments
///
/// # Returns
///
/// None
///
/// # Example
///
/// ```rust, no_run
/// use dnatools::lib;
///
/// let args = vec![
///     "--query".to_string(),
///     "seq.fa".to_string(),
///     "--outdir".to_string(),
///     "results".to_string(),
/// ];
///
/// lib(args);
/// ```
fn __check_args(args: &Vec<String>) {
    for key in KEYS.iter() {
        if !args.contains(&key.to_string()) {
            log::error!("Missing required argument: {}", key);
            std::process::exit(1);
        }
    }
}

/// Value following a key in a raw argument vector
fn value_of(args: &[String], key: &str) -> String {
    args.iter()
        .position(|arg| arg == key)
        .and_then(|idx| args.get(idx + 1))
        .cloned()
        .unwrap_or_else(|| {
            log::error!("Missing value for {}", key);
            std::process::exit(1);
        })
}
