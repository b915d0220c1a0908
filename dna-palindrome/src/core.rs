//! Core module for counting reverse-complement palindromes
//!
//! This module contains the main function for scanning a DNA
//! sequence with a moving window and counting, for each window
//! length in a configurable range, the substrings that are equal
//! to their own reverse complement.
//!
//! In short, the query file is read once, the first line is
//! dropped as a header and everything outside A/C/G/T is
//! stripped. Each window length is then scanned independently
//! over the cleaned sequence, in parallel, and the per-length
//! totals are rendered as a two-column table.

use anyhow::Result;
use config::{
    get_progress_bar, load_sequence, reverse_complement, write_collection, Sequence, SequenceError,
};
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::cli::Args;

/// Number of palindromic windows observed for a single window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowResult {
    pub window: usize,
    pub count: usize,
}

/// Counts reverse-complement palindromic windows in a sequence file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Returns
///
/// Nothing. Writes the window table to stdout or to the path given
/// with `--output`.
///
/// # Example
///
/// ```rust, no_run
/// use clap::{self, Parser};
/// use dna_palindrome::cli::Args;
/// use dna_palindrome::core::count_palindromes;
///
/// let args = Args::parse();
/// count_palindromes(args).unwrap();
/// ```
pub fn count_palindromes(args: Args) -> Result<()> {
    info!("Scanning {:?} for reverse-complement palindromes...", args.query);

    let seq = load_sequence(&args.query)?;

    if seq.is_empty() {
        warn!("WARN: no A/C/G/T residues left after cleaning, all counts will be zero");
    } else {
        info!("Cleaned sequence length: {} bp", seq.len());
    }

    let results = scan_windows(&seq, args.min_window, args.max_window, args.drop_tails)?;

    let rendered = match args.json {
        true => serde_json::to_string_pretty(&results)?,
        false => format_table(&results),
    };

    match args.output {
        Some(ref path) => {
            let lines = rendered.lines().map(|line| line.to_string()).collect();
            write_collection(&lines, &path.display().to_string());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Scans a cleaned sequence with every window length in a range.
///
/// Window lengths are scanned in parallel and the resulting table
/// is sorted by window length before being returned, so the output
/// order never depends on the scheduling of the worker threads.
///
/// # Arguments
///
/// * `seq` - Cleaned sequence to scan
/// * `min_window` - Smallest window length, inclusive
/// * `max_window` - Largest window length, inclusive
/// * `drop_tails` - Skip windows truncated by the end of the sequence
///
/// # Returns
///
/// One `WindowResult` per window length, in ascending order.
///
/// # Example
///
/// ```rust
/// use config::Sequence;
/// use dna_palindrome::core::scan_windows;
///
/// let seq = Sequence::new(b"GAATTC");
/// let results = scan_windows(&seq, 6, 6, false).unwrap();
///
/// assert_eq!(results[0].count, 1);
/// ```
pub fn scan_windows(
    seq: &Sequence,
    min_window: usize,
    max_window: usize,
    drop_tails: bool,
) -> Result<Vec<WindowResult>, SequenceError> {
    let pb = get_progress_bar((max_window - min_window + 1) as u64, "Scanning windows...");

    let mut results = (min_window..=max_window)
        .into_par_iter()
        .map(|window| {
            let count = count_window(seq.as_bytes(), window, drop_tails)?;
            pb.inc(1);

            Ok(WindowResult { window, count })
        })
        .collect::<Result<Vec<WindowResult>, SequenceError>>()?;

    results.sort_unstable_by_key(|result| result.window);

    pb.finish_and_clear();

    Ok(results)
}

/// Counts the palindromic windows of one length over a sequence.
///
/// Every start position is visited; a window reaching past the end
/// of the sequence is clipped to the remaining suffix, so the last
/// positions contribute shorter slices. With `drop_tails` the scan
/// stops at the first truncated window instead.
fn count_window(seq: &[u8], window: usize, drop_tails: bool) -> Result<usize, SequenceError> {
    let mut count = 0;

    for start in 0..seq.len() {
        let end = (start + window).min(seq.len());

        if drop_tails && end - start < window {
            break;
        }

        let slice = &seq[start..end];
        if reverse_complement(slice)?.as_slice() == slice {
            count += 1;
        }
    }

    Ok(count)
}

/// Renders window results as a tab-separated table with a header row.
pub fn format_table(results: &[WindowResult]) -> String {
    let mut table = String::from("Window\tCount");

    for result in results {
        table.push_str(&format!("\n{}\t{}", result.window, result.count));
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn full_length_palindrome_is_counted() {
        let seq = Sequence::new(b"GAATTC");
        let results = scan_windows(&seq, 6, 6, false).unwrap();

        assert_eq!(results, vec![WindowResult { window: 6, count: 1 }]);
    }

    #[test]
    fn truncated_tail_windows_are_counted() {
        // starts 0..=3 yield one full palindromic window ("TCGA" at 1);
        // start 4 clips to "AT", itself a palindrome
        let seq = Sequence::new(b"ATCGAT");
        let results = scan_windows(&seq, 4, 4, false).unwrap();

        assert_eq!(results[0].count, 2);
    }

    #[test]
    fn drop_tails_skips_truncated_windows() {
        let seq = Sequence::new(b"ATCGAT");
        let results = scan_windows(&seq, 4, 4, true).unwrap();

        assert_eq!(results[0].count, 1);
    }

    #[test]
    fn empty_sequence_yields_zero_for_every_window() {
        let seq = Sequence::new(b"");
        let results = scan_windows(&seq, 6, 20, false).unwrap();

        assert_eq!(results.len(), 15);
        assert!(results.iter().all(|result| result.count == 0));
    }

    #[test]
    fn one_result_per_window_in_ascending_order() {
        let seq = Sequence::new(b"ACGTACGTACGTACGTACGTACGT");
        let results = scan_windows(&seq, 6, 20, false).unwrap();

        assert_eq!(results.len(), 15);
        assert_eq!(
            results.iter().map(|result| result.window).collect::<Vec<_>>(),
            (6..=20).collect::<Vec<_>>()
        );
    }

    #[test]
    fn homopolymer_has_no_palindromes() {
        let seq = Sequence::new(b"AAAAAAAAAA");
        let results = scan_windows(&seq, 2, 6, false).unwrap();

        assert!(results.iter().all(|result| result.count == 0));
    }

    #[test]
    fn invalid_base_aborts_the_scan() {
        let seq = Sequence::new(b"ACGNACGT");
        let result = scan_windows(&seq, 2, 4, false);

        assert_eq!(result, Err(SequenceError::InvalidBase('N')));
    }

    #[test]
    fn table_has_header_and_one_row_per_window() {
        let results = vec![
            WindowResult { window: 6, count: 3 },
            WindowResult { window: 7, count: 0 },
        ];

        assert_eq!(format_table(&results), "Window\tCount\n6\t3\n7\t0");
    }

    #[test]
    fn counts_palindromes_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">query test sequence").unwrap();
        writeln!(file, "gaattcNNaaaaNNgaattc").unwrap();

        let args = Args {
            query: file.path().to_path_buf(),
            min_window: 6,
            max_window: 6,
            drop_tails: true,
            output: None,
            json: false,
            threads: 1,
        };

        // cleaned sequence is GAATTCAAAAGAATTC, holding two EcoRI sites
        let seq = load_sequence(file.path()).unwrap();
        assert_eq!(scan_windows(&seq, 6, 6, true).unwrap()[0].count, 2);

        assert!(count_palindromes(args).is_ok());
    }

    #[test]
    fn json_rendering_is_accepted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">query").unwrap();
        writeln!(file, "acgtacgt").unwrap();

        let out = tempfile::NamedTempFile::new().unwrap();

        let args = Args {
            query: file.path().to_path_buf(),
            min_window: 2,
            max_window: 4,
            drop_tails: false,
            output: Some(out.path().to_path_buf()),
            json: true,
            threads: 1,
        };

        assert!(count_palindromes(args).is_ok());

        let written = std::fs::read_to_string(out.path()).unwrap();
        assert!(written.contains("\"window\": 2"));
    }
}
