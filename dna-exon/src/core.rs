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

use anyhow::Result;
use config::{load_raw_sequence, read_to_string};
use log::{info, warn};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cli::Args;
use crate::utils::{parse_exon_ranges, ExonRange};

/// Splices exons out of a sequence file and writes the result.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Returns
///
/// Nothing. Writes a single-record FASTA to the output path.
///
/// # Example
///
/// ```rust, no_run
/// use clap::{self, Parser};
/// use dna_exon::cli::Args;
/// use dna_exon::core::splice_exons;
///
/// let args = Args::parse();
/// splice_exons(args).unwrap();
/// ```
pub fn splice_exons(args: Args) -> Result<()> {
    info!("Splicing exons from {:?}...", args.query);

    let seq = load_raw_sequence(&args.query)?;
    let ranges = parse_exon_ranges(&read_to_string(&args.exons)?)?;

    info!(
        "Loaded {} bp of sequence and {} exon(s)",
        seq.len(),
        ranges.len()
    );

    let spliced = splice(&seq, &ranges);

    match spliced.is_empty() {
        true => warn!("WARN: spliced sequence is empty, writing a header-only record"),
        false => info!("Spliced sequence: {}", spliced),
    }

    write_fasta(&args.output, &args.resolved_name(), &spliced)?;
    info!("Wrote {} bp to {:?}", spliced.len(), args.output);

    Ok(())
}

/// Concatenates the exon slices of a sequence in file order.
///
/// A range reaching past the end of the sequence is clipped to the
/// end; a range starting at or beyond the end contributes nothing.
///
/// # Arguments
///
/// * `seq` - Verbatim sequence text
/// * `ranges` - Half-open exon intervals
///
/// # Returns
///
/// The spliced coding sequence.
///
/// # Example
///
/// ```rust
/// use dna_exon::core::splice;
/// use dna_exon::utils::ExonRange;
///
/// let exons = vec![
///     ExonRange { start: 0, stop: 4 },
///     ExonRange { start: 6, stop: 10 },
/// ];
///
/// assert_eq!(splice("ACGTACGTACGT", &exons), "ACGTGTAC");
/// ```
pub fn splice(seq: &str, ranges: &[ExonRange]) -> String {
    let bytes = seq.as_bytes();
    let mut spliced = Vec::new();

    for range in ranges {
        let start = range.start.min(bytes.len());
        let stop = range.stop.min(bytes.len());

        spliced.extend_from_slice(&bytes[start..stop]);
    }

    String::from_utf8_lossy(&spliced).into_owned()
}

/// Writes a single-record FASTA file.
pub fn write_fasta(path: &Path, name: &str, seq: &str) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, ">{}", name)?;
    writeln!(writer, "{}", seq)?;

    Ok(())
}
