//! Core module for locating binding motifs
//!
//! This module contains the main function for scanning one or more
//! DNA sequences for a motif given as a regular expression. The
//! default pattern describes the CTCF binding site, two fixed CC/AG
//! anchors and a GG tail with degenerate positions in between.
//!
//! Each query file is scanned independently, in parallel. Matches
//! are reported per file with their half-open coordinates on the
//! concatenated sequence, alongside the matched substring.

use anyhow::Result;
use config::{get_progress_bar, write_collection};
use dashmap::DashMap;
use log::info;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::cli::Args;
use crate::utils::load_motif_sequence;

/// A single motif match inside one sequence.
///
/// Coordinates are zero-based and half-open, so `end - start` is
/// always the length of the matched substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MotifHit {
    pub start: usize,
    pub end: usize,
    pub seq: String,
}

/// Scans every query file for a motif and reports the hits.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Returns
///
/// Nothing. Writes the hit table to stdout or to the path given
/// with `--output`.
///
/// # Example
///
/// ```rust, no_run
/// use clap::{self, Parser};
/// use dna_motif::cli::Args;
/// use dna_motif::core::identify_motifs;
///
/// let args = Args::parse();
/// identify_motifs(args).unwrap();
/// ```
pub fn identify_motifs(args: Args) -> Result<()> {
    let motif = Regex::new(&args.pattern)?;
    info!(
        "Scanning {} file(s) for motif {}...",
        args.query.len(),
        motif.as_str()
    );

    let hits = scan_files(&args.query, &motif)?
        .into_iter()
        .collect::<BTreeMap<String, Vec<MotifHit>>>();

    let total = hits.values().map(|matches| matches.len()).sum::<usize>();
    info!("Found {} match(es) across {} file(s)", total, hits.len());

    let rendered = match args.json {
        true => serde_json::to_string_pretty(&hits)?,
        false => format_table(&hits),
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

/// Scans a set of files in parallel, accumulating hits per file.
pub fn scan_files(files: &[PathBuf], motif: &Regex) -> Result<DashMap<String, Vec<MotifHit>>> {
    let pb = get_progress_bar(files.len() as u64, "Scanning sequences...");
    let hits = DashMap::new();

    files.par_iter().try_for_each(|file| -> Result<()> {
        let seq = load_motif_sequence(file)?;
        let matches = find_motifs(&seq, motif);

        match matches.is_empty() {
            true => info!("{}: motif not found", file.display()),
            false => info!("{}: motif found {} time(s)", file.display(), matches.len()),
        }

        hits.insert(file.display().to_string(), matches);
        pb.inc(1);

        Ok(())
    })?;

    pb.finish_and_clear();

    Ok(hits)
}

/// Finds every non-overlapping match of a motif in a sequence.
///
/// Scanning resumes after the end of each match, so two hits never
/// share a base. Hits come back in ascending start order.
///
/// # Arguments
///
/// * `seq` - Uppercase sequence to scan
/// * `motif` - Compiled motif pattern
///
/// # Returns
///
/// One `MotifHit` per match.
///
/// # Example
///
/// ```rust
/// use dna_motif::core::find_motifs;
/// use regex::Regex;
///
/// let motif = Regex::new("CC...AG..GG").unwrap();
/// let hits = find_motifs("CCAAAAGTTGG", &motif);
///
/// assert_eq!(hits[0].start, 0);
/// assert_eq!(hits[0].end, 11);
/// ```
pub fn find_motifs(seq: &str, motif: &Regex) -> Vec<MotifHit> {
    motif
        .find_iter(seq)
        .map(|m| MotifHit {
            start: m.start(),
            end: m.end(),
            seq: m.as_str().to_string(),
        })
        .collect()
}

/// Renders motif hits as a tab-separated table with a header row.
pub fn format_table(hits: &BTreeMap<String, Vec<MotifHit>>) -> String {
    let mut table = String::from("File\tStart\tEnd\tMatch");

    for (file, matches) in hits {
        for hit in matches {
            table.push_str(&format!(
                "\n{}\t{}\t{}\t{}",
                file, hit.start, hit.end, hit.seq
            ));
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::CTCF_MOTIF;
    use std::io::Write;

    fn ctcf() -> Regex {
        Regex::new(CTCF_MOTIF).unwrap()
    }

    #[test]
    fn default_motif_is_found() {
        let hits = find_motifs("CCAAAAGTTGG", &ctcf());

        assert_eq!(
            hits,
            vec![MotifHit {
                start: 0,
                end: 11,
                seq: "CCAAAAGTTGG".to_string()
            }]
        );
    }

    #[test]
    fn hit_coordinates_follow_the_prefix() {
        let hits = find_motifs("TTTTCCAAAAGTTGG", &ctcf());

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start, 4);
        assert_eq!(hits[0].end, 15);
    }

    #[test]
    fn every_occurrence_is_reported_at_its_own_position() {
        let hits = find_motifs("CCAAAAGTTGGTTTTCCTTTAGAAGG", &ctcf());

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].start, 0);
        assert_eq!(hits[1].start, 15);
        assert_eq!(hits[1].seq, "CCTTTAGAAGG");
    }

    #[test]
    fn matches_never_overlap() {
        let motif = Regex::new("AA").unwrap();
        let hits = find_motifs("AAAA", &motif);

        assert_eq!(hits.len(), 2);
        assert_eq!((hits[0].start, hits[0].end), (0, 2));
        assert_eq!((hits[1].start, hits[1].end), (2, 4));
    }

    #[test]
    fn motif_free_sequence_yields_no_hits() {
        assert!(find_motifs("ACGTACGTACGT", &ctcf()).is_empty());
        assert!(find_motifs("", &ctcf()).is_empty());
    }

    #[test]
    fn table_has_header_and_one_row_per_hit() {
        let mut hits = BTreeMap::new();
        hits.insert(
            "a.fa".to_string(),
            vec![MotifHit {
                start: 0,
                end: 11,
                seq: "CCAAAAGTTGG".to_string(),
            }],
        );
        hits.insert("b.fa".to_string(), vec![]);

        assert_eq!(
            format_table(&hits),
            "File\tStart\tEnd\tMatch\na.fa\t0\t11\tCCAAAAGTTGG"
        );
    }

    #[test]
    fn scans_files_end_to_end() {
        let mut with_hit = tempfile::NamedTempFile::new().unwrap();
        writeln!(with_hit, ">query").unwrap();
        writeln!(with_hit, "ttttccaaaagttgg").unwrap();

        let mut without_hit = tempfile::NamedTempFile::new().unwrap();
        writeln!(without_hit, ">query").unwrap();
        writeln!(without_hit, "acgtacgt").unwrap();

        let files = vec![
            with_hit.path().to_path_buf(),
            without_hit.path().to_path_buf(),
        ];

        let hits = scan_files(&files, &ctcf()).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(
            hits.get(&with_hit.path().display().to_string()).unwrap().len(),
            1
        );
        assert!(hits
            .get(&without_hit.path().display().to_string())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn writes_hit_table_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">query").unwrap();
        writeln!(file, "ccaaaagttgg").unwrap();

        let out = tempfile::NamedTempFile::new().unwrap();

        let args = Args {
            query: vec![file.path().to_path_buf()],
            pattern: CTCF_MOTIF.to_string(),
            output: Some(out.path().to_path_buf()),
            json: false,
            threads: 1,
        };

        assert!(identify_motifs(args).is_ok());

        let written = std::fs::read_to_string(out.path()).unwrap();
        assert!(written.starts_with("File\tStart\tEnd\tMatch"));
        assert!(written.contains("CCAAAAGTTGG"));
    }
}
