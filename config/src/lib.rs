//! Shared layer for the dnatools workspace
//!
//! This crate holds the universal constants used across the
//! dnatools subcommands, the sequence primitives every tool
//! builds on (cleaning, complementing, loading), and the small
//! CLI/IO helpers (argument validation, progress bars, writers)
//! that keep the tool crates thin.

pub mod fns;
pub mod seq;

pub use fns::*;
pub use seq::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// numeric values
pub const MIN_THREADS: usize = 1;
pub const MIN_WINDOW: usize = 6;
pub const MAX_WINDOW: usize = 20;
pub const WORKFLOW_JOBS: usize = 2;

// alphabet
pub const DNA_ALPHABET: &[u8] = b"ACGT";

// motifs
pub const CTCF_MOTIF: &str = "CC...AG..GG";

// file names
pub const PALINDROME_TABLE: &str = "palindromes.tsv";
pub const MOTIF_HITS: &str = "motif_hits.tsv";
pub const SPLICED_FASTA: &str = "spliced.fa";

// variant-calling workflow suffixes; dependent steps locate
// their inputs through these conventions
pub const BAM_SUFFIX: &str = "_WEX.bam";
pub const SAMPLENAME_SUFFIX: &str = "_samplename.txt";
pub const MUTECT_VCF_SUFFIX: &str = "_mutect2.vcf.gz";
pub const MUTECT_BAM_SUFFIX: &str = "_mutect2.bam";
pub const FILTERED_SUFFIX: &str = "_filtercalls.vcf.gz";
pub const ARTIFACT_SUFFIX: &str = "_artifacts";
pub const PRE_ADAPTER_SUFFIX: &str = "_artifacts.pre_adapter_detail_metrics";
pub const OXOG_SUFFIX: &str = "_oxog_filtered.vcf.gz";
pub const TUMOR_TAG: &str = "_T";
pub const NORMAL_TAG: &str = "_N";

// java
pub const DEFAULT_HEAP: &str = "8g";
