//! Utility module for dna-mutect
//!
//! Filename conventions carry the dataflow of the workflow: every
//! step derives its output names from its input names by swapping
//! a suffix, and the Mutect2 step pairs tumor and normal bams by
//! their shared sample prefix. The helpers here implement those
//! conventions.

use anyhow::{bail, Result};
use config::{BAM_SUFFIX, NORMAL_TAG, TUMOR_TAG};
use hashbrown::HashMap;
use log::warn;

use std::path::{Path, PathBuf};

/// A tumor/normal bam pair sharing a sample prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    pub sample: String,
    pub tumor: PathBuf,
    pub normal: PathBuf,
}

/// Rewrites a filename suffix, keeping the rest of the path.
///
/// Returns `None` when the filename does not end with `from`.
///
/// # Example
///
/// ```rust
/// use dna_mutect::utils::swap_suffix;
/// use std::path::{Path, PathBuf};
///
/// let bam = Path::new("/data/s1_T_WEX.bam");
/// let txt = swap_suffix(bam, "_WEX.bam", "_samplename.txt");
///
/// assert_eq!(txt, Some(PathBuf::from("/data/s1_T_samplename.txt")));
/// ```
pub fn swap_suffix(path: &Path, from: &str, to: &str) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(from)?;

    Some(path.with_file_name(format!("{}{}", stem, to)))
}

/// Reads a sample name from the first line of a sample-name file.
///
/// The files are written by the GetSampleName step, so they may
/// not exist before that step has run; callers resolve names at
/// execution time, not at planning time.
pub fn read_sample_name(path: &Path) -> Result<String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => bail!("Cannot read sample name file {:?}: {}", path, e),
    };

    let name = contents.lines().next().unwrap_or("").trim().to_string();
    if name.is_empty() {
        bail!("Sample name file {:?} is empty", path);
    }

    Ok(name)
}

/// Finds the `*_WEX.bam` files in a directory, sorted by name.
pub fn discover_bams(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut bams = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        if path.is_file() && name.ends_with(BAM_SUFFIX) {
            bams.push(path);
        }
    }

    bams.sort_unstable();

    Ok(bams)
}

/// Collates bams into tumor/normal pairs by their sample prefix.
///
/// A bam named `<sample>_T_WEX.bam` is the tumor half of
/// `<sample>`, `<sample>_N_WEX.bam` the normal half. Bams without
/// either tag are left out of pairing with a warning (they still
/// get a sample-name file). A tagged bam whose partner is missing
/// is a planning error.
///
/// # Arguments
///
/// * `bams` - Candidate bam paths
///
/// # Returns
///
/// The pairs, sorted by sample prefix.
pub fn pair_samples(bams: &[PathBuf]) -> Result<Vec<SamplePair>> {
    let mut halves: HashMap<String, (Option<PathBuf>, Option<PathBuf>)> = HashMap::new();

    for bam in bams {
        let name = bam
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        let stem = match name.strip_suffix(BAM_SUFFIX) {
            Some(stem) => stem,
            None => continue,
        };

        if let Some(sample) = stem.strip_suffix(TUMOR_TAG) {
            halves.entry(sample.to_string()).or_default().0 = Some(bam.clone());
        } else if let Some(sample) = stem.strip_suffix(NORMAL_TAG) {
            halves.entry(sample.to_string()).or_default().1 = Some(bam.clone());
        } else {
            warn!("WARN: {:?} has no _T/_N tag, leaving it unpaired", bam);
        }
    }

    let mut halves = halves.into_iter().collect::<Vec<_>>();
    halves.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut pairs = Vec::with_capacity(halves.len());
    for (sample, (tumor, normal)) in halves {
        match (tumor, normal) {
            (Some(tumor), Some(normal)) => pairs.push(SamplePair {
                sample,
                tumor,
                normal,
            }),
            (Some(_), None) => bail!("Sample {} has a tumor bam but no normal partner", sample),
            (None, _) => bail!("Sample {} has a normal bam but no tumor partner", sample),
        }
    }

    Ok(pairs)
}
