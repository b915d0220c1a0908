//! Utility module for dna-exon

use config::CliError;

/// A half-open exon interval on the loaded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExonRange {
    pub start: usize,
    pub stop: usize,
}

/// Parses exon coordinates from the text of a coordinate file.
///
/// Each line holds one `start,stop` pair of zero-based half-open
/// coordinates. Blank lines and lines starting with `#` are
/// skipped. Anything else that does not parse, and any pair with
/// `stop < start`, is an error naming the offending line.
///
/// # Arguments
///
/// * `contents` - Text of the coordinate file
///
/// # Returns
///
/// The parsed ranges, in file order.
pub fn parse_exon_ranges(contents: &str) -> Result<Vec<ExonRange>, CliError> {
    let mut ranges = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let number = idx + 1;
        let (start, stop) = line.split_once(',').ok_or_else(|| {
            let err = format!("Exon line {}: expected 'start,stop', got '{}'", number, line);
            CliError::InvalidInput(err)
        })?;

        let start = parse_coord(start, number)?;
        let stop = parse_coord(stop, number)?;

        if stop < start {
            let err = format!(
                "Exon line {}: stop ({}) precedes start ({})",
                number, stop, start
            );
            return Err(CliError::InvalidInput(err));
        }

        ranges.push(ExonRange { start, stop });
    }

    Ok(ranges)
}

fn parse_coord(field: &str, number: usize) -> Result<usize, CliError> {
    let field = field.trim();

    field.parse::<usize>().map_err(|_| {
        let err = format!("Exon line {}: '{}' is not a coordinate", number, field);
        CliError::InvalidInput(err)
    })
}
