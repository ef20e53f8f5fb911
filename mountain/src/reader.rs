use log::{debug, trace};
use std::fs;
use std::path::Path;

use crate::error::MountainError;
use crate::grid::{Mountain, ThroughputMatrix};
use crate::size::WorkingSetSize;
use crate::stride::StrideSequence;
use crate::Result;

/// # File reader
/// Reads the whole file at `path` and parses it with [`parse`].
///
/// * `path` - Location of the benchmark output
/// * `strides` - Strides the benchmark was run with, one per throughput column
pub fn read<P: AsRef<Path>>(path: P, strides: &StrideSequence) -> Result<Mountain> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MountainError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    parse(&text, strides)
}

/// Parses benchmark output already held in memory.
///
/// The first line is a header and is skipped no matter what it contains. Blank lines are
/// ignored. Every other line must start with a working set size followed by exactly one
/// throughput value per stride.
pub fn parse(text: &str, strides: &StrideSequence) -> Result<Mountain> {
    let mut sizes = Vec::new();
    let mut rows = Vec::new();

    for (index, line) in text.lines().enumerate().skip(1) {
        let line_number = index + 1;
        let mut tokens = line.split_whitespace();
        let size_token = match tokens.next() {
            Some(token) => token,
            None => continue,
        };

        let size = size_token
            .parse::<WorkingSetSize>()
            .map_err(|_| MountainError::InvalidSize {
                line: line_number,
                token: size_token.to_string(),
            })?;

        let row = tokens
            .map(|token| parse_throughput(token, line_number))
            .collect::<Result<Vec<f64>>>()?;

        if row.len() != strides.len() {
            return Err(MountainError::RowLength {
                line: line_number,
                expected: strides.len(),
                found: row.len(),
            });
        }

        trace!("Line {line_number}: {size} -> {row:?}");
        sizes.push(size);
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(MountainError::NoData);
    }
    debug!(
        "Parsed {} working set sizes with {} strides each",
        rows.len(),
        strides.len()
    );

    let matrix = ThroughputMatrix::from_rows(rows)?;
    Mountain::new(strides.clone(), sizes, matrix)
}

/// Throughput must be a plain, finite and non-negative decimal number
fn parse_throughput(token: &str, line: usize) -> Result<f64> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(MountainError::InvalidThroughput {
            line,
            token: token.to_string(),
        }),
    }
}
