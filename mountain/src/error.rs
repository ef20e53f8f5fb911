use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a memory mountain
#[derive(Error, Debug)]
pub enum MountainError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: invalid working set size '{token}'")]
    InvalidSize { line: usize, token: String },

    #[error("Line {line}: invalid throughput '{token}'")]
    InvalidThroughput { line: usize, token: String },

    #[error("Line {line}: expected {expected} throughput values (one per stride), found {found}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Raised when building a matrix directly from rows, `row` is the 1-based row index
    #[error("Row {row}: expected {expected} throughput values, found {found}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Matrix is {rows}x{columns} but there are {sizes} sizes and {strides} strides")]
    ShapeMismatch {
        rows: usize,
        columns: usize,
        sizes: usize,
        strides: usize,
    },

    #[error("No data rows found after the header line")]
    NoData,

    #[error("Invalid stride sequence: {0}")]
    InvalidStrides(String),
}
