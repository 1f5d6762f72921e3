//! Error types for the aggregation pipeline.

use std::path::PathBuf;

/// Errors that can occur while aggregating or collating measurement tables.
#[derive(Debug, thiserror::Error)]
pub enum FrameStatError {
    /// IO error opening, reading or writing a file.
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        /// File that could not be accessed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// CSV syntax error reported by the reader or writer.
    #[error("CSV error in '{}': {source}", .path.display())]
    Csv {
        /// File being read or written.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A raw measurement row has too few columns or a non-numeric value.
    #[error("Malformed row in '{}' at line {line}: {message}", .path.display())]
    MalformedRow {
        /// File containing the row.
        path: PathBuf,
        /// Line number of the row (1-indexed).
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A block of the intermediate tables file could not be decoded.
    #[error("Malformed dataset block {block} at row {row}: {message}")]
    MalformedBlock {
        /// Index of the block in the tables file (0-indexed).
        block: usize,
        /// Row within the block (0-indexed).
        row: usize,
        /// Description of the problem.
        message: String,
    },

    /// Not enough samples to compute the requested statistic.
    #[error("Insufficient samples in {source_name}: got {got}, need at least {min}")]
    InsufficientSamples {
        /// File or block the samples came from.
        source_name: String,
        /// Number of samples found.
        got: usize,
        /// Minimum number of samples required.
        min: usize,
    },

    /// The discovery glob pattern was rejected.
    #[error("Invalid discovery pattern '{pattern}': {source}")]
    Pattern {
        /// Pattern that failed to compile.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },
}

impl FrameStatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FrameStatError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        FrameStatError::Csv {
            path: path.into(),
            source,
        }
    }

    /// Whether this error belongs to the insufficient-samples class.
    pub fn is_insufficient_samples(&self) -> bool {
        matches!(self, FrameStatError::InsufficientSamples { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FrameStatError>;
