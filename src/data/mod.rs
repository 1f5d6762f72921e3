//! CSV decoding and encoding for measurement and tables files.
//!
//! # Formats
//!
//! - **Raw measurement file**: row 0 GPU id, rows 1-2 free text, then one
//!   [`RawSample`] per row.
//! - **Tables file**: blocks of GPU row, two header rows, label row and
//!   [`SummaryRow`](crate::SummaryRow)s, separated by blank rows. Written
//!   with every field quoted.
//!
//! The CSV reader drops lines that are entirely empty. [`read_rows`] puts
//! them back as zero-cell rows so row counting (and the collator's block
//! boundaries) see the same rows a line-oriented reader would.

mod raw;
mod tables;

pub use raw::{load_raw_file, RawMeasurement};
pub use tables::{append_block, encode_block, reset_tables};

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{FrameStatError, Result};

/// One row of a CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// Line on which the row starts (1-indexed).
    pub line: usize,
    /// Unquoted cell values. Empty for a blank line.
    pub cells: Vec<String>,
}

impl Row {
    /// Create a row from cell values.
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    /// A row is blank when it has no cells or its first cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.first().map_or(true, |c| c.is_empty())
    }

    /// Cell values as string slices.
    pub fn fields(&self) -> Vec<&str> {
        self.cells.iter().map(String::as_str).collect()
    }
}

/// Read every row of the CSV file at `path`.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let file = File::open(path).map_err(|e| FrameStatError::io(path, e))?;
    read_rows_from(file, path)
}

/// Read every row from `reader`; `name` is used in error messages.
pub fn read_rows_from<R: Read>(reader: R, name: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut expected_line = 1usize;

    for result in reader.records() {
        let record = result.map_err(|e| FrameStatError::csv(name, e))?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(expected_line);

        // Lines skipped by the reader were empty.
        while expected_line < line {
            rows.push(Row::new(expected_line, Vec::new()));
            expected_line += 1;
        }

        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        let embedded_newlines: usize = cells.iter().map(|c| c.matches('\n').count()).sum();
        expected_line = line + 1 + embedded_newlines;
        rows.push(Row::new(line, cells));
    }

    Ok(rows)
}
