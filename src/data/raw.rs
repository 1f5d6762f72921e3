//! Raw per-frame measurement files.

use std::path::{Path, PathBuf};

use super::{read_rows, Row};
use crate::error::{FrameStatError, Result};
use crate::types::RawSample;

/// Contents of one raw measurement file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMeasurement {
    /// File the measurement was read from.
    pub source: PathBuf,
    /// The two descriptive header rows following the GPU row.
    pub headers: [Vec<String>; 2],
    /// One sample per data row, in file order.
    pub samples: Vec<RawSample>,
}

/// Load a raw measurement file.
///
/// The first `header_rows` rows are metadata. Row 0 (the GPU line) is
/// skipped since the GPU id comes from the file name; rows 1 and 2 are kept
/// as the header rows. Every following row must decode as a
/// [`RawSample`].
///
/// # Errors
/// `Io`/`Csv` if the file cannot be read, `MalformedRow` if a header row is
/// missing or a data row is short or non-numeric.
pub fn load_raw_file(path: &Path, header_rows: usize) -> Result<RawMeasurement> {
    let rows = read_rows(path)?;
    parse_rows(path, rows, header_rows)
}

fn parse_rows(path: &Path, rows: Vec<Row>, header_rows: usize) -> Result<RawMeasurement> {
    let header_rows = header_rows.max(3);
    if rows.len() < header_rows {
        return Err(FrameStatError::MalformedRow {
            path: path.to_path_buf(),
            line: rows.len() + 1,
            message: format!(
                "expected {} header rows, file has {} rows",
                header_rows,
                rows.len()
            ),
        });
    }

    let mut iter = rows.into_iter().skip(1);
    let first = next_cells(&mut iter);
    let second = next_cells(&mut iter);
    for _ in 3..header_rows {
        iter.next();
    }

    let samples = iter
        .map(|row| {
            RawSample::from_fields(&row.fields()).map_err(|message| FrameStatError::MalformedRow {
                path: path.to_path_buf(),
                line: row.line,
                message,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RawMeasurement {
        source: path.to_path_buf(),
        headers: [first, second],
        samples,
    })
}

fn next_cells(rows: &mut impl Iterator<Item = Row>) -> Vec<String> {
    rows.next().map(|r| r.cells).unwrap_or_default()
}
