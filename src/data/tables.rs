//! Writing the intermediate tables file.
//!
//! Every field is quoted. A blank row is written as a single empty quoted
//! field (`""`) so it survives the CSV reader and reads back as a row whose
//! first cell is empty.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::{FrameStatError, Result};
use crate::types::{SummaryRow, SUMMARY_LABELS};

/// Number of blank rows written at the start of a fresh tables file.
pub const LEADING_BLANK_ROWS: usize = 2;

/// Number of blank rows terminating each block.
pub const BLOCK_TERMINATOR_ROWS: usize = 3;

fn quoted_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn write_blank_rows<W: Write>(writer: &mut csv::Writer<W>, count: usize) -> csv::Result<()> {
    for _ in 0..count {
        writer.write_record([""])?;
    }
    Ok(())
}

/// Truncate the tables file at `path` and write the leading blank rows.
pub fn reset_tables(path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| FrameStatError::io(path, e))?;
    let mut writer = quoted_writer(file);
    write_blank_rows(&mut writer, LEADING_BLANK_ROWS).map_err(|e| FrameStatError::csv(path, e))?;
    writer.flush().map_err(|e| FrameStatError::io(path, e))
}

/// Encode one configuration block in memory.
///
/// Layout: GPU row, the two header rows, the label row, `rows`, then
/// [`BLOCK_TERMINATOR_ROWS`] blank rows. Header rows must not be blank, or the
/// block would split when collated. `path` only names the destination in
/// error messages.
pub fn encode_block(
    path: &Path,
    gpu: &str,
    headers: &[Vec<String>; 2],
    rows: &[SummaryRow],
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut writer = quoted_writer(&mut buf);
        let csv_err = |e| FrameStatError::csv(path, e);

        writer.write_record([gpu]).map_err(csv_err)?;
        for header in headers {
            writer.write_record(header).map_err(csv_err)?;
        }
        writer.write_record(SUMMARY_LABELS).map_err(csv_err)?;
        for row in rows {
            writer.write_record(row.to_fields()).map_err(csv_err)?;
        }
        write_blank_rows(&mut writer, BLOCK_TERMINATOR_ROWS).map_err(csv_err)?;
        writer.flush().map_err(|e| FrameStatError::io(path, e))?;
    }
    Ok(buf)
}

/// Append an encoded block to the tables file at `path`.
pub fn append_block(path: &Path, block: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| FrameStatError::io(path, e))?;
    file.write_all(block)
        .and_then(|_| file.flush())
        .map_err(|e| FrameStatError::io(path, e))
}
