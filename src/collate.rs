//! Second pipeline stage: the tables file back to structured records.
//!
//! The tables file is a run of blocks separated by blank rows. Each block
//! becomes a [`DataSet`] carrying an [`AggregateSummary`] across its trials.

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::config::Config;
use crate::data::{read_rows, read_rows_from, Row};
use crate::error::{FrameStatError, Result};
use crate::statistics::{mean, MetricStats};
use crate::types::{format_float, SummaryRow, SUMMARY_COLUMNS};

/// Rows at the top of a block before the summary rows start.
pub const BLOCK_HEADER_ROWS: usize = 4;

/// Split rows into blocks at blank rows.
///
/// A blank row closes the current block only if a non-blank row has been
/// seen since the last boundary, so a run of blank rows counts as a single
/// separator. Empty blocks are dropped.
pub fn split_blocks(rows: Vec<Row>) -> Vec<Vec<Row>> {
    let mut blocks: Vec<Vec<Row>> = vec![Vec::new()];
    let mut inside_block = true;

    for row in rows {
        if row.is_blank() {
            if inside_block {
                tracing::info!("Adding new dataset");
                inside_block = false;
                blocks.push(Vec::new());
            }
        } else {
            if let Some(current) = blocks.last_mut() {
                current.push(row);
            }
            inside_block = true;
        }
    }

    blocks.retain(|b| !b.is_empty());
    blocks
}

/// Second-order statistics across the trials of a configuration.
///
/// The standard deviations are `sqrt(mean of variances)`. That is not a
/// pooled standard deviation: trials are not weighted by sample count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateSummary {
    /// Mean frame count across trials.
    pub total_frames: f64,
    /// Mean of the frame time means, with mean-of-variance spread.
    pub frame_time: MetricStats,
    /// Mean of the compute time means, with mean-of-variance spread.
    pub compute_time: MetricStats,
    /// Mean of the graphics time means, with mean-of-variance spread.
    pub graphics_time: MetricStats,
    /// Mean of the difference means, with mean-of-variance spread.
    pub difference: MetricStats,
}

impl AggregateSummary {
    /// Combine the summary rows of one configuration.
    ///
    /// # Errors
    /// `InsufficientSamples` if `rows` is empty.
    pub fn from_rows(rows: &[SummaryRow], source_name: &str) -> Result<Self> {
        if rows.is_empty() {
            return Err(FrameStatError::InsufficientSamples {
                source_name: source_name.to_string(),
                got: 0,
                min: 1,
            });
        }

        let frames: Vec<f64> = rows.iter().map(|r| r.total_frames as f64).collect();
        let combine = |pick: fn(&SummaryRow) -> MetricStats| {
            let means: Vec<f64> = rows.iter().map(|r| pick(r).mean).collect();
            let variances: Vec<f64> = rows.iter().map(|r| pick(r).variance).collect();
            MetricStats::from_mean_variance(
                mean(&means).unwrap_or_default(),
                mean(&variances).unwrap_or_default(),
            )
        };

        Ok(Self {
            total_frames: mean(&frames).unwrap_or_default(),
            frame_time: combine(|r| r.frame_time),
            compute_time: combine(|r| r.compute_time),
            graphics_time: combine(|r| r.graphics_time),
            difference: combine(|r| r.difference),
        })
    }

    /// The 13 values in the same column order as a summary row.
    pub fn to_values(&self) -> [f64; SUMMARY_COLUMNS] {
        let m = [
            self.frame_time,
            self.compute_time,
            self.graphics_time,
            self.difference,
        ];
        [
            self.total_frames,
            m[0].mean,
            m[0].stdev,
            m[0].variance,
            m[1].mean,
            m[1].stdev,
            m[1].variance,
            m[2].mean,
            m[2].stdev,
            m[2].variance,
            m[3].mean,
            m[3].stdev,
            m[3].variance,
        ]
    }
}

/// Simulation parameters picked out of a block's parameter row.
///
/// Missing or non-numeric cells are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SimulationParameters {
    /// Number of simulated particles (cell 1).
    pub particle_count: Option<u64>,
    /// Number of simulation sub-steps (cell 3).
    pub substep_count: Option<u64>,
    /// Simulation scale factor (cell 7).
    pub scale: Option<f64>,
}

/// One collated configuration block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSet {
    /// GPU/device identifier.
    pub gpu: String,
    /// Simulation type row.
    pub simulation_type: Vec<String>,
    /// Parameter row.
    pub parameters: Vec<String>,
    /// Column labels above the summary rows.
    pub header: Vec<String>,
    /// One row per trial.
    pub rows: Vec<SummaryRow>,
    /// Statistics across `rows`.
    pub averages: AggregateSummary,
}

impl DataSet {
    /// Build a data set from the rows of block number `index`.
    ///
    /// Row 0 is the GPU row, row 1 the simulation type, row 2 the parameters,
    /// row 3 the labels and rows 4.. the summary rows. GPU rows written one
    /// character per cell are joined back together.
    pub fn from_block(index: usize, block: &[Row]) -> Result<Self> {
        if block.len() < BLOCK_HEADER_ROWS {
            return Err(FrameStatError::MalformedBlock {
                block: index,
                row: block.len(),
                message: format!(
                    "expected at least {} header rows, got {}",
                    BLOCK_HEADER_ROWS,
                    block.len()
                ),
            });
        }

        let rows = block[BLOCK_HEADER_ROWS..]
            .iter()
            .enumerate()
            .map(|(i, row)| {
                SummaryRow::from_fields(&row.fields()).map_err(|message| {
                    FrameStatError::MalformedBlock {
                        block: index,
                        row: BLOCK_HEADER_ROWS + i,
                        message,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let averages = AggregateSummary::from_rows(&rows, &format!("dataset block {}", index))?;

        Ok(Self {
            gpu: block[0].cells.concat(),
            simulation_type: block[1].cells.clone(),
            parameters: block[2].cells.clone(),
            header: block[3].cells.clone(),
            rows,
            averages,
        })
    }

    /// Number of trials in the data set.
    pub fn trial_count(&self) -> usize {
        self.rows.len()
    }

    /// Typed view of the parameter row.
    pub fn simulation_parameters(&self) -> SimulationParameters {
        let cell = |i: usize| self.parameters.get(i).map(|c| c.trim());
        SimulationParameters {
            particle_count: cell(1).and_then(|c| c.parse().ok()),
            substep_count: cell(3).and_then(|c| c.parse().ok()),
            scale: cell(7).and_then(|c| c.parse().ok()),
        }
    }

    /// Aggregate values formatted for a table cell.
    pub fn average_fields(&self) -> Vec<String> {
        self.averages.to_values().iter().map(|&v| format_float(v)).collect()
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.parameters)
    }
}

/// Reads a tables file into [`DataSet`]s.
#[derive(Debug, Clone, Default)]
pub struct Collator {
    config: Config,
}

impl Collator {
    /// Create a collator with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Collate the tables file named by the configuration.
    pub fn collate(&self) -> Result<Vec<DataSet>> {
        self.collate_path(&self.config.tables_path)
    }

    /// Collate the tables file at `path`.
    pub fn collate_path(&self, path: &Path) -> Result<Vec<DataSet>> {
        let rows = read_rows(path)?;
        collate_rows(rows)
    }

    /// Collate tables read from `reader`; `name` is used in errors.
    pub fn collate_reader<R: Read>(&self, reader: R, name: &Path) -> Result<Vec<DataSet>> {
        let rows = read_rows_from(reader, name)?;
        collate_rows(rows)
    }
}

fn collate_rows(rows: Vec<Row>) -> Result<Vec<DataSet>> {
    split_blocks(rows)
        .iter()
        .enumerate()
        .map(|(i, block)| DataSet::from_block(i, block))
        .collect()
}
