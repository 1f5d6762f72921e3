//! Core record types: raw per-frame samples and per-trial summary rows.

use serde::{Deserialize, Serialize};

use crate::statistics::MetricStats;

/// Number of numeric columns consumed from a raw measurement row.
pub const RAW_COLUMNS: usize = 8;

/// Number of columns in a serialized [`SummaryRow`].
pub const SUMMARY_COLUMNS: usize = 13;

/// Column labels written above the summary rows of each table.
pub const SUMMARY_LABELS: [&str; SUMMARY_COLUMNS] = [
    "Total Frames",
    "Mean FrameTime",
    "STDev",
    "Variance",
    "Mean Compute Time",
    "STDev",
    "Variance",
    "Mean Graphics Time",
    "Stdev",
    "Variance",
    "Mean Difference",
    "STDev",
    "Variance",
];

/// One frame of a benchmark run.
///
/// Columns: `[totalFrames, frameTime, computeStart, computeEnd, computeTime,
/// graphicsStart, graphicsEnd, graphicsTime, ...]`. Trailing columns are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Running frame counter.
    pub total_frames: u64,
    /// Wall time of the frame.
    pub frame_time: f64,
    /// Compute phase start timestamp.
    pub compute_start: f64,
    /// Compute phase end timestamp.
    pub compute_end: f64,
    /// Compute phase duration.
    pub compute_time: f64,
    /// Graphics phase start timestamp.
    pub graphics_start: f64,
    /// Graphics phase end timestamp.
    pub graphics_end: f64,
    /// Graphics phase duration.
    pub graphics_time: f64,
}

impl RawSample {
    /// Decode a sample from the cells of one CSV row.
    ///
    /// Returns a description of the first problem found if the row is short
    /// or a cell is not numeric.
    pub fn from_fields(fields: &[&str]) -> Result<Self, String> {
        if fields.len() < RAW_COLUMNS {
            return Err(format!(
                "expected at least {} columns, got {}",
                RAW_COLUMNS,
                fields.len()
            ));
        }

        let total_frames = fields[0]
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("invalid frame count '{}' in column 0", fields[0]))?;
        let float = |idx: usize| -> Result<f64, String> {
            fields[idx]
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid value '{}' in column {}", fields[idx], idx))
        };

        Ok(Self {
            total_frames,
            frame_time: float(1)?,
            compute_start: float(2)?,
            compute_end: float(3)?,
            compute_time: float(4)?,
            graphics_start: float(5)?,
            graphics_end: float(6)?,
            graphics_time: float(7)?,
        })
    }

    /// Which phase started first in this frame.
    pub fn phase_order(&self) -> PhaseOrder {
        if self.compute_start < self.graphics_start {
            PhaseOrder::ComputeFirst
        } else if self.compute_start > self.graphics_start {
            PhaseOrder::GraphicsFirst
        } else {
            PhaseOrder::Concurrent
        }
    }

    /// Overlap difference between the two phases.
    ///
    /// Compute first: `computeEnd - graphicsStart`. Graphics first:
    /// `graphicsEnd - computeStart`. `None` when both start together; the
    /// caller resolves that case with a [`TiePolicy`](crate::TiePolicy).
    pub fn overlap_difference(&self) -> Option<f64> {
        match self.phase_order() {
            PhaseOrder::ComputeFirst => Some(self.compute_end - self.graphics_start),
            PhaseOrder::GraphicsFirst => Some(self.graphics_end - self.compute_start),
            PhaseOrder::Concurrent => None,
        }
    }
}

/// Relative start order of the compute and graphics phases of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseOrder {
    /// Compute started strictly before graphics.
    ComputeFirst,
    /// Graphics started strictly before compute.
    GraphicsFirst,
    /// Both started at the same timestamp (or a timestamp was NaN).
    Concurrent,
}

/// Statistics for one trial of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Frame counter from the last row of the trial.
    pub total_frames: u64,
    /// Frame time statistics.
    pub frame_time: MetricStats,
    /// Compute time statistics.
    pub compute_time: MetricStats,
    /// Graphics time statistics.
    pub graphics_time: MetricStats,
    /// Overlap difference statistics.
    pub difference: MetricStats,
}

impl SummaryRow {
    /// The four metrics in column order.
    pub fn metrics(&self) -> [MetricStats; 4] {
        [
            self.frame_time,
            self.compute_time,
            self.graphics_time,
            self.difference,
        ]
    }

    /// Serialize to the 13 table cells, in [`SUMMARY_LABELS`] order.
    pub fn to_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(SUMMARY_COLUMNS);
        fields.push(self.total_frames.to_string());
        for m in self.metrics() {
            fields.push(format_float(m.mean));
            fields.push(format_float(m.stdev));
            fields.push(format_float(m.variance));
        }
        fields
    }

    /// Decode a row written by [`SummaryRow::to_fields`].
    ///
    /// The frame count also accepts integral floats such as `"100.0"`, which
    /// appear when a table has been round-tripped through a spreadsheet.
    pub fn from_fields(fields: &[&str]) -> Result<Self, String> {
        if fields.len() < SUMMARY_COLUMNS {
            return Err(format!(
                "expected {} columns, got {}",
                SUMMARY_COLUMNS,
                fields.len()
            ));
        }

        let total_frames = parse_frame_count(fields[0])
            .ok_or_else(|| format!("invalid frame count '{}' in column 0", fields[0]))?;
        let float = |idx: usize| -> Result<f64, String> {
            fields[idx]
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid value '{}' in column {}", fields[idx], idx))
        };
        let metric = |base: usize| -> Result<MetricStats, String> {
            Ok(MetricStats {
                mean: float(base)?,
                stdev: float(base + 1)?,
                variance: float(base + 2)?,
            })
        };

        Ok(Self {
            total_frames,
            frame_time: metric(1)?,
            compute_time: metric(4)?,
            graphics_time: metric(7)?,
            difference: metric(10)?,
        })
    }
}

fn parse_frame_count(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if let Ok(n) = cell.parse::<u64>() {
        return Some(n);
    }
    let f = cell.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
        Some(f as u64)
    } else {
        None
    }
}

/// Shortest representation that still reads as a float (`16.0`, not `16`).
pub(crate) fn format_float(x: f64) -> String {
    format!("{:?}", x)
}
