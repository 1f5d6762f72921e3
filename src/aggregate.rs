//! First pipeline stage: raw measurement files to per-configuration tables.
//!
//! Each trial file becomes one [`SummaryRow`]. All trials of a configuration
//! are summarized in memory and the configuration's block is appended to the
//! tables file only after every trial succeeded, so a failure never leaves a
//! half-written block behind.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Config, TiePolicy};
use crate::data::{append_block, encode_block, load_raw_file, reset_tables};
use crate::discovery::{discover, ConfigurationKey, TrialFile};
use crate::error::{FrameStatError, Result};
use crate::statistics::MetricStats;
use crate::types::{RawSample, SummaryRow};

/// Minimum number of data rows needed for a sample standard deviation.
pub const MIN_SAMPLES: usize = 2;

/// Resolves the overlap difference of successive samples in one file.
///
/// Holds the previous difference so [`TiePolicy::CarryPrevious`] can reuse
/// it when compute and graphics start together. Create one per file.
#[derive(Debug, Clone)]
pub struct DifferenceTracker {
    policy: TiePolicy,
    previous: f64,
}

impl DifferenceTracker {
    /// Start a tracker; the carried value begins at 0.0.
    pub fn new(policy: TiePolicy) -> Self {
        Self {
            policy,
            previous: 0.0,
        }
    }

    /// Difference for `sample`, updating the carried value.
    pub fn next(&mut self, sample: &RawSample) -> f64 {
        let diff = match sample.overlap_difference() {
            Some(d) => d,
            None => {
                tracing::debug!(
                    "Compute and graphics both start at {}; resolving with {} policy",
                    sample.compute_start,
                    self.policy.name()
                );
                match self.policy {
                    TiePolicy::CarryPrevious => self.previous,
                    TiePolicy::Zero => 0.0,
                }
            }
        };
        self.previous = diff;
        diff
    }
}

/// Summarize the samples of one trial.
///
/// The frame count is taken from the last sample. `source_name` identifies
/// the trial in errors.
///
/// # Errors
/// `InsufficientSamples` if fewer than [`MIN_SAMPLES`] samples are given.
pub fn summarize_samples(
    samples: &[RawSample],
    policy: TiePolicy,
    source_name: &str,
) -> Result<SummaryRow> {
    let insufficient = || FrameStatError::InsufficientSamples {
        source_name: source_name.to_string(),
        got: samples.len(),
        min: MIN_SAMPLES,
    };
    let last = samples.last().ok_or_else(insufficient)?;

    let mut tracker = DifferenceTracker::new(policy);
    let mut frame_times = Vec::with_capacity(samples.len());
    let mut compute_times = Vec::with_capacity(samples.len());
    let mut graphics_times = Vec::with_capacity(samples.len());
    let mut differences = Vec::with_capacity(samples.len());

    for sample in samples {
        frame_times.push(sample.frame_time);
        compute_times.push(sample.compute_time);
        graphics_times.push(sample.graphics_time);
        differences.push(tracker.next(sample));
    }

    let stats = |values: &[f64]| MetricStats::from_samples(values).ok_or_else(insufficient);

    Ok(SummaryRow {
        total_frames: last.total_frames,
        frame_time: stats(&frame_times)?,
        compute_time: stats(&compute_times)?,
        graphics_time: stats(&graphics_times)?,
        difference: stats(&differences)?,
    })
}

/// Summary of a single trial file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialSummary {
    /// File the trial was read from.
    pub source: PathBuf,
    /// The file's two descriptive header rows.
    pub headers: [Vec<String>; 2],
    /// Statistics for the trial.
    pub row: SummaryRow,
}

/// In-memory form of one configuration's block in the tables file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationSummary {
    /// Configuration the block describes.
    pub key: ConfigurationKey,
    /// GPU identifier written as the block's first row.
    pub gpu: String,
    /// Header rows of the last trial processed.
    pub headers: [Vec<String>; 2],
    /// One row per trial, in trial-index order.
    pub rows: Vec<SummaryRow>,
    /// Trial files, in the same order as `rows`.
    pub trials: Vec<PathBuf>,
}

/// Outcome of an aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct AggregationReport {
    /// Tables file that was written.
    pub tables_path: PathBuf,
    /// Every configuration written, in key order.
    pub configurations: Vec<ConfigurationSummary>,
}

impl AggregationReport {
    /// Total number of trial files summarized.
    pub fn files_processed(&self) -> usize {
        self.configurations.iter().map(|c| c.trials.len()).sum()
    }
}

/// Builds per-configuration summary tables from raw measurement files.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: Config,
}

impl Aggregator {
    /// Create an aggregator with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read and summarize one raw measurement file.
    pub fn summarize_file(&self, path: &Path) -> Result<TrialSummary> {
        tracing::info!("Calculating: {}", path.display());

        let raw = load_raw_file(path, self.config.header_rows)?;
        for (i, header) in raw.headers.iter().enumerate() {
            if header.first().map_or(true, |c| c.is_empty()) {
                return Err(FrameStatError::MalformedRow {
                    path: path.to_path_buf(),
                    line: i + 2,
                    message: "header row is blank".to_string(),
                });
            }
        }

        let row = summarize_samples(
            &raw.samples,
            self.config.tie_policy,
            &path.display().to_string(),
        )?;

        Ok(TrialSummary {
            source: raw.source,
            headers: raw.headers,
            row,
        })
    }

    /// Summarize every trial of one configuration.
    ///
    /// Returns `Ok(None)` when `trials` is empty. Trials are processed in
    /// the order given; [`discover`] already sorts them by trial index.
    pub fn summarize_configuration(
        &self,
        key: &ConfigurationKey,
        trials: &[TrialFile],
    ) -> Result<Option<ConfigurationSummary>> {
        if trials.is_empty() {
            tracing::debug!("No trial files for {}; skipping", key);
            return Ok(None);
        }

        let summaries = trials
            .iter()
            .map(|t| self.summarize_file(&t.path))
            .collect::<Result<Vec<_>>>()?;

        let headers = summaries
            .last()
            .map(|s| s.headers.clone())
            .unwrap_or_default();

        Ok(Some(ConfigurationSummary {
            key: key.clone(),
            gpu: key.gpu().to_string(),
            headers,
            rows: summaries.iter().map(|s| s.row).collect(),
            trials: summaries.into_iter().map(|s| s.source).collect(),
        }))
    }

    /// Run the whole stage: discover files, reset the tables file and
    /// append one block per configuration.
    ///
    /// Stops at the first failing configuration. Blocks already appended
    /// for earlier configurations stay in the file.
    pub fn run(&self) -> Result<AggregationReport> {
        let configurations = discover(&self.config)?;
        let tables_path = self.config.tables_path.clone();

        reset_tables(&tables_path)?;

        let mut written = Vec::with_capacity(configurations.len());
        for (key, trials) in &configurations {
            let Some(summary) = self.summarize_configuration(key, trials)? else {
                continue;
            };
            let block = encode_block(&tables_path, &summary.gpu, &summary.headers, &summary.rows)?;
            append_block(&tables_path, &block)?;
            tracing::info!(
                "Wrote {} trial(s) for {} to {}",
                summary.rows.len(),
                key,
                tables_path.display()
            );
            written.push(summary);
        }

        Ok(AggregationReport {
            tables_path,
            configurations: written,
        })
    }
}
