//! # framestat
//!
//! Aggregate benchmark frame-timing logs into per-configuration statistics.
//!
//! A benchmark run writes one CSV file per trial, with frame, compute and
//! graphics timings for every frame. The pipeline has two stages:
//!
//! 1. [`Aggregator`] summarizes each trial file into a [`SummaryRow`] (mean,
//!    sample standard deviation and variance per metric) and writes one table
//!    per configuration to an intermediate `tables.csv`.
//! 2. [`Collator`] reads `tables.csv` back, rebuilding each table as a
//!    [`DataSet`] with an [`AggregateSummary`] across trials.
//!
//! ## Quick Start
//!
//! ```ignore
//! use framestat::{Aggregator, Collator, Config};
//!
//! let config = Config::in_dir("results/");
//! let report = Aggregator::new(config.clone()).run()?;
//! println!("Summarized {} files", report.files_processed());
//!
//! for dataset in Collator::new(config).collate()? {
//!     println!("{}: {:.3} ms mean frame time", dataset, dataset.averages.frame_time.mean);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod types;

// Functional modules
pub mod aggregate;
pub mod collate;
pub mod data;
pub mod discovery;
pub mod output;
pub mod statistics;

// Re-exports for public API
pub use aggregate::{
    summarize_samples, AggregationReport, Aggregator, ConfigurationSummary, DifferenceTracker,
    TrialSummary,
};
pub use collate::{split_blocks, AggregateSummary, Collator, DataSet, SimulationParameters};
pub use config::{Config, TiePolicy};
pub use discovery::{discover, group_trials, ConfigurationKey, TrialFile};
pub use error::{FrameStatError, Result};
pub use statistics::MetricStats;
pub use types::{PhaseOrder, RawSample, SummaryRow, SUMMARY_COLUMNS, SUMMARY_LABELS};
