//! Configuration for the aggregation pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How to resolve the overlap difference when compute and graphics start
/// at exactly the same timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TiePolicy {
    /// Reuse the previous sample's difference (0.0 for the first sample).
    ///
    /// This reproduces the historical tables byte for byte.
    #[default]
    CarryPrevious,
    /// Treat concurrent starts as zero overlap difference.
    Zero,
}

impl TiePolicy {
    /// Parse a policy name as used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "carry" | "carry-previous" | "carry_previous" => Some(TiePolicy::CarryPrevious),
            "zero" => Some(TiePolicy::Zero),
            _ => None,
        }
    }

    /// Short name for display.
    pub fn name(&self) -> &'static str {
        match self {
            TiePolicy::CarryPrevious => "carry",
            TiePolicy::Zero => "zero",
        }
    }
}

/// Configuration options for [`Aggregator`](crate::Aggregator) and
/// [`Collator`](crate::Collator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // =========================================================================
    // Locations
    // =========================================================================
    /// Directory scanned for raw measurement files.
    ///
    /// Default: current directory.
    pub input_dir: PathBuf,

    /// Intermediate tables file written by the aggregator and read by the
    /// collator.
    ///
    /// Default: `tables.csv` in the current directory.
    pub tables_path: PathBuf,

    // =========================================================================
    // File naming
    // =========================================================================
    /// File name prefix reserved for output files.
    ///
    /// Files starting with this prefix are never treated as measurements.
    /// Default: `"t"`.
    pub reserved_prefix: String,

    /// Marker separating the configuration key from the trial index.
    ///
    /// Default: `"_TN"`.
    pub trial_marker: String,

    // =========================================================================
    // Raw file layout
    // =========================================================================
    /// Number of metadata rows at the top of each raw file.
    ///
    /// Default: 3 (GPU row and two descriptive rows).
    pub header_rows: usize,

    /// Tie-break policy for the overlap difference.
    ///
    /// Default: [`TiePolicy::CarryPrevious`].
    pub tie_policy: TiePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            tables_path: PathBuf::from("tables.csv"),
            reserved_prefix: "t".to_string(),
            trial_marker: "_TN".to_string(),
            header_rows: 3,
            tie_policy: TiePolicy::CarryPrevious,
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration rooted at `dir`: raw files are read from `dir` and the
    /// tables file is written to `dir/tables.csv`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            input_dir: dir.to_path_buf(),
            tables_path: dir.join("tables.csv"),
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the input directory.
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the tables file path.
    pub fn tables_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tables_path = path.into();
        self
    }

    /// Set the reserved output prefix.
    pub fn reserved_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reserved_prefix = prefix.into();
        self
    }

    /// Set the trial marker.
    pub fn trial_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        assert!(!marker.is_empty(), "trial_marker must not be empty");
        self.trial_marker = marker;
        self
    }

    /// Set the number of metadata rows in raw files.
    pub fn header_rows(mut self, rows: usize) -> Self {
        assert!(rows >= 3, "header_rows must be at least 3");
        self.header_rows = rows;
        self
    }

    /// Set the tie-break policy.
    pub fn tie_policy(mut self, policy: TiePolicy) -> Self {
        self.tie_policy = policy;
        self
    }
}
