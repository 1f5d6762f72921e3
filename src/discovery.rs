//! Discovery of raw measurement files and grouping into configurations.
//!
//! Files are named `<GPUid>_<...>_TN<trialIndex>.csv`. Everything before the
//! trial marker is the configuration key; files sharing a key are repeated
//! trials of the same configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{FrameStatError, Result};

/// Identifier of a test configuration, derived from a file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConfigurationKey(String);

impl ConfigurationKey {
    /// Wrap a key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// GPU identifier: the key text before the first underscore.
    pub fn gpu(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One raw measurement file belonging to a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialFile {
    /// Location of the file.
    pub path: PathBuf,
    /// Configuration the file belongs to.
    pub key: ConfigurationKey,
    /// Trial index parsed from the suffix, if it is numeric.
    pub trial_index: Option<u32>,
}

impl TrialFile {
    /// Classify `path` by its file name.
    ///
    /// Returns `None` for paths without a UTF-8 file name.
    pub fn from_path(path: impl Into<PathBuf>, trial_marker: &str) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_str()?;
        let stem = name.strip_suffix(".csv").unwrap_or(name);

        let (key, trial_index) = match stem.find(trial_marker) {
            Some(pos) => {
                let suffix = &stem[pos + trial_marker.len()..];
                (&stem[..pos], suffix.parse::<u32>().ok())
            }
            None => (stem, None),
        };

        Some(Self {
            key: ConfigurationKey::new(key),
            trial_index,
            path,
        })
    }

    /// Ordering used within a configuration: numbered trials ascending,
    /// then unnumbered ones, ties broken by path.
    fn sort_key(&self) -> (bool, u32, &Path) {
        (
            self.trial_index.is_none(),
            self.trial_index.unwrap_or(0),
            self.path.as_path(),
        )
    }
}

/// Trial files grouped by configuration, in key order.
pub type Configurations = BTreeMap<ConfigurationKey, Vec<TrialFile>>;

/// Group `paths` into configurations.
///
/// Files whose name starts with `config.reserved_prefix` are skipped, as is
/// the tables file itself wherever `config.tables_path` points. Each
/// configuration's trials are sorted by trial index so the output does not
/// depend on directory iteration order.
pub fn group_trials<I, P>(paths: I, config: &Config) -> Configurations
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut groups: Configurations = BTreeMap::new();
    let tables_path = resolve(&config.tables_path);

    for path in paths {
        let path = path.into();
        let reserved = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with(&config.reserved_prefix))
            .unwrap_or(true);
        if reserved || resolve(&path) == tables_path {
            continue;
        }

        if let Some(trial) = TrialFile::from_path(path, &config.trial_marker) {
            groups.entry(trial.key.clone()).or_default().push(trial);
        }
    }

    for trials in groups.values_mut() {
        trials.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    groups
}

// Canonical form when the file exists, the path as given otherwise.
fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Find every measurement file in `config.input_dir` and group it.
pub fn discover(config: &Config) -> Result<Configurations> {
    let dir = glob::Pattern::escape(&config.input_dir.to_string_lossy());
    let pattern = format!("{}/*.csv", dir.trim_end_matches('/'));

    let entries = glob::glob(&pattern).map_err(|source| FrameStatError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => {
                let path = e.path().to_path_buf();
                return Err(FrameStatError::io(path, e.into_error()));
            }
        }
    }

    let groups = group_trials(paths, config);
    if groups.is_empty() {
        tracing::warn!(
            "No measurement files found in {}",
            config.input_dir.display()
        );
    }
    Ok(groups)
}
