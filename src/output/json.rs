//! JSON serialization for collated results.

use crate::collate::DataSet;

/// Serialize data sets to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (non-finite floats serialize as
/// `null`, so this should not happen in practice).
pub fn to_json(datasets: &[DataSet]) -> Result<String, serde_json::Error> {
    serde_json::to_string(datasets)
}

/// Serialize data sets to a pretty-printed JSON string.
///
/// # Errors
///
/// See [`to_json`].
pub fn to_json_pretty(datasets: &[DataSet]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(datasets)
}
