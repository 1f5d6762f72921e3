//! Output formatting for aggregation and collation results.
//!
//! - Terminal: human-readable output with colors and box drawing
//! - JSON: machine-readable serialization of collated data sets

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_dataset, format_report};
