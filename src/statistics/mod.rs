//! Statistical methods for summarizing timing samples.
//!
//! Only batch descriptive statistics are needed: every metric is summarized
//! once its file has been read completely.

mod descriptive;

pub use descriptive::{mean, sample_variance, MetricStats};
