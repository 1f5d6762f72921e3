//! Mean, sample variance and standard deviation over a finished sample set.

use serde::{Deserialize, Serialize};

/// Descriptive statistics for one metric.
///
/// `stdev` is always `variance.sqrt()`, so `stdev * stdev == variance` up to
/// rounding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricStats {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (N-1 denominator).
    pub stdev: f64,
    /// Sample variance (N-1 denominator).
    pub variance: f64,
}

impl MetricStats {
    /// Build from a mean and a variance, deriving the standard deviation.
    pub fn from_mean_variance(mean: f64, variance: f64) -> Self {
        Self {
            mean,
            stdev: variance.sqrt(),
            variance,
        }
    }

    /// Compute statistics for `samples`.
    ///
    /// Returns `None` when fewer than two samples are given, since the
    /// sample variance is undefined there.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let variance = sample_variance(samples)?;
        let mean = mean(samples)?;
        Some(Self::from_mean_variance(mean, variance))
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Sample variance with Bessel's correction, `None` for fewer than two samples.
///
/// Two-pass: the mean is computed first and squared deviations are summed
/// afterwards. Identical samples give exactly 0.0.
pub fn sample_variance(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let m = mean(samples)?;
    let sum_sq: f64 = samples.iter().map(|&x| (x - m) * (x - m)).sum();
    Some(sum_sq / (samples.len() - 1) as f64)
}
