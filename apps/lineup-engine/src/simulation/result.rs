//! Immutable lineup score distribution.

use std::fmt;

use serde::Serialize;

use crate::domain::ValidationError;

/// Summary of `N` simulated lineup totals. Statistics are computed once at
/// construction; the sorted draws are kept for percentile queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    #[serde(skip)]
    sorted: Vec<f64>,
    /// Number of draws.
    pub n_simulations: usize,
    /// Mean total.
    pub mean: f64,
    /// Median total.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Population variance.
    pub variance: f64,
    /// 5th percentile.
    pub floor_5th: f64,
    /// 95th percentile.
    pub ceiling_95th: f64,
}

impl SimulationResult {
    /// Summarise raw draws. Fails on an empty or non-finite sample.
    pub fn from_samples(mut samples: Vec<f64>) -> Result<Self, ValidationError> {
        if samples.is_empty() {
            return Err(ValidationError::parameter("samples", "at least one draw required"));
        }
        if samples.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::parameter("samples", "draws must be finite"));
        }
        samples.sort_by(f64::total_cmp);

        let n = samples.len();
        let (mean, variance) = if samples[0] == samples[n - 1] {
            (samples[0], 0.0)
        } else {
            let mean = samples.iter().sum::<f64>() / n as f64;
            let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
            (mean, variance)
        };

        Ok(Self {
            median: interpolate(&samples, 50.0),
            floor_5th: interpolate(&samples, 5.0),
            ceiling_95th: interpolate(&samples, 95.0),
            n_simulations: n,
            mean,
            std_dev: variance.sqrt(),
            variance,
            sorted: samples,
        })
    }

    /// Value at percentile `p` (0-100, clamped), linear interpolation
    /// between closest ranks.
    pub fn percentile(&self, p: f64) -> f64 {
        interpolate(&self.sorted, p)
    }

    /// Share of draws strictly above `threshold`.
    pub fn probability_above(&self, threshold: f64) -> f64 {
        let at_or_below = self.sorted.partition_point(|v| *v <= threshold);
        (self.sorted.len() - at_or_below) as f64 / self.sorted.len() as f64
    }

    /// Share of draws strictly below `threshold`.
    pub fn probability_below(&self, threshold: f64) -> f64 {
        self.sorted.partition_point(|v| *v < threshold) as f64 / self.sorted.len() as f64
    }

    /// Chance of beating a cash line.
    pub fn cash_probability(&self, cash_line: f64) -> f64 {
        self.probability_above(cash_line)
    }

    /// Draws in ascending order.
    pub fn sorted_samples(&self) -> &[f64] {
        &self.sorted
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SimulationResult: Mean={:.2}, Median={:.2}, Floor={:.2}, Ceiling={:.2}, StdDev={:.2}",
            self.mean, self.median, self.floor_5th, self.ceiling_95th, self.std_dev
        )
    }
}

fn interpolate(sorted: &[f64], p: f64) -> f64 {
    let p = p.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> SimulationResult {
        SimulationResult::from_samples((1..=100).map(f64::from).rev().collect()).unwrap()
    }

    #[test]
    fn test_summary_statistics() {
        let r = result();
        assert_eq!(r.n_simulations, 100);
        assert!((r.mean - 50.5).abs() < 1e-12);
        assert!((r.median - 50.5).abs() < 1e-12);
        assert!((r.variance - 833.25).abs() < 1e-9);
        assert!((r.floor_5th - 5.95).abs() < 1e-9);
        assert!((r.ceiling_95th - 95.05).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_edges() {
        let r = result();
        assert_eq!(r.percentile(0.0), 1.0);
        assert_eq!(r.percentile(100.0), 100.0);
        assert_eq!(r.percentile(150.0), 100.0);
    }

    #[test]
    fn test_probabilities_are_strict() {
        let r = result();
        assert!((r.probability_above(90.0) - 0.10).abs() < 1e-12);
        assert!((r.probability_below(11.0) - 0.10).abs() < 1e-12);
        assert!((r.cash_probability(0.0) - 1.0).abs() < 1e-12);
        assert_eq!(r.probability_above(100.0), 0.0);
    }

    #[test]
    fn test_constant_sample_has_zero_variance() {
        let r = SimulationResult::from_samples(vec![131.7; 1_000]).unwrap();
        assert_eq!(r.mean, 131.7);
        assert_eq!(r.variance, 0.0);
        assert_eq!(r.floor_5th, 131.7);
    }

    #[test]
    fn test_empty_sample_rejected() {
        assert!(SimulationResult::from_samples(Vec::new()).is_err());
    }

    #[test]
    fn test_display_format() {
        let text = result().to_string();
        assert!(text.starts_with("SimulationResult: Mean=50.50, Median=50.50"));
        assert!(text.contains("StdDev="));
    }
}
