//! Per-player scoring distributions.

use std::sync::Arc;

use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, LogNormal, Normal};
use serde::Serialize;

use crate::config::{DistributionKind, VarianceConfig};
use crate::domain::{Player, ValidationError};

/// A player plus the shape of his scoring distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionDistribution {
    #[serde(skip)]
    player: Arc<Player>,
    mean_projection: f64,
    std_deviation: f64,
    floor_5th: f64,
    ceiling_95th: f64,
    correlation_group: Option<String>,
}

impl ProjectionDistribution {
    /// Validated distribution.
    ///
    /// Requires `std_deviation >= 0`, `ceiling_95th >= floor_5th` and
    /// `floor_5th <= mean_projection <= ceiling_95th`.
    pub fn new(
        player: Arc<Player>,
        mean_projection: f64,
        std_deviation: f64,
        floor_5th: f64,
        ceiling_95th: f64,
    ) -> Result<Self, ValidationError> {
        let name = || player.name().to_string();

        if !(std_deviation >= 0.0) {
            return Err(ValidationError::NegativeStdDeviation {
                player: name(),
                value: std_deviation,
            });
        }
        if ceiling_95th < floor_5th {
            return Err(ValidationError::CeilingBelowFloor {
                player: name(),
                floor: floor_5th,
                ceiling: ceiling_95th,
            });
        }
        if !(floor_5th <= mean_projection && mean_projection <= ceiling_95th) {
            return Err(ValidationError::MeanOutsideRange {
                player: name(),
                mean: mean_projection,
                floor: floor_5th,
                ceiling: ceiling_95th,
            });
        }

        Ok(Self {
            player,
            mean_projection,
            std_deviation,
            floor_5th,
            ceiling_95th,
            correlation_group: None,
        })
    }

    /// Default spread derived from the projection: stdev, floor and ceiling
    /// as fixed ratios of it.
    pub fn from_player(player: Arc<Player>, variance: &VarianceConfig) -> Self {
        let projection = player.projection();
        Self {
            mean_projection: projection,
            std_deviation: projection * variance.std_dev_ratio,
            floor_5th: projection * variance.floor_ratio,
            ceiling_95th: projection * variance.ceiling_ratio,
            correlation_group: None,
            player,
        }
    }

    /// Tag with an explicit correlation group.
    #[must_use]
    pub fn with_correlation_group(mut self, group: impl Into<String>) -> Self {
        self.correlation_group = Some(group.into());
        self
    }

    /// Underlying player.
    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }

    /// Expected points.
    pub const fn mean_projection(&self) -> f64 {
        self.mean_projection
    }

    /// Standard deviation.
    pub const fn std_deviation(&self) -> f64 {
        self.std_deviation
    }

    /// 5th percentile.
    pub const fn floor_5th(&self) -> f64 {
        self.floor_5th
    }

    /// 95th percentile.
    pub const fn ceiling_95th(&self) -> f64 {
        self.ceiling_95th
    }

    /// Explicit correlation group.
    pub fn correlation_group(&self) -> Option<&str> {
        self.correlation_group.as_deref()
    }

    /// Squared standard deviation.
    pub fn variance(&self) -> f64 {
        self.std_deviation.powi(2)
    }

    /// Ceiling minus floor.
    pub fn range(&self) -> f64 {
        self.ceiling_95th - self.floor_5th
    }

    /// `n` independent draws. Zero spread yields a constant vector.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, kind: DistributionKind, rng: &mut R) -> Vec<f64> {
        let mean = self.mean_projection;
        let std = self.std_deviation;
        if std == 0.0 {
            return vec![mean; n];
        }

        match kind {
            DistributionKind::Normal => match Normal::new(mean, std) {
                Ok(dist) => (0..n).map(|_| dist.sample(rng).max(0.0)).collect(),
                Err(_) => vec![mean; n],
            },
            DistributionKind::Lognormal => {
                if mean <= 0.0 {
                    return vec![mean.max(0.0); n];
                }
                let (mu, sigma) = lognormal_params(mean, std);
                match LogNormal::new(mu, sigma) {
                    Ok(dist) => (0..n).map(|_| dist.sample(rng)).collect(),
                    Err(_) => vec![mean; n],
                }
            }
        }
    }
}

/// Location and scale of the lognormal with the given mean and stdev.
pub fn lognormal_params(mean: f64, std: f64) -> (f64, f64) {
    let m2 = mean * mean;
    let s2 = std * std;
    let mu = (m2 / (m2 + s2).sqrt()).ln();
    let sigma = (1.0 + s2 / m2).ln().sqrt();
    (mu, sigma)
}

/// Independent draws for several players as an `n x k` matrix (one column
/// per player, in input order).
pub fn sample_matrix<R: Rng + ?Sized>(
    distributions: &[ProjectionDistribution],
    n: usize,
    kind: DistributionKind,
    rng: &mut R,
) -> DMatrix<f64> {
    let mut data = Vec::with_capacity(n * distributions.len());
    for distribution in distributions {
        data.extend(distribution.sample(n, kind, rng));
    }
    // Column-major: each player's draws are contiguous.
    DMatrix::from_vec(n, distributions.len(), data)
}
