//! Simulation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Sampling family for per-player scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    /// Normal, clipped at zero.
    #[default]
    Normal,
    /// Lognormal matched to the mean and standard deviation.
    Lognormal,
}

/// Monte Carlo settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Draws per lineup.
    #[serde(default = "default_n_simulations")]
    pub n_simulations: usize,
    /// Apply the correlation matrix.
    #[serde(default = "default_true")]
    pub use_correlations: bool,
    /// Sampling family.
    #[serde(default)]
    pub distribution: DistributionKind,
    /// Base seed. Unset draws a fresh seed per engine.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Worker threads for batch simulation. 0 uses one per core.
    #[serde(default)]
    pub worker_threads: usize,
    /// Pairwise correlation coefficients.
    #[serde(default)]
    pub correlations: CorrelationConfig,
    /// Spread used for players without an explicit distribution.
    #[serde(default)]
    pub default_variance: VarianceConfig,
    /// Result cache.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_simulations: default_n_simulations(),
            use_correlations: true,
            distribution: DistributionKind::default(),
            seed: None,
            worker_threads: 0,
            correlations: CorrelationConfig::default(),
            default_variance: VarianceConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Pairwise correlation coefficients, highest precedence first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Players sharing an explicit correlation group.
    #[serde(default = "default_strong")]
    pub shared_group: f64,
    /// QB with a same-team WR or TE.
    #[serde(default = "default_strong")]
    pub qb_receiver: f64,
    /// RB against the opposing defense.
    #[serde(default = "default_rb_opposing_dst")]
    pub rb_opposing_dst: f64,
    /// Any other pair from the same game.
    #[serde(default = "default_same_game")]
    pub same_game: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            shared_group: default_strong(),
            qb_receiver: default_strong(),
            rb_opposing_dst: default_rb_opposing_dst(),
            same_game: default_same_game(),
        }
    }
}

/// Default spread as ratios of the projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarianceConfig {
    /// Standard deviation / projection.
    #[serde(default = "default_std_dev_ratio")]
    pub std_dev_ratio: f64,
    /// 5th percentile / projection.
    #[serde(default = "default_floor_ratio")]
    pub floor_ratio: f64,
    /// 95th percentile / projection.
    #[serde(default = "default_ceiling_ratio")]
    pub ceiling_ratio: f64,
}

impl Default for VarianceConfig {
    fn default() -> Self {
        Self {
            std_dev_ratio: default_std_dev_ratio(),
            floor_ratio: default_floor_ratio(),
            ceiling_ratio: default_ceiling_ratio(),
        }
    }
}

/// LRU + TTL cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache results at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum entries.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
    /// Entry lifetime in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl CacheConfig {
    /// Entry lifetime.
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

const fn default_n_simulations() -> usize {
    10_000
}

const fn default_strong() -> f64 {
    0.60
}

const fn default_rb_opposing_dst() -> f64 {
    -0.35
}

const fn default_same_game() -> f64 {
    0.20
}

const fn default_std_dev_ratio() -> f64 {
    0.24
}

const fn default_floor_ratio() -> f64 {
    0.60
}

const fn default_ceiling_ratio() -> f64 {
    1.40
}

const fn default_cache_capacity() -> usize {
    100
}

const fn default_cache_ttl_secs() -> u64 {
    3_600
}
