//! Monte Carlo lineup simulation.
//!
//! Each lineup is simulated on its own deterministic RNG stream: the engine
//! seed combined with a stream id derived from the roster. The same roster
//! therefore produces the same draws whichever worker runs it and in
//! whatever order a batch is scheduled.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::domain::{Lineup, Player, ValidationError};
use crate::observability::{record_cache_lookup, record_correlation_fallback, record_simulation};

use super::cache::{SimulationCache, SimulationKey};
use super::correlation::{CorrelationMatrixBuilder, is_identity};
use super::distribution::{ProjectionDistribution, sample_matrix};
use super::result::SimulationResult;

/// Errors from simulation operations.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Worker pool initialization failed.
    #[error("Failed to initialize simulation workers: {message}")]
    ThreadPool {
        /// Error message.
        message: String,
    },

    /// Bad input or degenerate output.
    #[error("invalid simulation input: {0}")]
    Invalid(#[from] ValidationError),
}

/// Correlated Monte Carlo simulator with a result cache.
#[derive(Debug)]
pub struct SimulationEngine {
    config: SimulationConfig,
    distributions: HashMap<String, ProjectionDistribution>,
    correlations: CorrelationMatrixBuilder,
    cache: Option<SimulationCache>,
    base_seed: u64,
    workers: rayon::ThreadPool,
}

impl SimulationEngine {
    /// Engine for `config`. Builds the worker pool and, when enabled, the
    /// result cache.
    ///
    /// # Errors
    ///
    /// Returns error if the worker pool cannot be created.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("simulation-{i}"))
            .build()
            .map_err(|e| SimulationError::ThreadPool {
                message: e.to_string(),
            })?;

        let cache = config
            .cache
            .enabled
            .then(|| SimulationCache::new(config.cache.capacity, config.cache.ttl()));
        let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());

        info!(
            workers = workers.current_num_threads(),
            cache = cache.is_some(),
            seed = base_seed,
            "Simulation engine ready"
        );

        Ok(Self {
            correlations: CorrelationMatrixBuilder::new(config.correlations.clone()),
            distributions: HashMap::new(),
            config,
            cache,
            base_seed,
            workers,
        })
    }

    /// Register explicit distributions, replacing the default spread for
    /// those players.
    #[must_use]
    pub fn with_distributions(
        mut self,
        distributions: impl IntoIterator<Item = ProjectionDistribution>,
    ) -> Self {
        for distribution in distributions {
            self.distributions
                .insert(distribution.player().name().to_string(), distribution);
        }
        self
    }

    /// Active configuration.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Result cache, if enabled.
    pub const fn cache(&self) -> Option<&SimulationCache> {
        self.cache.as_ref()
    }

    /// Registered distribution for `player`, or the default spread.
    pub fn distribution_for(&self, player: &Arc<Player>) -> ProjectionDistribution {
        self.distributions.get(player.name()).cloned().unwrap_or_else(|| {
            ProjectionDistribution::from_player(Arc::clone(player), &self.config.default_variance)
        })
    }

    /// Simulate with the configured draw count and correlation setting.
    ///
    /// # Errors
    ///
    /// Returns error if the configured draw count is zero.
    pub fn run_default(&self, lineup: &Lineup) -> Result<Arc<SimulationResult>, SimulationError> {
        self.run_simulations(lineup, self.config.n_simulations, self.config.use_correlations)
    }

    /// Score distribution of `lineup` over `n_simulations` draws.
    ///
    /// Results are cached by roster content, draw count and correlation mode.
    ///
    /// # Errors
    ///
    /// Returns error if `n_simulations` is zero.
    pub fn run_simulations(
        &self,
        lineup: &Lineup,
        n_simulations: usize,
        use_correlations: bool,
    ) -> Result<Arc<SimulationResult>, SimulationError> {
        if n_simulations == 0 {
            return Err(ValidationError::parameter("n_simulations", "must be at least 1").into());
        }

        let key = SimulationKey::for_lineup(lineup, n_simulations, use_correlations);
        let stream = key.stream();

        match &self.cache {
            Some(cache) => {
                let (result, hit) = cache.get_or_try_insert_with(key, || {
                    self.simulate(lineup, n_simulations, use_correlations, stream)
                })?;
                record_cache_lookup(hit);
                if hit {
                    debug!(lineup = lineup.lineup_id(), "Simulation cache hit");
                }
                Ok(result)
            }
            None => Ok(Arc::new(self.simulate(
                lineup,
                n_simulations,
                use_correlations,
                stream,
            )?)),
        }
    }

    /// Simulate several lineups on the worker pool. Results keep input order.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub fn run_simulations_batch(
        &self,
        lineups: &[Lineup],
        n_simulations: usize,
        use_correlations: bool,
    ) -> Result<Vec<Arc<SimulationResult>>, SimulationError> {
        let start = Instant::now();
        let results = self.workers.install(|| {
            lineups
                .par_iter()
                .map(|lineup| self.run_simulations(lineup, n_simulations, use_correlations))
                .collect::<Result<Vec<_>, _>>()
        })?;

        info!(
            lineups = lineups.len(),
            n_simulations,
            correlated = use_correlations,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch simulation finished"
        );
        Ok(results)
    }

    fn simulate(
        &self,
        lineup: &Lineup,
        n_simulations: usize,
        use_correlations: bool,
        stream: u64,
    ) -> Result<SimulationResult, SimulationError> {
        let start = Instant::now();
        let distributions: Vec<_> = lineup.players().map(|p| self.distribution_for(p)).collect();

        let mut rng = ChaCha8Rng::seed_from_u64(self.base_seed);
        rng.set_stream(stream);

        let mut samples = sample_matrix(
            &distributions,
            n_simulations,
            self.config.distribution,
            &mut rng,
        );

        let mut correlated = false;
        if use_correlations {
            let matrix = self.correlations.build(&distributions);
            if !is_identity(&matrix) {
                match apply_correlation(&samples, &distributions, matrix) {
                    Some(transformed) => {
                        samples = transformed;
                        correlated = true;
                    }
                    None => {
                        warn!(
                            lineup = lineup.lineup_id(),
                            "Correlation matrix is not positive definite, using independent draws"
                        );
                        record_correlation_fallback();
                    }
                }
            }
        }

        let totals: Vec<f64> = samples.row_iter().map(|row| row.sum()).collect();
        let result = SimulationResult::from_samples(totals)?;

        let elapsed = start.elapsed();
        record_simulation(n_simulations, correlated, elapsed.as_secs_f64());
        debug!(
            lineup = lineup.lineup_id(),
            n_simulations,
            correlated,
            mean = result.mean,
            std_dev = result.std_dev,
            elapsed_ms = elapsed.as_millis() as u64,
            "Lineup simulated"
        );
        Ok(result)
    }
}

/// Impose `correlation` on independent draws (one column per player).
///
/// Columns are standardised with their sample moments, mixed through the
/// Cholesky factor and rescaled to the same moments, then clipped at zero.
/// Zero-spread columns pass through untouched. Returns `None` when the
/// matrix is not positive definite.
fn apply_correlation(
    samples: &DMatrix<f64>,
    distributions: &[ProjectionDistribution],
    correlation: DMatrix<f64>,
) -> Option<DMatrix<f64>> {
    let lower = correlation.cholesky()?.l();
    let (rows, cols) = samples.shape();

    let moments: Vec<(f64, f64)> = (0..cols)
        .map(|j| {
            let column = samples.column(j);
            let spread = if distributions[j].std_deviation() == 0.0 {
                0.0
            } else {
                column.variance().sqrt()
            };
            (column.mean(), spread)
        })
        .collect();

    let standardized = DMatrix::from_fn(rows, cols, |i, j| {
        let (mean, spread) = moments[j];
        if spread > 0.0 { (samples[(i, j)] - mean) / spread } else { 0.0 }
    });
    let mixed = standardized * lower.transpose();

    Some(DMatrix::from_fn(rows, cols, |i, j| {
        let (mean, spread) = moments[j];
        if spread > 0.0 {
            (mean + spread * mixed[(i, j)]).max(0.0)
        } else {
            samples[(i, j)]
        }
    }))
}
