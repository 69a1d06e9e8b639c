//! Sequential batch generation.
//!
//! Each round depends on every lineup accepted before it (uniqueness and
//! exposure), so rounds never run in parallel. The first round that does not
//! solve to optimality ends the batch; everything accepted so far is
//! returned together with a diagnostic.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, warn};

use crate::config::OptimizerConfig;
use crate::domain::{Lineup, PlayerPool, Portfolio, ValidationError};
use crate::observability::{record_batch, record_solve};

use super::constraints::{ConstraintSet, RoundContext};
use super::diagnostics::InfeasibilityDiagnostic;
use super::ledger::ExposureLedger;
use super::request::GenerationRequest;
use super::solver::{self, SolveStatus};

/// Errors that prevent a batch from starting.
#[derive(Debug, Error)]
pub enum OptimizerError {
    /// The request failed validation.
    #[error("invalid generation request: {0}")]
    InvalidRequest(#[from] ValidationError),
}

/// Lineups built before the batch finished or stopped.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    /// Accepted lineups in generation order.
    #[serde(skip)]
    pub lineups: Vec<Lineup>,
    /// Why the batch stopped early, if it did.
    pub diagnostic: Option<InfeasibilityDiagnostic>,
}

impl GenerationOutcome {
    /// True when every requested lineup was built.
    pub const fn is_complete(&self) -> bool {
        self.diagnostic.is_none()
    }

    /// Formatted stop reason, if any.
    pub fn error_message(&self) -> Option<String> {
        self.diagnostic.as_ref().map(ToString::to_string)
    }

    /// Wrap the accepted lineups in a portfolio. Fails when none were built.
    pub fn into_portfolio(self, portfolio_id: impl Into<String>) -> Result<Portfolio, ValidationError> {
        Portfolio::new(portfolio_id, self.lineups)
    }
}

/// Builds lineups from a player pool, one integer program per lineup.
#[derive(Debug)]
pub struct LineupOptimizer {
    config: OptimizerConfig,
    rules: ConstraintSet,
}

impl LineupOptimizer {
    /// Optimizer with every built-in rule.
    pub fn new(config: OptimizerConfig) -> Self {
        Self::with_rules(config, ConstraintSet::standard())
    }

    /// Optimizer with a custom rule set.
    pub const fn with_rules(config: OptimizerConfig, rules: ConstraintSet) -> Self {
        Self { config, rules }
    }

    /// Active configuration.
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Active rules.
    pub const fn rules(&self) -> &ConstraintSet {
        &self.rules
    }

    /// Generate up to `request.lineup_count` lineups.
    ///
    /// Partial success is a normal return: check
    /// [`GenerationOutcome::diagnostic`].
    pub fn generate_lineups(
        &self,
        pool: &PlayerPool,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, OptimizerError> {
        request.validate()?;

        info!(
            pool_size = pool.len(),
            lineup_count = request.lineup_count,
            uniqueness = request.uniqueness_pct,
            max_shared = request.max_shared_players(),
            exposure_limit = request.exposure_limit(),
            stacking = request.stacking_enabled,
            "Generating lineups"
        );

        let mut lineups: Vec<Lineup> = Vec::with_capacity(request.lineup_count);
        let mut ledger = ExposureLedger::new();
        let mut diagnostic = None;

        for round in 0..request.lineup_count {
            let lineup_number = round + 1;
            let _span = info_span!("optimize_round", lineup = lineup_number).entered();

            match self.solve_round(pool, request, &lineups, &ledger, lineup_number) {
                Ok(lineup) => {
                    info!(
                        lineup = lineup_number,
                        salary = lineup.total_salary(),
                        projection = lineup.total_projection(),
                        "Lineup accepted"
                    );
                    ledger.record(&lineup);
                    lineups.push(lineup);
                }
                Err(stop) => {
                    warn!(lineup = lineup_number, status = stop.status.as_str(), "{stop}");
                    diagnostic = Some(stop);
                    break;
                }
            }
        }

        record_batch(request.lineup_count, lineups.len(), diagnostic.is_some());
        info!(
            generated = lineups.len(),
            requested = request.lineup_count,
            "Lineup generation finished"
        );

        Ok(GenerationOutcome {
            lineups,
            diagnostic,
        })
    }

    fn solve_round(
        &self,
        pool: &PlayerPool,
        request: &GenerationRequest,
        accepted: &[Lineup],
        ledger: &ExposureLedger,
        lineup_number: usize,
    ) -> Result<Lineup, InfeasibilityDiagnostic> {
        let ctx = RoundContext {
            pool,
            request,
            config: &self.config,
            accepted,
            exposure: ledger,
        };

        let formulation = self.rules.formulate(&ctx);
        let outcome = solver::solve(formulation, self.config.solve_timeout());
        record_solve(outcome.status.as_str(), outcome.elapsed.as_secs_f64());

        if !outcome.status.is_optimal() {
            return Err(InfeasibilityDiagnostic::diagnose(
                lineup_number,
                outcome.status,
                outcome.detail,
                &ctx,
            ));
        }

        let players = outcome
            .selected
            .iter()
            .filter_map(|&i| pool.get(i).map(Arc::clone))
            .collect();

        Lineup::from_players(lineup_number as u32, players, self.config.salary_cap).map_err(|e| {
            InfeasibilityDiagnostic::diagnose(
                lineup_number,
                SolveStatus::NotSolved,
                Some(e.to_string()),
                &ctx,
            )
        })
    }
}
