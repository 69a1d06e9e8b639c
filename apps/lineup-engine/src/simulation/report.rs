//! Portfolio risk report.

use std::fmt;

use serde::Serialize;

use crate::domain::{Portfolio, PortfolioSummary, StackingAnalysis};

use super::engine::{SimulationEngine, SimulationError};

/// Simulated risk profile of one lineup.
#[derive(Debug, Clone, Serialize)]
pub struct LineupRisk {
    /// Lineup identifier.
    pub lineup_id: u32,
    /// Sum of player projections.
    pub projection: f64,
    /// Simulated mean.
    pub mean: f64,
    /// Simulated median.
    pub median: f64,
    /// Simulated standard deviation.
    pub std_dev: f64,
    /// 5th percentile.
    pub floor_5th: f64,
    /// 95th percentile.
    pub ceiling_95th: f64,
    /// Chance of beating the cash line, when one was given.
    pub cash_probability: Option<f64>,
    /// Team concentration.
    pub stacking: StackingAnalysis,
    /// Broken concentration rule, if any.
    pub stacking_violation: Option<String>,
}

/// Portfolio summary plus per-lineup simulation results.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioRiskReport {
    /// Exposure and projection summary.
    pub summary: PortfolioSummary,
    /// Draws per lineup.
    pub n_simulations: usize,
    /// Whether correlations were applied.
    pub correlated: bool,
    /// One entry per lineup, in portfolio order.
    pub lineups: Vec<LineupRisk>,
}

impl PortfolioRiskReport {
    /// Simulate every lineup in `portfolio` with the engine's defaults.
    ///
    /// # Errors
    ///
    /// Returns error if any lineup fails to simulate.
    pub fn build(
        portfolio: &Portfolio,
        engine: &SimulationEngine,
        cash_line: Option<f64>,
        stacking_weight: f64,
    ) -> Result<Self, SimulationError> {
        let n_simulations = engine.config().n_simulations;
        let correlated = engine.config().use_correlations;
        let results =
            engine.run_simulations_batch(portfolio.lineups(), n_simulations, correlated)?;

        let lineups = portfolio
            .lineups()
            .iter()
            .zip(results)
            .map(|(lineup, result)| {
                let stacking = StackingAnalysis::of(lineup, stacking_weight);
                LineupRisk {
                    lineup_id: lineup.lineup_id(),
                    projection: lineup.total_projection(),
                    mean: result.mean,
                    median: result.median,
                    std_dev: result.std_dev,
                    floor_5th: result.floor_5th,
                    ceiling_95th: result.ceiling_95th,
                    cash_probability: cash_line.map(|line| result.cash_probability(line)),
                    stacking_violation: stacking.validate().err().map(|e| e.to_string()),
                    stacking,
                }
            })
            .collect();

        Ok(Self {
            summary: portfolio.summary(),
            n_simulations,
            correlated,
            lineups,
        })
    }

    /// Lineup with the highest simulated ceiling.
    pub fn highest_ceiling(&self) -> Option<&LineupRisk> {
        self.lineups
            .iter()
            .max_by(|a, b| a.ceiling_95th.total_cmp(&b.ceiling_95th))
    }
}

impl fmt::Display for PortfolioRiskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Portfolio {} ({} lineups, avg projection {:.2}, variance {:.2})",
            self.summary.portfolio_id,
            self.summary.lineup_count,
            self.summary.average_projection,
            self.summary.projection_variance
        )?;
        if !self.summary.core_players.is_empty() {
            writeln!(f, "Core: {}", self.summary.core_players.join(", "))?;
        }
        for risk in &self.lineups {
            write!(
                f,
                "  #{:<3} proj {:>6.2}  mean {:>6.2}  floor {:>6.2}  ceiling {:>6.2}  sd {:>5.2}",
                risk.lineup_id, risk.projection, risk.mean, risk.floor_5th, risk.ceiling_95th, risk.std_dev
            )?;
            if let Some(p) = risk.cash_probability {
                write!(f, "  cash {:>5.1}%", p * 100.0)?;
            }
            write!(f, "  [{}]", risk.stacking.summary())?;
            if let Some(violation) = &risk.stacking_violation {
                write!(f, "  !! {violation}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
