//! Portfolio aggregate.
//!
//! A portfolio is a non-empty batch of lineups. All metrics are computed on
//! demand from the lineups; nothing is cached.

use std::collections::BTreeMap;

use nalgebra::DMatrix;
use serde::Serialize;

use super::errors::ValidationError;
use super::lineup::{Lineup, ROSTER_SIZE};

/// Default exposure (percent) at or above which a player is "core".
pub const DEFAULT_CORE_EXPOSURE: f64 = 75.0;

/// Default exposure (percent) at or below which a player is a differentiator.
pub const DEFAULT_DIFFERENTIATION_EXPOSURE: f64 = 25.0;

/// Ordered set of lineups.
#[derive(Debug, Clone)]
pub struct Portfolio {
    portfolio_id: String,
    lineups: Vec<Lineup>,
}

/// Flat summary for logging and JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSummary {
    /// Identifier.
    pub portfolio_id: String,
    /// Number of lineups.
    pub lineup_count: usize,
    /// Mean lineup projection.
    pub average_projection: f64,
    /// Population variance of lineup projections.
    pub projection_variance: f64,
    /// Players in at least 75% of lineups.
    pub core_players: Vec<String>,
    /// Players in at most 25% of lineups.
    pub differentiation_players: Vec<String>,
}

impl Portfolio {
    /// Build a portfolio. Fails on an empty lineup list.
    pub fn new(portfolio_id: impl Into<String>, lineups: Vec<Lineup>) -> Result<Self, ValidationError> {
        if lineups.is_empty() {
            return Err(ValidationError::EmptyPortfolio);
        }
        Ok(Self {
            portfolio_id: portfolio_id.into(),
            lineups,
        })
    }

    /// Identifier.
    pub fn portfolio_id(&self) -> &str {
        &self.portfolio_id
    }

    /// Lineups in generation order.
    pub fn lineups(&self) -> &[Lineup] {
        &self.lineups
    }

    /// Number of lineups.
    pub fn lineup_count(&self) -> usize {
        self.lineups.len()
    }

    /// Player name -> percent of lineups containing the player.
    pub fn total_exposure(&self) -> BTreeMap<String, f64> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for lineup in &self.lineups {
            for player in lineup.players() {
                *counts.entry(player.name().to_string()).or_insert(0) += 1;
            }
        }
        let total = self.lineups.len() as f64;
        counts
            .into_iter()
            .map(|(name, count)| (name, count as f64 / total * 100.0))
            .collect()
    }

    /// Lineup-by-lineup overlap: shared players / 9, unit diagonal.
    pub fn get_correlation_matrix(&self) -> DMatrix<f64> {
        let n = self.lineups.len();
        DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                1.0
            } else {
                self.lineups[i].shared_with(&self.lineups[j]) as f64 / ROSTER_SIZE as f64
            }
        })
    }

    /// Players with exposure >= `min_exposure`, sorted by name.
    pub fn get_core_players(&self, min_exposure: f64) -> Vec<String> {
        self.total_exposure()
            .into_iter()
            .filter(|(_, exposure)| *exposure >= min_exposure)
            .map(|(name, _)| name)
            .collect()
    }

    /// Players with exposure <= `max_exposure`, sorted by name.
    pub fn get_differentiation_players(&self, max_exposure: f64) -> Vec<String> {
        self.total_exposure()
            .into_iter()
            .filter(|(_, exposure)| *exposure <= max_exposure)
            .map(|(name, _)| name)
            .collect()
    }

    /// Population variance of lineup total projections; 0 for one lineup.
    pub fn portfolio_variance(&self) -> f64 {
        if self.lineups.len() < 2 {
            return 0.0;
        }
        let mean = self.average_projection();
        let n = self.lineups.len() as f64;
        self.lineups
            .iter()
            .map(|l| (l.total_projection() - mean).powi(2))
            .sum::<f64>()
            / n
    }

    /// Mean lineup total projection.
    pub fn average_projection(&self) -> f64 {
        self.lineups.iter().map(Lineup::total_projection).sum::<f64>() / self.lineups.len() as f64
    }

    /// Summary using the default core/differentiation thresholds.
    pub fn summary(&self) -> PortfolioSummary {
        PortfolioSummary {
            portfolio_id: self.portfolio_id.clone(),
            lineup_count: self.lineup_count(),
            average_projection: self.average_projection(),
            projection_variance: self.portfolio_variance(),
            core_players: self.get_core_players(DEFAULT_CORE_EXPOSURE),
            differentiation_players: self
                .get_differentiation_players(DEFAULT_DIFFERENTIATION_EXPOSURE),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::lineup::DEFAULT_SALARY_CAP;
    use crate::domain::player::{Player, PlayerRecord, SalaryBounds};

    fn player(name: &str, position: &str, projection: f64) -> Arc<Player> {
        let record = PlayerRecord::new(name, position, 5_000, projection, "KC", "BUF");
        Arc::new(Player::from_record(0, record, &SalaryBounds::default()).unwrap())
    }

    /// Lineup built from the shared core plus a distinct second WR.
    fn lineup(id: u32, wr_name: &str, wr_projection: f64) -> Lineup {
        let players = vec![
            player("QB", "QB", 20.0),
            player("RB1", "RB", 15.0),
            player("RB2", "RB", 14.0),
            player("RB3", "RB", 13.0),
            player("WR1", "WR", 12.0),
            player(wr_name, "WR", wr_projection),
            player("WR3", "WR", 10.0),
            player("TE", "TE", 8.0),
            player("DST", "DST", 6.0),
        ];
        Lineup::from_players(id, players, DEFAULT_SALARY_CAP).unwrap()
    }

    fn portfolio() -> Portfolio {
        Portfolio::new(
            "p1",
            vec![
                lineup(1, "WR-A", 11.0),
                lineup(2, "WR-B", 11.0),
                lineup(3, "WR-C", 11.0),
                lineup(4, "WR-A", 11.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_portfolio_rejected() {
        assert_eq!(
            Portfolio::new("p", Vec::new()).unwrap_err(),
            ValidationError::EmptyPortfolio
        );
    }

    #[test]
    fn test_exposure_percentages() {
        let exposure = portfolio().total_exposure();
        assert_eq!(exposure["QB"], 100.0);
        assert_eq!(exposure["WR-A"], 50.0);
        assert_eq!(exposure["WR-B"], 25.0);
    }

    #[test]
    fn test_core_and_differentiation_players() {
        let p = portfolio();
        let core = p.get_core_players(DEFAULT_CORE_EXPOSURE);
        assert!(core.contains(&"QB".to_string()));
        assert!(!core.contains(&"WR-A".to_string()));
        assert_eq!(
            p.get_differentiation_players(DEFAULT_DIFFERENTIATION_EXPOSURE),
            vec!["WR-B".to_string(), "WR-C".to_string()]
        );
    }

    #[test]
    fn test_correlation_matrix_overlap() {
        let matrix = portfolio().get_correlation_matrix();
        assert_eq!(matrix.nrows(), 4);
        assert_eq!(matrix[(0, 0)], 1.0);
        assert!((matrix[(0, 1)] - 8.0 / 9.0).abs() < 1e-12);
        assert_eq!(matrix[(0, 3)], 1.0);
        assert_eq!(matrix[(1, 2)], matrix[(2, 1)]);
    }

    #[test]
    fn test_variance_single_lineup_is_zero() {
        let p = Portfolio::new("solo", vec![lineup(1, "WR-A", 11.0)]).unwrap();
        assert_eq!(p.portfolio_variance(), 0.0);
    }

    #[test]
    fn test_variance_is_population_variance() {
        let p = Portfolio::new(
            "two",
            vec![lineup(1, "WR-A", 11.0), lineup(2, "WR-B", 13.0)],
        )
        .unwrap();
        // Totals differ by 2 points, so population variance is 1.
        assert!((p.portfolio_variance() - 1.0).abs() < 1e-9);
    }
}
