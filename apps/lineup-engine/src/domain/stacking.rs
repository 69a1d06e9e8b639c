//! Same-team concentration analysis.
//!
//! Post-solve reporting only. The optimizer never consults these numbers.

use std::collections::BTreeMap;

use serde::Serialize;

use super::errors::ValidationError;
use super::lineup::Lineup;

/// Hard cap on the combined penalty.
const MAX_TOTAL_PENALTY: f64 = 0.50;

/// Players per team that count as a normal stack.
const FREE_STACK_SIZE: usize = 2;

/// Team concentration summary for one lineup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackingAnalysis {
    /// Team -> rostered players.
    pub team_counts: BTreeMap<String, usize>,
    /// Teams with three or more rostered players.
    pub stacking_teams: Vec<String>,
    /// Penalty in [0, 0.5].
    pub penalty: f64,
}

impl StackingAnalysis {
    /// Analyse `lineup` with the given penalty weight (0 disables, 1 is full).
    pub fn of(lineup: &Lineup, penalty_weight: f64) -> Self {
        Self::from_counts(team_counts(lineup), penalty_weight)
    }

    fn from_counts(team_counts: BTreeMap<String, usize>, penalty_weight: f64) -> Self {
        let stacking_teams = team_counts
            .iter()
            .filter(|(_, count)| **count > FREE_STACK_SIZE)
            .map(|(team, _)| team.clone())
            .collect();
        let penalty = penalty_for_counts(&team_counts, penalty_weight);
        Self {
            team_counts,
            stacking_teams,
            penalty,
        }
    }

    /// Check the concentration rules: no team above three players and at
    /// most one team at three.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StackingRule`] naming the broken rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let max = self.team_counts.values().copied().max().unwrap_or(0);
        if max >= 4 {
            return Err(ValidationError::StackingRule {
                reason: format!("Too many players from one team (max: {max})"),
            });
        }
        if self.stacking_teams.len() > 1 {
            return Err(ValidationError::StackingRule {
                reason: format!(
                    "Multiple teams with 3+ players: {}",
                    self.stacking_teams.join(", ")
                ),
            });
        }
        Ok(())
    }

    /// One-line summary for reports.
    pub fn summary(&self) -> String {
        if self.stacking_teams.is_empty() {
            return "No stacking detected (all teams have <=2 players)".to_string();
        }
        let mut parts: Vec<String> = self
            .stacking_teams
            .iter()
            .map(|team| format!("{team}: {} players", self.team_counts[team]))
            .collect();
        if self.penalty > 0.0 {
            parts.push(format!("Penalty: {:.1}%", self.penalty * 100.0));
        }
        parts.join(" | ")
    }
}

/// Rostered players per team.
pub fn team_counts(lineup: &Lineup) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for player in lineup.players() {
        *counts.entry(player.team().to_string()).or_insert(0) += 1;
    }
    counts
}

fn penalty_for_counts(counts: &BTreeMap<String, usize>, weight: f64) -> f64 {
    let total: f64 = counts
        .values()
        .filter(|&&count| count > FREE_STACK_SIZE)
        .map(|&count| {
            let excess = (count - FREE_STACK_SIZE) as f64;
            match count {
                3 => excess * 0.10,
                4 => excess * 0.20,
                _ => (excess * 0.30).min(0.30),
            }
        })
        .sum();
    (total * weight).min(MAX_TOTAL_PENALTY)
}
