//! Running per-player appearance counts for a batch.

use std::collections::HashMap;

use crate::domain::Lineup;

/// How many accepted lineups each player appears in.
#[derive(Debug, Clone, Default)]
pub struct ExposureLedger {
    counts: HashMap<String, usize>,
}

impl ExposureLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-filled from `lineups`.
    pub fn from_lineups(lineups: &[Lineup]) -> Self {
        let mut ledger = Self::new();
        for lineup in lineups {
            ledger.record(lineup);
        }
        ledger
    }

    /// Count every player in `lineup` once more.
    pub fn record(&mut self, lineup: &Lineup) {
        for player in lineup.players() {
            *self.counts.entry(player.name().to_string()).or_insert(0) += 1;
        }
    }

    /// Appearances of `name`.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// True once `name` has reached `limit` appearances.
    pub fn is_saturated(&self, name: &str, limit: usize) -> bool {
        self.count(name) >= limit
    }

    /// Names at or above `limit`, sorted.
    pub fn saturated(&self, limit: usize) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .counts
            .iter()
            .filter(|(_, count)| **count >= limit)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}
