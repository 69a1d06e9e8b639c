//! Batch generation parameters.

use serde::{Deserialize, Serialize};

use crate::domain::{ROSTER_SIZE, ValidationError};

/// Tolerance applied before flooring so that e.g. `9 * (1 - 1/3)` lands on 6.
const FLOOR_EPSILON: f64 = 1e-9;

/// Parameters for one call to
/// [`LineupOptimizer::generate_lineups`](super::LineupOptimizer::generate_lineups).
///
/// Also the shape of a named profile in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Number of lineups to build.
    #[serde(default = "default_lineup_count")]
    pub lineup_count: usize,
    /// Required difference between any two lineups, as a fraction of the
    /// roster (0.55 means at most 4 shared players).
    #[serde(default = "default_uniqueness")]
    pub uniqueness_pct: f64,
    /// Per-player ownership ceiling as a fraction (0.25 bans players owned
    /// above 25%).
    #[serde(default)]
    pub ownership_cap: Option<f64>,
    /// Require QB stacks and a game stack.
    #[serde(default = "default_true")]
    pub stacking_enabled: bool,
    /// Minimum average smart value per rostered player.
    #[serde(default)]
    pub smart_value_floor: Option<f64>,
    /// Maximum fraction of the batch any one player may appear in.
    #[serde(default = "default_max_exposure")]
    pub max_exposure_pct: f64,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            lineup_count: default_lineup_count(),
            uniqueness_pct: default_uniqueness(),
            ownership_cap: None,
            stacking_enabled: true,
            smart_value_floor: None,
            max_exposure_pct: default_max_exposure(),
        }
    }
}

impl GenerationRequest {
    /// Request for `lineup_count` lineups with default knobs.
    pub fn new(lineup_count: usize) -> Self {
        Self {
            lineup_count,
            ..Self::default()
        }
    }

    /// Set uniqueness.
    #[must_use]
    pub const fn with_uniqueness(mut self, uniqueness_pct: f64) -> Self {
        self.uniqueness_pct = uniqueness_pct;
        self
    }

    /// Set ownership ceiling.
    #[must_use]
    pub const fn with_ownership_cap(mut self, cap: f64) -> Self {
        self.ownership_cap = Some(cap);
        self
    }

    /// Toggle stacking.
    #[must_use]
    pub const fn with_stacking(mut self, enabled: bool) -> Self {
        self.stacking_enabled = enabled;
        self
    }

    /// Set smart-value floor.
    #[must_use]
    pub const fn with_smart_value_floor(mut self, floor: f64) -> Self {
        self.smart_value_floor = Some(floor);
        self
    }

    /// Set exposure limit.
    #[must_use]
    pub const fn with_max_exposure(mut self, pct: f64) -> Self {
        self.max_exposure_pct = pct;
        self
    }

    /// Range-check every knob.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lineup_count == 0 {
            return Err(ValidationError::parameter(
                "lineup_count",
                "must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.uniqueness_pct) {
            return Err(ValidationError::parameter(
                "uniqueness_pct",
                format!("{} outside [0, 1]", self.uniqueness_pct),
            ));
        }
        if !(self.max_exposure_pct > 0.0 && self.max_exposure_pct <= 1.0) {
            return Err(ValidationError::parameter(
                "max_exposure_pct",
                format!("{} outside (0, 1]", self.max_exposure_pct),
            ));
        }
        if let Some(cap) = self.ownership_cap {
            if !(0.0..=1.0).contains(&cap) {
                return Err(ValidationError::parameter(
                    "ownership_cap",
                    format!("{cap} outside [0, 1]"),
                ));
            }
        }
        if let Some(floor) = self.smart_value_floor {
            if !floor.is_finite() {
                return Err(ValidationError::parameter(
                    "smart_value_floor",
                    "must be finite",
                ));
            }
        }
        Ok(())
    }

    /// Most players any two lineups may have in common:
    /// `floor(9 * (1 - uniqueness))`.
    pub fn max_shared_players(&self) -> usize {
        let raw = ROSTER_SIZE as f64 * (1.0 - self.uniqueness_pct);
        (raw + FLOOR_EPSILON).floor().max(0.0) as usize
    }

    /// Most lineups any player may appear in:
    /// `floor(lineup_count * max_exposure)`.
    pub fn exposure_limit(&self) -> usize {
        let raw = self.lineup_count as f64 * self.max_exposure_pct;
        (raw + FLOOR_EPSILON).floor().max(0.0) as usize
    }
}

const fn default_lineup_count() -> usize {
    1
}

const fn default_uniqueness() -> f64 {
    0.55
}

const fn default_max_exposure() -> f64 {
    1.0
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.55, 4)]
    #[test_case(0.80, 1)]
    #[test_case(0.0, 9)]
    #[test_case(1.0, 0)]
    #[test_case(1.0 / 3.0, 6)]
    fn test_max_shared_players(uniqueness: f64, expected: usize) {
        let request = GenerationRequest::new(5).with_uniqueness(uniqueness);
        assert_eq!(request.max_shared_players(), expected);
    }

    #[test_case(20, 0.3, 6)]
    #[test_case(5, 1.0, 5)]
    #[test_case(3, 0.5, 1)]
    #[test_case(1, 0.4, 0)]
    fn test_exposure_limit(count: usize, pct: f64, expected: usize) {
        let request = GenerationRequest::new(count).with_max_exposure(pct);
        assert_eq!(request.exposure_limit(), expected);
    }

    #[test]
    fn test_validation_rejects_bad_knobs() {
        assert!(GenerationRequest::new(0).validate().is_err());
        assert!(GenerationRequest::new(1).with_uniqueness(1.2).validate().is_err());
        assert!(GenerationRequest::new(1).with_max_exposure(0.0).validate().is_err());
        assert!(GenerationRequest::new(1).with_ownership_cap(-0.1).validate().is_err());
        assert!(GenerationRequest::new(3).validate().is_ok());
    }

    #[test]
    fn test_defaults_from_empty_yaml() {
        let request: GenerationRequest = serde_yaml_bw::from_str("lineup_count: 4").unwrap();
        assert_eq!(request.lineup_count, 4);
        assert!((request.uniqueness_pct - 0.55).abs() < f64::EPSILON);
        assert!(request.stacking_enabled);
        assert_eq!(request.ownership_cap, None);
    }
}
