//! Domain validation errors.
//!
//! Every malformed input is surfaced here at construction time. Nothing in the
//! domain layer coerces or silently drops a bad value.

use thiserror::Error;

/// Errors raised while constructing players, pools, distributions, lineups
/// and portfolios.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required column is missing from an input row.
    #[error("row {row}: missing required field '{field}'")]
    MissingField {
        /// Zero-based row index in the input.
        row: usize,
        /// Name of the missing column.
        field: &'static str,
    },

    /// Position string could not be mapped to a roster position.
    #[error("{player}: invalid position '{value}' (expected QB, RB, WR, TE or DST)")]
    InvalidPosition {
        /// Player name (or row label when the name is unknown).
        player: String,
        /// Raw position value.
        value: String,
    },

    /// Salary outside the configured site bounds.
    #[error("{player}: salary {salary} outside [{min}, {max}]")]
    SalaryOutOfRange {
        /// Player name.
        player: String,
        /// Offending salary.
        salary: i64,
        /// Lower bound (inclusive).
        min: u32,
        /// Upper bound (inclusive).
        max: u32,
    },

    /// Projection must be a finite positive number.
    #[error("{player}: projection must be positive, got {value}")]
    InvalidProjection {
        /// Player name.
        player: String,
        /// Offending projection.
        value: f64,
    },

    /// Ownership must be a percentage.
    #[error("{player}: ownership {value} outside [0, 100]")]
    OwnershipOutOfRange {
        /// Player name.
        player: String,
        /// Offending ownership.
        value: f64,
    },

    /// An optional numeric column holds NaN or infinity.
    #[error("{player}: {field} must be finite, got {value}")]
    NonFiniteValue {
        /// Player name.
        player: String,
        /// Column name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Unknown selection state.
    #[error("{player}: invalid selection state '{value}'")]
    InvalidSelection {
        /// Player name.
        player: String,
        /// Raw selection value.
        value: String,
    },

    /// Two rows share a player name.
    #[error("duplicate player '{name}' in pool")]
    DuplicatePlayer {
        /// Duplicated name.
        name: String,
    },

    /// The pool has no players.
    #[error("player pool is empty")]
    EmptyPool,

    /// Standard deviation below zero.
    #[error("{player}: std_deviation must be >= 0, got {value}")]
    NegativeStdDeviation {
        /// Player name.
        player: String,
        /// Offending value.
        value: f64,
    },

    /// Ceiling percentile below the floor percentile.
    #[error("{player}: ceiling_95th ({ceiling}) is below floor_5th ({floor})")]
    CeilingBelowFloor {
        /// Player name.
        player: String,
        /// Floor value.
        floor: f64,
        /// Ceiling value.
        ceiling: f64,
    },

    /// Mean outside its own percentile band.
    #[error("{player}: mean_projection {mean} outside [{floor}, {ceiling}]")]
    MeanOutsideRange {
        /// Player name.
        player: String,
        /// Mean value.
        mean: f64,
        /// Floor value.
        floor: f64,
        /// Ceiling value.
        ceiling: f64,
    },

    /// A lineup violated a roster invariant.
    #[error("invalid lineup: {reason}")]
    InvalidLineup {
        /// Which invariant failed.
        reason: String,
    },

    /// A lineup breaks the same-team concentration rules.
    #[error("stacking rule violated: {reason}")]
    StackingRule {
        /// Which concentration rule failed.
        reason: String,
    },

    /// A portfolio needs at least one lineup.
    #[error("portfolio must contain at least one lineup")]
    EmptyPortfolio,

    /// A request or call parameter is outside its domain.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidLineup`].
    pub fn lineup(reason: impl Into<String>) -> Self {
        Self::InvalidLineup {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ValidationError::InvalidParameter`].
    pub fn parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}
