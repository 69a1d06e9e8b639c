//! Top-level error type.
//!
//! Each layer owns its error enum; [`EngineError`] wraps them so callers that
//! drive the whole pipeline (load config, build the pool, optimize, simulate)
//! can propagate with `?`.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | `Config` | YAML loading, interpolation, validation, profile lookup |
//! | `Validation` | Player rows, lineups, distributions, portfolios |
//! | `Optimizer` | Rejected generation requests |
//! | `Simulation` | Worker pool setup, bad draw counts |
//!
//! An infeasible round is not an error: it ends the batch and is reported
//! through [`crate::optimizer::GenerationOutcome::diagnostic`].

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::ValidationError;
use crate::optimizer::OptimizerError;
use crate::simulation::SimulationError;

/// Any failure from the lineup engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input data failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The optimizer rejected the request.
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),

    /// Simulation failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

impl EngineError {
    /// Stable code for logs and exit reporting.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Optimizer(_) => "INVALID_REQUEST",
            Self::Simulation(_) => "SIMULATION",
        }
    }
}
