// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Lineup Engine - Rust Core Library
//!
//! Daily fantasy football lineup optimizer with correlated Monte Carlo risk
//! simulation.
//!
//! # Architecture
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Players, pools, lineups, portfolios, stacking analysis
//!   - Validated on construction, no solver or sampling dependencies
//!
//! - **Optimizer**: One binary integer program per lineup
//!   - `constraints`: Pluggable roster rules (salary, positions, diversity, stacking, safety)
//!   - `solver`: MILP backend with a wall-clock cutoff
//!   - `diagnostics`: Ranked relaxation hints when a round fails
//!
//! - **Simulation**: Monte Carlo lineup scoring
//!   - `distribution`: Per-player normal / lognormal draws
//!   - `correlation`: Rule-based correlation matrix, applied via Cholesky
//!   - `cache`: LRU + TTL result cache keyed by roster content
//!
//! - **Ambient**: YAML configuration, tracing, metrics
//!
//! # Pipeline
//!
//! ```text
//! PlayerPool → LineupOptimizer → Lineups → Portfolio
//!                                   ↓
//!                           SimulationEngine → PortfolioRiskReport
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Layers
// =============================================================================

/// Domain layer - Roster business objects.
pub mod domain;

/// Lineup optimizer - Integer programming per lineup.
pub mod optimizer;

/// Monte Carlo simulation - Lineup score distributions.
pub mod simulation;

// =============================================================================
// Ambient Modules
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Top-level error type.
pub mod error;

/// Metrics recording.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{Config, ConfigError, load_config, load_config_from_string};
pub use domain::{
    Lineup, Player, PlayerPool, PlayerRecord, Portfolio, Position, StackingAnalysis,
    ValidationError,
};
pub use error::EngineError;
pub use optimizer::{
    GenerationOutcome, GenerationRequest, InfeasibilityDiagnostic, LineupOptimizer,
    OptimizerError,
};
pub use simulation::{
    PortfolioRiskReport, ProjectionDistribution, SimulationEngine, SimulationError,
    SimulationResult,
};
