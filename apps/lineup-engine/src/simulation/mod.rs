//! Monte Carlo simulation of lineup scores.
//!
//! Per-player distributions are sampled independently, optionally mixed
//! through the Cholesky factor of a rule-based correlation matrix, and summed
//! per draw into a lineup score distribution. Results are cached by roster.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lineup_engine::simulation::SimulationEngine;
//!
//! let engine = SimulationEngine::new(config.simulation.clone())?;
//! let result = engine.run_simulations(&lineup, 10_000, true)?;
//! println!("{result}");
//! ```

pub mod cache;
pub mod correlation;
pub mod distribution;
mod engine;
pub mod report;
mod result;

pub use cache::{SimulationCache, SimulationKey};
pub use correlation::CorrelationMatrixBuilder;
pub use distribution::ProjectionDistribution;
pub use engine::{SimulationEngine, SimulationError};
pub use report::{LineupRisk, PortfolioRiskReport};
pub use result::SimulationResult;
