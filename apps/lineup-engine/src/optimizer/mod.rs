//! Lineup optimizer.
//!
//! Formulates one binary integer program per lineup and solves the rounds of
//! a batch in sequence.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lineup_engine::optimizer::{GenerationRequest, LineupOptimizer};
//!
//! let optimizer = LineupOptimizer::new(config.optimizer.clone());
//! let request = GenerationRequest::new(20).with_uniqueness(0.6).with_max_exposure(0.4);
//! let outcome = optimizer.generate_lineups(&pool, &request)?;
//! if let Some(diagnostic) = &outcome.diagnostic {
//!     eprintln!("{diagnostic}");
//! }
//! ```

pub mod constraints;
pub mod diagnostics;
mod engine;
pub mod ledger;
mod request;
pub mod solver;

pub use constraints::{ConstraintSet, Formulation, RosterRule, RoundContext};
pub use diagnostics::{InfeasibilityDiagnostic, Relaxation};
pub use engine::{GenerationOutcome, LineupOptimizer, OptimizerError};
pub use ledger::ExposureLedger;
pub use request::GenerationRequest;
pub use solver::{SolveOutcome, SolveStatus};
