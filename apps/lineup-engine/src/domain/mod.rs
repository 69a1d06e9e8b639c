//! Domain Layer
//!
//! Roster business objects with no solver or sampling dependencies.
//!
//! - **Value Objects**: [`player::Player`], [`player::Position`], [`player::SalaryBounds`]
//! - **Aggregates**: [`pool::PlayerPool`], [`lineup::Lineup`], [`portfolio::Portfolio`]
//! - **Domain Services**: [`stacking`] concentration analysis
//!
//! Everything here validates on construction and returns
//! [`errors::ValidationError`] on bad input.

pub mod errors;
pub mod lineup;
pub mod player;
pub mod pool;
pub mod portfolio;
pub mod stacking;

pub use errors::ValidationError;
pub use lineup::{DEFAULT_SALARY_CAP, Lineup, ROSTER_SIZE, Slot};
pub use player::{Player, PlayerRecord, PlayerSelection, Position, SalaryBounds};
pub use pool::PlayerPool;
pub use portfolio::{Portfolio, PortfolioSummary};
pub use stacking::StackingAnalysis;
