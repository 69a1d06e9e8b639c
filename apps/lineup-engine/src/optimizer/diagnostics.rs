//! Infeasibility diagnostics.
//!
//! Turns a non-optimal solve into a message that names the knobs most likely
//! responsible, in the order a user should try relaxing them.

use std::fmt;

use serde::Serialize;

use crate::domain::PlayerSelection;

use super::constraints::RoundContext;
use super::solver::SolveStatus;

/// One suggested relaxation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Relaxation {
    /// Lower the average smart-value floor.
    LowerSmartValueFloor {
        /// Current floor.
        current: f64,
    },
    /// Raise the ownership ceiling.
    RaiseOwnershipCap {
        /// Current cap as a fraction.
        current: f64,
    },
    /// Unlock some locked players.
    UnlockPlayers {
        /// Locked players in the pool.
        count: usize,
    },
    /// Lower the uniqueness requirement.
    LowerUniqueness {
        /// Current uniqueness as a fraction.
        current: f64,
    },
    /// Raise the exposure limit.
    RaiseExposure {
        /// Current exposure limit as a fraction.
        current: f64,
        /// Players already at the limit.
        saturated: usize,
    },
    /// Loosen upstream smart-value filters (always offered).
    LowerSmartValueFilters,
}

impl fmt::Display for Relaxation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowerSmartValueFloor { current } => {
                write!(f, "lower the Portfolio Average Smart Value (currently {current:.0})")
            }
            Self::RaiseOwnershipCap { current } => {
                write!(f, "increase Max Ownership (currently {:.0}%)", current * 100.0)
            }
            Self::UnlockPlayers { count } => write!(f, "unlock some of the {count} locked players"),
            Self::LowerUniqueness { current } => {
                write!(f, "lower Uniqueness (currently {:.0}%)", current * 100.0)
            }
            Self::RaiseExposure { current, saturated } => write!(
                f,
                "raise Max Exposure (currently {:.0}%, {saturated} players at the limit)",
                current * 100.0
            ),
            Self::LowerSmartValueFilters => f.write_str("Lower your Smart Value filter thresholds"),
        }
    }
}

/// Why a batch stopped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfeasibilityDiagnostic {
    /// 1-based number of the lineup that could not be built.
    pub lineup_number: usize,
    /// Solver status for that round.
    pub status: SolveStatus,
    /// Base cause.
    pub cause: String,
    /// Suggested relaxations, most likely first.
    pub relaxations: Vec<Relaxation>,
    /// Raw solver message, if any.
    pub solver_detail: Option<String>,
}

impl InfeasibilityDiagnostic {
    /// Diagnose a failed round.
    pub fn diagnose(
        lineup_number: usize,
        status: SolveStatus,
        solver_detail: Option<String>,
        ctx: &RoundContext<'_>,
    ) -> Self {
        let cause = match status {
            SolveStatus::Infeasible => "Constraints are too strict - no valid lineup exists".to_string(),
            SolveStatus::TimedOut => format!(
                "Solver did not finish within {} ms - treating constraints as too strict",
                ctx.config.solve_timeout_ms
            ),
            SolveStatus::Unbounded => "Problem is unbounded (internal error)".to_string(),
            SolveStatus::NotSolved | SolveStatus::Optimal => "Solver failed to run".to_string(),
        };

        let relaxations = if matches!(status, SolveStatus::Infeasible | SolveStatus::TimedOut) {
            rank_relaxations(ctx)
        } else {
            Vec::new()
        };

        Self {
            lineup_number,
            status,
            cause,
            relaxations,
            solver_detail,
        }
    }

    /// Cause plus suggestions: `"{cause}. Try: a OR b"`.
    pub fn message(&self) -> String {
        if self.relaxations.is_empty() {
            return self.cause.clone();
        }
        let suggestions: Vec<String> = self.relaxations.iter().map(ToString::to_string).collect();
        format!("{}. Try: {}", self.cause, suggestions.join(" OR "))
    }
}

impl fmt::Display for InfeasibilityDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not generate lineup {}: {}",
            self.lineup_number,
            self.message()
        )
    }
}

fn rank_relaxations(ctx: &RoundContext<'_>) -> Vec<Relaxation> {
    let request = ctx.request;
    let mut ranked = Vec::new();

    if let Some(current) = request.smart_value_floor {
        if ctx.pool.has_complete_smart_values() {
            ranked.push(Relaxation::LowerSmartValueFloor { current });
        }
    }

    if let Some(current) = request.ownership_cap {
        ranked.push(Relaxation::RaiseOwnershipCap { current });
    }

    let locked = ctx
        .pool
        .players()
        .iter()
        .filter(|p| p.selection() == PlayerSelection::Locked)
        .count();
    if locked > 0 {
        ranked.push(Relaxation::UnlockPlayers { count: locked });
    }

    if !ctx.accepted.is_empty() {
        ranked.push(Relaxation::LowerUniqueness {
            current: request.uniqueness_pct,
        });

        let saturated = ctx.exposure.saturated(request.exposure_limit()).len();
        if saturated > 0 {
            ranked.push(Relaxation::RaiseExposure {
                current: request.max_exposure_pct,
                saturated,
            });
        }
    }

    ranked.push(Relaxation::LowerSmartValueFilters);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizerConfig;
    use crate::domain::{PlayerPool, PlayerRecord, SalaryBounds};
    use crate::optimizer::GenerationRequest;
    use crate::optimizer::ledger::ExposureLedger;

    fn pool() -> PlayerPool {
        PlayerPool::from_records(
            vec![
                PlayerRecord::new("A", "QB", 7_000, 20.0, "KC", "BUF")
                    .with_smart_value(60.0)
                    .with_selection("LOCKED"),
                PlayerRecord::new("B", "RB", 6_000, 15.0, "KC", "BUF").with_smart_value(40.0),
            ],
            &SalaryBounds::default(),
        )
        .unwrap()
    }

    fn diagnose(status: SolveStatus, request: &GenerationRequest) -> InfeasibilityDiagnostic {
        let pool = pool();
        let config = OptimizerConfig::default();
        let exposure = ExposureLedger::new();
        let ctx = RoundContext {
            pool: &pool,
            request,
            config: &config,
            accepted: &[],
            exposure: &exposure,
        };
        InfeasibilityDiagnostic::diagnose(3, status, None, &ctx)
    }

    #[test]
    fn test_infeasible_message_ranks_knobs() {
        let request = GenerationRequest::new(5)
            .with_smart_value_floor(70.0)
            .with_ownership_cap(0.2);
        let diagnostic = diagnose(SolveStatus::Infeasible, &request);

        assert_eq!(
            diagnostic.relaxations,
            vec![
                Relaxation::LowerSmartValueFloor { current: 70.0 },
                Relaxation::RaiseOwnershipCap { current: 0.2 },
                Relaxation::UnlockPlayers { count: 1 },
                Relaxation::LowerSmartValueFilters,
            ]
        );
        let text = diagnostic.to_string();
        assert!(text.starts_with(
            "Could not generate lineup 3: Constraints are too strict - no valid lineup exists. Try: "
        ));
        assert!(text.contains(" OR "));
        assert!(text.ends_with("Lower your Smart Value filter thresholds"));
    }

    #[test]
    fn test_timeout_is_treated_as_infeasible() {
        let diagnostic = diagnose(SolveStatus::TimedOut, &GenerationRequest::new(1));
        assert!(diagnostic.cause.contains("did not finish"));
        assert!(!diagnostic.relaxations.is_empty());
    }

    #[test]
    fn test_unbounded_has_no_suggestions() {
        let diagnostic = diagnose(SolveStatus::Unbounded, &GenerationRequest::new(1));
        assert_eq!(diagnostic.message(), "Problem is unbounded (internal error)");
    }
}
