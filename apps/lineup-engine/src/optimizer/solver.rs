//! Single-round MILP solve with a wall-clock limit.
//!
//! The solve runs on a dedicated thread so the caller can stop waiting after
//! the configured limit. The abandoned solve finishes in the background and
//! its result is discarded.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use good_lp::{ResolutionError, Solution, SolverModel, default_solver};
use serde::Serialize;
use tracing::{debug, warn};

use super::constraints::Formulation;

/// Solver outcome for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// No feasible roster exists.
    Infeasible,
    /// Objective unbounded; indicates a malformed model.
    Unbounded,
    /// Solver errored or returned something unusable.
    NotSolved,
    /// Wall-clock limit hit.
    TimedOut,
}

impl SolveStatus {
    /// Metric/log label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Infeasible => "infeasible",
            Self::Unbounded => "unbounded",
            Self::NotSolved => "not_solved",
            Self::TimedOut => "timed_out",
        }
    }

    /// Only `Optimal` yields a lineup.
    pub const fn is_optimal(self) -> bool {
        matches!(self, Self::Optimal)
    }
}

/// Result of [`solve`].
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Status.
    pub status: SolveStatus,
    /// Selected pool indices (empty unless optimal).
    pub selected: Vec<usize>,
    /// Wall-clock time spent waiting.
    pub elapsed: Duration,
    /// Solver message for non-optimal outcomes.
    pub detail: Option<String>,
}

impl SolveOutcome {
    fn failed(status: SolveStatus, elapsed: Duration, detail: impl Into<String>) -> Self {
        Self {
            status,
            selected: Vec::new(),
            elapsed,
            detail: Some(detail.into()),
        }
    }
}

/// Solve `formulation`, waiting at most `timeout` (forever when `None`).
pub fn solve(formulation: Formulation, timeout: Option<Duration>) -> SolveOutcome {
    let started = Instant::now();
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("lineup-solver".to_string())
        .spawn(move || {
            // Receiver may be gone after a timeout.
            let _ = tx.send(run(formulation));
        });
    if let Err(e) = spawned {
        return SolveOutcome::failed(
            SolveStatus::NotSolved,
            started.elapsed(),
            format!("could not start solver thread: {e}"),
        );
    }

    let received = match timeout {
        Some(limit) => rx.recv_timeout(limit).map_err(|e| match e {
            mpsc::RecvTimeoutError::Timeout => SolveStatus::TimedOut,
            mpsc::RecvTimeoutError::Disconnected => SolveStatus::NotSolved,
        }),
        None => rx.recv().map_err(|_| SolveStatus::NotSolved),
    };
    let elapsed = started.elapsed();

    match received {
        Ok(Ok(selected)) => {
            debug!(
                selected = selected.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Solve finished"
            );
            SolveOutcome {
                status: SolveStatus::Optimal,
                selected,
                elapsed,
                detail: None,
            }
        }
        Ok(Err(e)) => {
            let status = match e {
                ResolutionError::Infeasible => SolveStatus::Infeasible,
                ResolutionError::Unbounded => SolveStatus::Unbounded,
                _ => SolveStatus::NotSolved,
            };
            SolveOutcome::failed(status, elapsed, e.to_string())
        }
        Err(SolveStatus::TimedOut) => {
            warn!(limit_ms = timeout.map_or(0, |t| t.as_millis() as u64), "Solve timed out");
            SolveOutcome::failed(SolveStatus::TimedOut, elapsed, "time limit reached")
        }
        Err(status) => SolveOutcome::failed(status, elapsed, "solver thread exited without a result"),
    }
}

fn run(formulation: Formulation) -> Result<Vec<usize>, ResolutionError> {
    let Formulation {
        variables,
        picks,
        objective,
        constraints,
    } = formulation;

    let mut model = variables.maximise(objective).using(default_solver);
    for labeled in constraints {
        model.add_constraint(labeled.constraint);
    }
    let solution = model.solve()?;

    Ok(picks
        .iter()
        .enumerate()
        .filter(|(_, pick)| solution.value(**pick) > 0.5)
        .map(|(i, _)| i)
        .collect())
}
