//! Metrics for the lineup engine.
//!
//! Recorded through the `metrics` facade. Without an installed recorder these
//! calls are no-ops, so the embedding application decides where they go.
//!
//! # Example
//!
//! ```ignore
//! use lineup_engine::observability::record_solve;
//!
//! record_solve("optimal", 0.042);
//! ```

use metrics::{counter, histogram};

/// Record one solver run.
pub fn record_solve(status: &'static str, duration_secs: f64) {
    counter!("lineup_solves_total", "status" => status).increment(1);
    histogram!("lineup_solve_duration_seconds", "status" => status).record(duration_secs);
}

/// Record the outcome of a batch.
pub fn record_batch(requested: usize, generated: usize, stopped_early: bool) {
    counter!("lineup_batches_total", "complete" => if stopped_early { "false" } else { "true" })
        .increment(1);
    counter!("lineups_requested_total").increment(requested as u64);
    counter!("lineups_generated_total").increment(generated as u64);
}

/// Record a simulation cache lookup.
pub fn record_cache_lookup(hit: bool) {
    counter!("simulation_cache_lookups_total", "result" => if hit { "hit" } else { "miss" })
        .increment(1);
}

/// Record a completed simulation.
pub fn record_simulation(n_draws: usize, correlated: bool, duration_secs: f64) {
    let mode = if correlated { "correlated" } else { "independent" };
    counter!("simulations_total", "mode" => mode).increment(1);
    counter!("simulation_draws_total").increment(n_draws as u64);
    histogram!("simulation_duration_seconds", "mode" => mode).record(duration_secs);
}

/// Record a fallback to uncorrelated sampling.
pub fn record_correlation_fallback() {
    counter!("simulation_correlation_fallbacks_total").increment(1);
}
