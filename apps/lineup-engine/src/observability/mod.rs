//! Observability module for metrics.
//!
//! Counters and histograms for solver runs, batch outcomes and simulations.

mod metrics;

pub use metrics::{
    record_batch, record_cache_lookup, record_correlation_fallback, record_simulation,
    record_solve,
};
