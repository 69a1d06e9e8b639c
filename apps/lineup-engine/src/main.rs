//! Lineup Engine Binary
//!
//! Builds a lineup portfolio from a player pool and prints its simulated
//! risk profile.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin lineup-engine -- players.json
//! ```
//!
//! # Environment Variables
//!
//! - `LINEUP_ENGINE_CONFIG`: Config file path (default: `config.yaml` when present)
//! - `LINEUP_ENGINE_PROFILE`: Named generation preset from `profiles:`
//! - `RUST_LOG`: Log level override

use std::path::Path;

use anyhow::{Context, bail};
use lineup_engine::PlayerPool;
use lineup_engine::config::{Config, load_config};
use lineup_engine::optimizer::{GenerationRequest, LineupOptimizer};
use lineup_engine::simulation::{PortfolioRiskReport, SimulationEngine};
use lineup_engine::telemetry::init_tracing;

/// Config file used when `LINEUP_ENGINE_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Stacking penalty weight for the printed report.
const REPORT_STACKING_WEIGHT: f64 = 1.0;

fn main() -> anyhow::Result<()> {
    let config = resolve_config()?;
    init_tracing(&config.observability.logging);

    let Some(pool_path) = std::env::args().nth(1) else {
        bail!("usage: lineup-engine <pool.json>");
    };

    tracing::info!(pool = %pool_path, "Starting lineup engine");

    let json = std::fs::read_to_string(&pool_path)
        .with_context(|| format!("failed to read player pool '{pool_path}'"))?;
    let pool = PlayerPool::from_json(&json, &config.optimizer.salary_bounds)?;

    let request = match std::env::var("LINEUP_ENGINE_PROFILE") {
        Ok(name) => {
            tracing::info!(profile = %name, "Using generation profile");
            config.profile(&name)?.clone()
        }
        Err(_) => GenerationRequest::default(),
    };

    let optimizer = LineupOptimizer::new(config.optimizer.clone());
    let outcome = optimizer.generate_lineups(&pool, &request)?;

    for lineup in &outcome.lineups {
        println!("{lineup}\n");
    }
    if let Some(message) = outcome.error_message() {
        eprintln!("{message}");
    }
    if outcome.lineups.is_empty() {
        bail!("no lineups generated");
    }

    let portfolio = outcome.into_portfolio("cli")?;
    let engine = SimulationEngine::new(config.simulation.clone())?;
    let report = PortfolioRiskReport::build(&portfolio, &engine, None, REPORT_STACKING_WEIGHT)?;
    print!("{report}");

    tracing::info!(lineups = portfolio.lineup_count(), "Lineup engine finished");
    Ok(())
}

fn resolve_config() -> anyhow::Result<Config> {
    match std::env::var("LINEUP_ENGINE_CONFIG") {
        Ok(path) => Ok(load_config(Some(&path))?),
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Ok(load_config(None)?),
        Err(_) => Ok(Config::default()),
    }
}
