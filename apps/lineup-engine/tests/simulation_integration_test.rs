//! Integration Tests for Simulation and Portfolio Flow
//!
//! Optimizer output → portfolio → batch simulation → risk report.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use lineup_engine::config::{CacheConfig, OptimizerConfig, SimulationConfig, load_config_from_string};
use lineup_engine::domain::ValidationError;
use lineup_engine::optimizer::{GenerationRequest, LineupOptimizer};
use lineup_engine::simulation::{
    PortfolioRiskReport, ProjectionDistribution, SimulationCache, SimulationEngine, SimulationKey,
};

fn simulation_config() -> SimulationConfig {
    SimulationConfig {
        n_simulations: 2_000,
        seed: Some(42),
        worker_threads: 2,
        ..SimulationConfig::default()
    }
}

fn portfolio(count: usize) -> lineup_engine::Portfolio {
    let optimizer = LineupOptimizer::new(OptimizerConfig::default());
    optimizer
        .generate_lineups(&common::slate(), &GenerationRequest::new(count))
        .unwrap()
        .into_portfolio("integration")
        .unwrap()
}

#[test]
fn test_zero_variance_simulation_matches_projection() {
    let portfolio = portfolio(1);
    let lineup = &portfolio.lineups()[0];
    let fixed: Vec<_> = lineup
        .players()
        .map(|p| {
            let mean = p.projection();
            ProjectionDistribution::new(Arc::clone(p), mean, 0.0, mean, mean).unwrap()
        })
        .collect();
    let engine = SimulationEngine::new(simulation_config())
        .unwrap()
        .with_distributions(fixed);

    let result = engine.run_simulations(lineup, 10_000, true).unwrap();
    assert!((result.mean - lineup.total_projection()).abs() < 1e-9);
    assert_eq!(result.variance, 0.0);
    assert_eq!(result.floor_5th, result.ceiling_95th);
}

#[test]
fn test_ceiling_below_floor_is_rejected() {
    let portfolio = portfolio(1);
    let player = portfolio.lineups()[0].players().next().unwrap();
    let err = ProjectionDistribution::new(Arc::clone(player), 20.0, 3.0, 18.0, 15.0).unwrap_err();
    assert!(matches!(err, ValidationError::CeilingBelowFloor { .. }));
}

#[test]
fn test_cache_identity_and_expiry() {
    let portfolio = portfolio(2);
    let [a, b] = [&portfolio.lineups()[0], &portfolio.lineups()[1]];

    assert_eq!(
        SimulationKey::for_lineup(a, 100, true),
        SimulationKey::for_lineup(&a.clone(), 100, true)
    );
    assert_ne!(
        SimulationKey::for_lineup(a, 100, true),
        SimulationKey::for_lineup(b, 100, true)
    );

    let engine = SimulationEngine::new(SimulationConfig {
        cache: CacheConfig {
            enabled: true,
            capacity: 8,
            ttl_secs: 1,
        },
        ..simulation_config()
    })
    .unwrap();
    let first = engine.run_simulations(a, 500, true).unwrap();
    let again = engine.run_simulations(a, 500, true).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    std::thread::sleep(Duration::from_millis(1_100));
    let expired = engine.run_simulations(a, 500, true).unwrap();
    assert!(!Arc::ptr_eq(&first, &expired));
    assert_eq!(first.sorted_samples(), expired.sorted_samples());
}

#[test]
fn test_cache_standalone_ttl() {
    let cache = SimulationCache::new(2, Duration::from_millis(10));
    let portfolio = portfolio(1);
    let key = SimulationKey::for_lineup(&portfolio.lineups()[0], 10, false);
    let (_, hit) = cache
        .get_or_try_insert_with(key.clone(), || {
            lineup_engine::SimulationResult::from_samples(vec![1.0; 10])
        })
        .unwrap();
    assert!(!hit);
    std::thread::sleep(Duration::from_millis(30));
    assert!(cache.get(&key).is_none());
}

#[test]
fn test_portfolio_risk_report() {
    let portfolio = portfolio(4);
    let engine = SimulationEngine::new(simulation_config()).unwrap();

    let report = PortfolioRiskReport::build(&portfolio, &engine, Some(120.0), 1.0).unwrap();

    assert_eq!(report.lineups.len(), portfolio.lineup_count());
    assert_eq!(report.summary.lineup_count, 4);
    for (risk, lineup) in report.lineups.iter().zip(portfolio.lineups()) {
        assert_eq!(risk.lineup_id, lineup.lineup_id());
        assert!(risk.floor_5th <= risk.median && risk.median <= risk.ceiling_95th);
        assert!((risk.mean - lineup.total_projection()).abs() / lineup.total_projection() < 0.05);
        let p = risk.cash_probability.unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    let exposure = portfolio.total_exposure();
    assert!(exposure.values().all(|pct| *pct > 0.0 && *pct <= 100.0));
    let matrix = portfolio.get_correlation_matrix();
    assert_eq!(matrix.shape(), (4, 4));
    assert!((0..4).all(|i| matrix[(i, i)] == 1.0));
}

#[test]
fn test_profile_from_config_drives_generation() {
    let yaml = r"
optimizer:
  solve_timeout_ms: 15000
simulation:
  n_simulations: 500
  seed: 7
profiles:
  small_field:
    lineup_count: 3
    uniqueness_pct: 0.45
";
    let config = load_config_from_string(yaml).unwrap();
    let request = config.profile("small_field").unwrap();
    assert_eq!(request.max_shared_players(), 4);

    let outcome = LineupOptimizer::new(config.optimizer.clone())
        .generate_lineups(&common::slate(), request)
        .unwrap();
    assert_eq!(outcome.lineups.len(), 3);

    let engine = SimulationEngine::new(config.simulation.clone()).unwrap();
    let results = engine
        .run_simulations_batch(&outcome.lineups, config.simulation.n_simulations, true)
        .unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.n_simulations == 500));
}
