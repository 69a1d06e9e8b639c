//! Configuration module for the lineup engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for the optimizer, the simulation engine and logging.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lineup_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! // Access configuration values
//! println!("salary cap: {}", config.optimizer.salary_cap);
//! ```

mod observability;
mod optimizer;
mod simulation;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::optimizer::GenerationRequest;

pub use observability::{LoggingConfig, ObservabilityConfig};
pub use optimizer::{GameStackConfig, OptimizerConfig, SafetyConfig};
pub use simulation::{
    CacheConfig, CorrelationConfig, DistributionKind, SimulationConfig, VarianceConfig,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// A named profile does not exist.
    #[error("Unknown profile '{0}'")]
    UnknownProfile(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Optimizer configuration.
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    /// Simulation configuration.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Named generation presets.
    #[serde(default)]
    pub profiles: BTreeMap<String, GenerationRequest>,
}

impl Config {
    /// Look up a named generation preset.
    pub fn profile(&self, name: &str) -> Result<&GenerationRequest, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
    }
}

pub(crate) const fn default_true() -> bool {
    true
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let opt = &config.optimizer;

    if opt.min_salary_usage > opt.salary_cap {
        return Err(ConfigError::ValidationError(
            "optimizer.min_salary_usage must not exceed optimizer.salary_cap".to_string(),
        ));
    }

    if opt.salary_bounds.min > opt.salary_bounds.max {
        return Err(ConfigError::ValidationError(
            "optimizer.salary_bounds.min must not exceed optimizer.salary_bounds.max".to_string(),
        ));
    }

    if opt.max_tight_ends == 0 {
        return Err(ConfigError::ValidationError(
            "optimizer.max_tight_ends must be at least 1".to_string(),
        ));
    }

    if opt.game_stack.min_players == 0 {
        return Err(ConfigError::ValidationError(
            "optimizer.game_stack.min_players must be at least 1".to_string(),
        ));
    }

    let safety = &opt.safety;
    if safety.anchor_rb_min_ownership > safety.anchor_rb_max_ownership {
        return Err(ConfigError::ValidationError(
            "optimizer.safety anchor RB ownership band is inverted".to_string(),
        ));
    }

    let sim = &config.simulation;
    if sim.n_simulations == 0 {
        return Err(ConfigError::ValidationError(
            "simulation.n_simulations must be at least 1".to_string(),
        ));
    }

    let corr = &sim.correlations;
    for (name, value) in [
        ("shared_group", corr.shared_group),
        ("qb_receiver", corr.qb_receiver),
        ("rb_opposing_dst", corr.rb_opposing_dst),
        ("same_game", corr.same_game),
    ] {
        if !(-1.0..=1.0).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "simulation.correlations.{name} must be between -1.0 and 1.0"
            )));
        }
    }

    let var = &sim.default_variance;
    if var.std_dev_ratio < 0.0 || var.floor_ratio > 1.0 || var.ceiling_ratio < 1.0 {
        return Err(ConfigError::ValidationError(
            "simulation.default_variance requires std_dev_ratio >= 0 and floor_ratio <= 1 <= ceiling_ratio"
                .to_string(),
        ));
    }

    if sim.cache.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "simulation.cache.capacity must be at least 1".to_string(),
        ));
    }

    let valid_formats = ["pretty", "compact", "json"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    for (name, profile) in &config.profiles {
        profile
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("profiles.{name}: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.optimizer.salary_cap, 50_000);
        assert_eq!(config.optimizer.min_salary_usage, 48_000);
        assert_eq!(config.optimizer.max_tight_ends, 2);
        assert_eq!(config.optimizer.salary_bounds.min, 2_000);
        assert!((config.optimizer.game_stack.min_game_total - 48.0).abs() < f64::EPSILON);
        assert_eq!(config.simulation.n_simulations, 10_000);
        assert_eq!(config.simulation.cache.capacity, 100);
        assert_eq!(config.simulation.cache.ttl_secs, 3_600);
        assert!((config.simulation.correlations.rb_opposing_dst + 0.35).abs() < f64::EPSILON);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config.optimizer.salary_cap, 50_000);
        assert!(config.simulation.use_correlations);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "seed: ${LINEUP_ENGINE_TEST_NONEXISTENT_VAR:-42}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "seed: 42");
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "level: ${LINEUP_ENGINE_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "level: ");
    }

    #[test]
    fn test_validation_salary_floor_above_cap() {
        let yaml = r"
optimizer:
  salary_cap: 50000
  min_salary_usage: 51000
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for inverted salary range");
        };
        assert!(err.to_string().contains("min_salary_usage"));
    }

    #[test]
    fn test_validation_correlation_out_of_range() {
        let yaml = r"
simulation:
  correlations:
    qb_receiver: 1.5
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for correlation > 1");
        };
        assert!(err.to_string().contains("qb_receiver"));
    }

    #[test]
    fn test_validation_invalid_log_format() {
        let yaml = r"
observability:
  logging:
    format: xml
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for unknown log format");
        };
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn test_profiles_parse_and_validate() {
        let yaml = r"
profiles:
  gpp:
    lineup_count: 20
    uniqueness_pct: 0.6
    max_exposure_pct: 0.4
    ownership_cap: 0.3
  cash:
    lineup_count: 1
    stacking_enabled: false
";
        let config = load_config_from_string(yaml).unwrap();
        let gpp = config.profile("gpp").unwrap();
        assert_eq!(gpp.lineup_count, 20);
        assert_eq!(gpp.ownership_cap, Some(0.3));
        assert!(!config.profile("cash").unwrap().stacking_enabled);
        assert!(matches!(
            config.profile("missing"),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let yaml = r"
profiles:
  broken:
    lineup_count: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero lineup_count");
        };
        assert!(err.to_string().contains("profiles.broken"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r"
optimizer:
  salary_cap: 60000
  min_salary_usage: 55000
  solve_timeout_ms: 5000
  salary_bounds:
    min: 3000
    max: 10000
  game_stack:
    enabled: false
  safety:
    max_low_owned: 3

simulation:
  n_simulations: 2000
  distribution: lognormal
  seed: 7
  worker_threads: 2
  cache:
    capacity: 10
    ttl_secs: 60

observability:
  logging:
    level: debug
    format: json
";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.optimizer.salary_cap, 60_000);
        assert_eq!(
            config.optimizer.solve_timeout(),
            Some(std::time::Duration::from_secs(5))
        );
        assert_eq!(config.optimizer.salary_bounds.min, 3_000);
        assert!(!config.optimizer.game_stack.enabled);
        assert_eq!(config.optimizer.safety.max_low_owned, 3);
        assert_eq!(config.optimizer.safety.min_chalk_players, 2);
        assert_eq!(config.simulation.distribution, DistributionKind::Lognormal);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.cache.ttl_secs, 60);
        assert_eq!(config.observability.logging.format, "json");
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "optimizer:\n  max_tight_ends: 1").unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.optimizer.max_tight_ends, 1);
    }

    #[test]
    fn test_example_config_is_valid() {
        let config = load_config_from_string(include_str!("../../config.example.yaml")).unwrap();
        assert_eq!(config.optimizer.salary_cap, 50_000);
        assert_eq!(config.profile("gpp").unwrap().lineup_count, 20);
        assert_eq!(config.profile("cash").unwrap().max_shared_players(), 6);
    }

    #[test]
    fn test_load_config_missing_file() {
        let Err(err) = load_config(Some("/nonexistent/lineup-engine.yaml")) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
