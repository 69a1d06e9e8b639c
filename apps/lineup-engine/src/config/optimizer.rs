//! Optimizer configuration: site rules, solve limits and rule thresholds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_SALARY_CAP, SalaryBounds};

use super::default_true;

/// Optimizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum total salary.
    #[serde(default = "default_salary_cap")]
    pub salary_cap: u32,
    /// Minimum total salary a lineup must use.
    #[serde(default = "default_min_salary_usage")]
    pub min_salary_usage: u32,
    /// Tight ends allowed per lineup (one starter plus FLEX).
    #[serde(default = "default_max_tight_ends")]
    pub max_tight_ends: usize,
    /// Wall-clock limit per solve in milliseconds. 0 disables the limit.
    #[serde(default = "default_solve_timeout_ms")]
    pub solve_timeout_ms: u64,
    /// Per-player salary bounds enforced at pool validation.
    #[serde(default)]
    pub salary_bounds: SalaryBounds,
    /// Game-stack rule settings.
    #[serde(default)]
    pub game_stack: GameStackConfig,
    /// Safety-default rule settings.
    #[serde(default)]
    pub safety: SafetyConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            salary_cap: default_salary_cap(),
            min_salary_usage: default_min_salary_usage(),
            max_tight_ends: default_max_tight_ends(),
            solve_timeout_ms: default_solve_timeout_ms(),
            salary_bounds: SalaryBounds::default(),
            game_stack: GameStackConfig::default(),
            safety: SafetyConfig::default(),
        }
    }
}

impl OptimizerConfig {
    /// Solve limit, `None` when disabled.
    pub const fn solve_timeout(&self) -> Option<Duration> {
        if self.solve_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.solve_timeout_ms))
        }
    }
}

/// Game-stack rule: at least one high-total game must contribute several
/// players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStackConfig {
    /// Apply the rule when stacking is requested.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Over/under at or above which a game qualifies.
    #[serde(default = "default_min_game_total")]
    pub min_game_total: f64,
    /// Players required from the chosen game.
    #[serde(default = "default_min_game_players")]
    pub min_players: usize,
}

impl Default for GameStackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_game_total: default_min_game_total(),
            min_players: default_min_game_players(),
        }
    }
}

/// Thresholds for the always-on safety rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Apply the safety rules.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// A QB below this smart value...
    #[serde(default = "default_qb_min_smart_value")]
    pub qb_min_smart_value: f64,
    /// ...and below this ownership is blocked.
    #[serde(default = "default_low_ownership")]
    pub qb_min_ownership: f64,
    /// Ownership below which a player counts as low-owned.
    #[serde(default = "default_low_ownership")]
    pub low_ownership_threshold: f64,
    /// Most low-owned players per lineup.
    #[serde(default = "default_max_low_owned")]
    pub max_low_owned: usize,
    /// Ownership at or above which a player counts as chalk.
    #[serde(default = "default_chalk_ownership")]
    pub chalk_ownership_threshold: f64,
    /// Fewest chalk players per lineup.
    #[serde(default = "default_min_chalk_players")]
    pub min_chalk_players: usize,
    /// Anchor RB ownership band, lower edge.
    #[serde(default = "default_chalk_ownership")]
    pub anchor_rb_min_ownership: f64,
    /// Anchor RB ownership band, upper edge.
    #[serde(default = "default_anchor_rb_max_ownership")]
    pub anchor_rb_max_ownership: f64,
    /// Anchor RB minimum smart value.
    #[serde(default = "default_anchor_rb_min_smart_value")]
    pub anchor_rb_min_smart_value: f64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            qb_min_smart_value: default_qb_min_smart_value(),
            qb_min_ownership: default_low_ownership(),
            low_ownership_threshold: default_low_ownership(),
            max_low_owned: default_max_low_owned(),
            chalk_ownership_threshold: default_chalk_ownership(),
            min_chalk_players: default_min_chalk_players(),
            anchor_rb_min_ownership: default_chalk_ownership(),
            anchor_rb_max_ownership: default_anchor_rb_max_ownership(),
            anchor_rb_min_smart_value: default_anchor_rb_min_smart_value(),
        }
    }
}

const fn default_salary_cap() -> u32 {
    DEFAULT_SALARY_CAP
}

const fn default_min_salary_usage() -> u32 {
    48_000
}

const fn default_max_tight_ends() -> usize {
    2
}

const fn default_solve_timeout_ms() -> u64 {
    30_000
}

const fn default_min_game_total() -> f64 {
    48.0
}

const fn default_min_game_players() -> usize {
    3
}

const fn default_qb_min_smart_value() -> f64 {
    50.0
}

const fn default_low_ownership() -> f64 {
    8.0
}

const fn default_max_low_owned() -> usize {
    2
}

const fn default_chalk_ownership() -> f64 {
    15.0
}

const fn default_min_chalk_players() -> usize {
    2
}

const fn default_anchor_rb_max_ownership() -> f64 {
    30.0
}

const fn default_anchor_rb_min_smart_value() -> f64 {
    70.0
}
