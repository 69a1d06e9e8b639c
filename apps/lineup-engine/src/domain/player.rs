//! Player value objects.
//!
//! A [`Player`] is built once from a [`PlayerRecord`] (the loose input row) and
//! is immutable afterwards. Lineups share players through `Arc<Player>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

// ============================================
// Position
// ============================================

/// Roster position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    /// Quarterback.
    Qb,
    /// Running back.
    Rb,
    /// Wide receiver.
    Wr,
    /// Tight end.
    Te,
    /// Team defense / special teams.
    Dst,
}

impl Position {
    /// All positions in roster order.
    pub const ALL: [Self; 5] = [Self::Qb, Self::Rb, Self::Wr, Self::Te, Self::Dst];

    /// Canonical label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qb => "QB",
            Self::Rb => "RB",
            Self::Wr => "WR",
            Self::Te => "TE",
            Self::Dst => "DST",
        }
    }

    /// RB, WR and TE can fill the FLEX slot.
    pub const fn is_flex_eligible(self) -> bool {
        matches!(self, Self::Rb | Self::Wr | Self::Te)
    }

    /// WR and TE catch passes from the quarterback.
    pub const fn is_pass_catcher(self) -> bool {
        matches!(self, Self::Wr | Self::Te)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Self::Qb),
            "RB" => Ok(Self::Rb),
            "WR" => Ok(Self::Wr),
            "TE" => Ok(Self::Te),
            "DST" | "D/ST" | "DEF" => Ok(Self::Dst),
            other => Err(other.to_string()),
        }
    }
}

// ============================================
// Selection state
// ============================================

/// Whether the optimizer must use, may use, or must skip a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerSelection {
    /// Free choice.
    #[default]
    Normal,
    /// Forced into every lineup.
    Locked,
    /// Never used.
    Excluded,
}

impl FromStr for PlayerSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "normal" => Ok(Self::Normal),
            "locked" | "lock" => Ok(Self::Locked),
            "excluded" | "exclude" => Ok(Self::Excluded),
            other => Err(other.to_string()),
        }
    }
}

// ============================================
// Salary bounds
// ============================================

/// Inclusive per-player salary range for the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBounds {
    /// Minimum allowed salary.
    #[serde(default = "default_min_salary")]
    pub min: u32,
    /// Maximum allowed salary.
    #[serde(default = "default_max_salary")]
    pub max: u32,
}

impl Default for SalaryBounds {
    fn default() -> Self {
        Self {
            min: default_min_salary(),
            max: default_max_salary(),
        }
    }
}

const fn default_min_salary() -> u32 {
    2_000
}

const fn default_max_salary() -> u32 {
    10_000
}

// ============================================
// Input row
// ============================================

/// Raw player row as delivered by the ingestion layer.
///
/// Required columns are optional here so that a missing column becomes a
/// [`ValidationError::MissingField`] rather than an opaque parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Player name (unique within a pool).
    pub name: Option<String>,
    /// Position label.
    pub position: Option<String>,
    /// Salary in site dollars.
    pub salary: Option<i64>,
    /// Projected fantasy points.
    pub projection: Option<f64>,
    /// Team abbreviation.
    pub team: Option<String>,
    /// Opponent abbreviation.
    pub opponent: Option<String>,
    /// Projected ownership percentage.
    #[serde(default)]
    pub ownership: Option<f64>,
    /// Composite value score.
    #[serde(default)]
    pub smart_value: Option<f64>,
    /// External identifier.
    #[serde(default)]
    pub player_id: Option<String>,
    /// NORMAL, LOCKED or EXCLUDED.
    #[serde(default)]
    pub selection_state: Option<String>,
    /// Vegas over/under for the player's game.
    #[serde(default)]
    pub game_total: Option<f64>,
}

impl PlayerRecord {
    /// Row with every required column populated.
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        salary: i64,
        projection: f64,
        team: impl Into<String>,
        opponent: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            position: Some(position.into()),
            salary: Some(salary),
            projection: Some(projection),
            team: Some(team.into()),
            opponent: Some(opponent.into()),
            ..Self::default()
        }
    }

    /// Set ownership.
    #[must_use]
    pub const fn with_ownership(mut self, ownership: f64) -> Self {
        self.ownership = Some(ownership);
        self
    }

    /// Set smart value.
    #[must_use]
    pub const fn with_smart_value(mut self, smart_value: f64) -> Self {
        self.smart_value = Some(smart_value);
        self
    }

    /// Set game total.
    #[must_use]
    pub const fn with_game_total(mut self, game_total: f64) -> Self {
        self.game_total = Some(game_total);
        self
    }

    /// Set selection state.
    #[must_use]
    pub fn with_selection(mut self, selection: &str) -> Self {
        self.selection_state = Some(selection.to_string());
        self
    }
}

// ============================================
// Player
// ============================================

/// Validated, immutable player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    name: String,
    player_id: Option<String>,
    position: Position,
    salary: u32,
    projection: f64,
    team: String,
    opponent: String,
    ownership: Option<f64>,
    smart_value: Option<f64>,
    game_total: Option<f64>,
    selection: PlayerSelection,
}

impl Player {
    /// Validate a raw row. `row` is only used to label errors for rows that
    /// have no name.
    pub fn from_record(
        row: usize,
        record: PlayerRecord,
        bounds: &SalaryBounds,
    ) -> Result<Self, ValidationError> {
        let name = required(record.name, row, "name")?;
        let position_raw = required(record.position, row, "position")?;
        let salary_raw = required(record.salary, row, "salary")?;
        let projection = required(record.projection, row, "projection")?;
        let team = required(record.team, row, "team")?;
        let opponent = required(record.opponent, row, "opponent")?;

        let position =
            position_raw
                .parse::<Position>()
                .map_err(|value| ValidationError::InvalidPosition {
                    player: name.clone(),
                    value,
                })?;

        let salary = u32::try_from(salary_raw)
            .ok()
            .filter(|s| (bounds.min..=bounds.max).contains(s))
            .ok_or_else(|| ValidationError::SalaryOutOfRange {
                player: name.clone(),
                salary: salary_raw,
                min: bounds.min,
                max: bounds.max,
            })?;

        if !projection.is_finite() || projection <= 0.0 {
            return Err(ValidationError::InvalidProjection {
                player: name,
                value: projection,
            });
        }

        if let Some(own) = record.ownership {
            if !(0.0..=100.0).contains(&own) {
                return Err(ValidationError::OwnershipOutOfRange {
                    player: name,
                    value: own,
                });
            }
        }

        for (field, value) in [
            ("smart_value", record.smart_value),
            ("game_total", record.game_total),
        ] {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(ValidationError::NonFiniteValue {
                    player: name,
                    field,
                    value,
                });
            }
        }

        let selection = match record.selection_state {
            Some(raw) => raw
                .parse::<PlayerSelection>()
                .map_err(|value| ValidationError::InvalidSelection {
                    player: name.clone(),
                    value,
                })?,
            None => PlayerSelection::Normal,
        };

        Ok(Self {
            name,
            player_id: record.player_id,
            position,
            salary,
            projection,
            team: team.trim().to_ascii_uppercase(),
            opponent: opponent.trim().to_ascii_uppercase(),
            ownership: record.ownership,
            smart_value: record.smart_value,
            game_total: record.game_total,
            selection,
        })
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// External identifier, if any.
    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    /// Roster position.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Salary in site dollars.
    pub const fn salary(&self) -> u32 {
        self.salary
    }

    /// Projected fantasy points.
    pub const fn projection(&self) -> f64 {
        self.projection
    }

    /// Team abbreviation (upper case).
    pub fn team(&self) -> &str {
        &self.team
    }

    /// Opponent abbreviation (upper case).
    pub fn opponent(&self) -> &str {
        &self.opponent
    }

    /// Projected ownership percentage.
    pub const fn ownership(&self) -> Option<f64> {
        self.ownership
    }

    /// Composite value score.
    pub const fn smart_value(&self) -> Option<f64> {
        self.smart_value
    }

    /// Game over/under.
    pub const fn game_total(&self) -> Option<f64> {
        self.game_total
    }

    /// Selection state.
    pub const fn selection(&self) -> PlayerSelection {
        self.selection
    }

    /// Points per $1000 of salary.
    pub fn value(&self) -> f64 {
        self.projection / f64::from(self.salary) * 1000.0
    }

    /// Order-independent game identifier, e.g. `"BUF@KC"` and `"KC@BUF"` both
    /// become `"BUF-KC"`.
    pub fn game_key(&self) -> String {
        if self.team <= self.opponent {
            format!("{}-{}", self.team, self.opponent)
        } else {
            format!("{}-{}", self.opponent, self.team)
        }
    }

    /// Same team, or one player's team is the other's opponent.
    pub fn shares_game_with(&self, other: &Self) -> bool {
        self.team == other.team || self.team == other.opponent || self.opponent == other.team
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) ${} - {:.1} pts",
            self.name, self.position, self.team, self.salary, self.projection
        )
    }
}

fn required<T>(value: Option<T>, row: usize, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { row, field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn record() -> PlayerRecord {
        PlayerRecord::new("Josh Allen", "QB", 8_200, 24.5, "buf", "mia")
    }

    #[test_case("QB", Position::Qb)]
    #[test_case("rb", Position::Rb)]
    #[test_case("WR", Position::Wr)]
    #[test_case("TE", Position::Te)]
    #[test_case("DST", Position::Dst)]
    #[test_case("D/ST", Position::Dst)]
    #[test_case("DEF", Position::Dst)]
    fn test_position_parsing(raw: &str, expected: Position) {
        assert_eq!(raw.parse::<Position>(), Ok(expected));
    }

    #[test]
    fn test_valid_record_normalises_teams() {
        let player = Player::from_record(0, record(), &SalaryBounds::default()).unwrap();
        assert_eq!(player.name(), "Josh Allen");
        assert_eq!(player.team(), "BUF");
        assert_eq!(player.opponent(), "MIA");
        assert_eq!(player.selection(), PlayerSelection::Normal);
        assert!((player.value() - 24.5 / 8.2).abs() < 1e-9);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let mut row = record();
        row.team = None;
        let err = Player::from_record(3, row, &SalaryBounds::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                row: 3,
                field: "team"
            }
        );
    }

    #[test]
    fn test_invalid_position_rejected() {
        let mut row = record();
        row.position = Some("K".to_string());
        let err = Player::from_record(0, row, &SalaryBounds::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPosition { .. }));
    }

    #[test_case(1_500 ; "below minimum")]
    #[test_case(10_500 ; "above maximum")]
    #[test_case(-100 ; "negative")]
    fn test_salary_out_of_range(salary: i64) {
        let mut row = record();
        row.salary = Some(salary);
        let err = Player::from_record(0, row, &SalaryBounds::default()).unwrap_err();
        assert!(matches!(err, ValidationError::SalaryOutOfRange { .. }));
    }

    #[test]
    fn test_custom_bounds_apply() {
        let bounds = SalaryBounds {
            min: 3_000,
            max: 10_000,
        };
        let mut row = record();
        row.salary = Some(2_500);
        assert!(Player::from_record(0, row, &bounds).is_err());
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-3.0 ; "negative")]
    #[test_case(f64::NAN ; "nan")]
    fn test_projection_must_be_positive(value: f64) {
        let mut row = record();
        row.projection = Some(value);
        let err = Player::from_record(0, row, &SalaryBounds::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidProjection { .. }));
    }

    #[test]
    fn test_ownership_out_of_range() {
        let row = record().with_ownership(120.0);
        let err = Player::from_record(0, row, &SalaryBounds::default()).unwrap_err();
        assert!(matches!(err, ValidationError::OwnershipOutOfRange { .. }));
    }

    #[test_case(record().with_smart_value(f64::NAN), "smart_value" ; "nan smart value")]
    #[test_case(record().with_game_total(f64::INFINITY), "game_total" ; "infinite game total")]
    fn test_non_finite_optional_columns_rejected(row: PlayerRecord, column: &str) {
        let err = Player::from_record(0, row, &SalaryBounds::default()).unwrap_err();
        assert!(
            matches!(err, ValidationError::NonFiniteValue { field, .. } if field == column),
            "{err:?}"
        );
    }

    #[test]
    fn test_optional_columns_carried_through() {
        let mut row = record().with_smart_value(64.0).with_game_total(47.5);
        row.player_id = Some("dk-1234".to_string());
        let player = Player::from_record(0, row, &SalaryBounds::default()).unwrap();
        assert_eq!(player.player_id(), Some("dk-1234"));
        assert_eq!(player.smart_value(), Some(64.0));
        assert_eq!(player.game_total(), Some(47.5));
    }

    #[test]
    fn test_selection_state_parsing() {
        let locked = record().with_selection("LOCKED");
        let player = Player::from_record(0, locked, &SalaryBounds::default()).unwrap();
        assert_eq!(player.selection(), PlayerSelection::Locked);

        let bogus = record().with_selection("maybe");
        let err = Player::from_record(0, bogus, &SalaryBounds::default()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSelection { .. }));
    }

    #[test]
    fn test_game_key_is_order_independent() {
        let a = Player::from_record(0, record(), &SalaryBounds::default()).unwrap();
        let b = Player::from_record(
            1,
            PlayerRecord::new("Tua", "QB", 6_500, 18.0, "MIA", "BUF"),
            &SalaryBounds::default(),
        )
        .unwrap();
        assert_eq!(a.game_key(), b.game_key());
        assert!(a.shares_game_with(&b));
    }
}
