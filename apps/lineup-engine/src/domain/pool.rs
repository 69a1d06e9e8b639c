//! Validated player pool.

use std::collections::HashSet;
use std::sync::Arc;

use super::errors::ValidationError;
use super::player::{Player, PlayerRecord, Position, SalaryBounds};

/// Ordered, validated collection of players. Index positions are stable and
/// are what the optimizer keys its decision variables on.
#[derive(Debug, Clone)]
pub struct PlayerPool {
    players: Vec<Arc<Player>>,
}

impl PlayerPool {
    /// Validate every row. The first bad row aborts construction.
    pub fn from_records(
        records: impl IntoIterator<Item = PlayerRecord>,
        bounds: &SalaryBounds,
    ) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        let mut players = Vec::new();

        for (row, record) in records.into_iter().enumerate() {
            let player = Player::from_record(row, record, bounds)?;
            if !seen.insert(player.name().to_string()) {
                return Err(ValidationError::DuplicatePlayer {
                    name: player.name().to_string(),
                });
            }
            players.push(Arc::new(player));
        }

        if players.is_empty() {
            return Err(ValidationError::EmptyPool);
        }

        Ok(Self { players })
    }

    /// Parse a JSON array of rows and validate it.
    pub fn from_json(json: &str, bounds: &SalaryBounds) -> Result<Self, ValidationError> {
        let records: Vec<PlayerRecord> = serde_json::from_str(json)
            .map_err(|e| ValidationError::parameter("pool", format!("malformed JSON: {e}")))?;
        Self::from_records(records, bounds)
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Always false for a constructed pool.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Player at `index`.
    pub fn get(&self, index: usize) -> Option<&Arc<Player>> {
        self.players.get(index)
    }

    /// All players in input order.
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    /// `(index, player)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Arc<Player>)> {
        self.players.iter().enumerate()
    }

    /// Indices of players at `position`.
    pub fn indices_at(&self, position: Position) -> Vec<usize> {
        self.iter()
            .filter(|(_, p)| p.position() == position)
            .map(|(i, _)| i)
            .collect()
    }

    /// Look a player up by name.
    pub fn find(&self, name: &str) -> Option<&Arc<Player>> {
        self.players.iter().find(|p| p.name() == name)
    }

    /// True when every player carries a smart value.
    pub fn has_complete_smart_values(&self) -> bool {
        self.players.iter().all(|p| p.smart_value().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::new("A", "QB", 7_000, 20.0, "KC", "BUF"),
            PlayerRecord::new("B", "WR", 6_000, 15.0, "KC", "BUF").with_smart_value(60.0),
        ]
    }

    #[test]
    fn test_from_records_keeps_order() {
        let pool = PlayerPool::from_records(rows(), &SalaryBounds::default()).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.players()[1].name(), "B");
        assert_eq!(pool.indices_at(Position::Wr), vec![1]);
        assert!(!pool.has_complete_smart_values());
        assert_eq!(pool.find("B").map(|p| p.smart_value()), Some(Some(60.0)));
        assert!(pool.find("Z").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut rows = rows();
        rows.push(PlayerRecord::new("A", "RB", 5_000, 12.0, "KC", "BUF"));
        let err = PlayerPool::from_records(rows, &SalaryBounds::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicatePlayer {
                name: "A".to_string()
            }
        );
    }

    #[test]
    fn test_empty_pool_rejected() {
        let err = PlayerPool::from_records(Vec::new(), &SalaryBounds::default()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyPool);
    }

    #[test]
    fn test_from_json_reports_missing_column() {
        let json = r#"[{"name": "A", "position": "QB", "salary": 7000, "team": "KC", "opponent": "BUF"}]"#;
        let err = PlayerPool::from_json(json, &SalaryBounds::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                row: 0,
                field: "projection"
            }
        );
    }
}
