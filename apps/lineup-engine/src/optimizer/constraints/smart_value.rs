//! Portfolio average smart-value floor.

use good_lp::constraint;

use crate::domain::ROSTER_SIZE;

use super::{Formulation, RosterRule, RoundContext};

/// `Σ smart_value·x >= floor * 9`.
///
/// Only applied when every pooled player carries a smart value; a partial
/// column would silently count missing players as zero.
#[derive(Debug, Clone, Copy)]
pub struct SmartValueFloorRule;

impl RosterRule for SmartValueFloorRule {
    fn name(&self) -> &'static str {
        "smart_value_floor"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let Some(floor) = ctx.request.smart_value_floor else {
            return;
        };
        if !ctx.pool.has_complete_smart_values() {
            tracing::debug!("Smart value floor skipped: pool has players without smart_value");
            return;
        }

        let total = f.weighted(
            ctx.pool
                .iter()
                .filter_map(|(i, p)| p.smart_value().map(|sv| (i, sv))),
        );
        let required = floor * ROSTER_SIZE as f64;
        f.require("smart_value_floor", constraint!(total >= required));
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{labels_for, pool};
    use super::*;
    use crate::domain::PlayerRecord;
    use crate::optimizer::GenerationRequest;

    #[test]
    fn test_applies_with_complete_column() {
        let pool = pool(vec![
            PlayerRecord::new("A", "QB", 7_000, 20.0, "KC", "BUF").with_smart_value(60.0),
            PlayerRecord::new("B", "RB", 6_000, 15.0, "KC", "BUF").with_smart_value(40.0),
        ]);
        let request = GenerationRequest::new(1).with_smart_value_floor(50.0);
        assert_eq!(
            labels_for(&SmartValueFloorRule, &pool, &request, &[]),
            vec!["smart_value_floor"]
        );
    }

    #[test]
    fn test_skipped_with_partial_column() {
        let pool = pool(vec![
            PlayerRecord::new("A", "QB", 7_000, 20.0, "KC", "BUF").with_smart_value(60.0),
            PlayerRecord::new("B", "RB", 6_000, 15.0, "KC", "BUF"),
        ]);
        let request = GenerationRequest::new(1).with_smart_value_floor(50.0);
        assert!(labels_for(&SmartValueFloorRule, &pool, &request, &[]).is_empty());
    }
}
