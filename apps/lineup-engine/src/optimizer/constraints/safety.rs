//! Always-on safety defaults.
//!
//! These keep lineups away from all-contrarian builds. Every threshold comes
//! from [`SafetyConfig`](crate::config::SafetyConfig); each rule is a no-op
//! when the pool lacks the data it needs.

use good_lp::constraint;

use crate::domain::Position;

use super::{Formulation, RosterRule, RoundContext};

/// Block QBs below both the smart-value and the ownership thresholds.
///
/// A QB with neither figure is left alone. With only one figure, the missing
/// one counts as failing.
#[derive(Debug, Clone, Copy)]
pub struct UnsafeQbRule;

impl RosterRule for UnsafeQbRule {
    fn name(&self) -> &'static str {
        "unsafe_qb"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let safety = &ctx.config.safety;
        if !safety.enabled {
            return;
        }

        for i in ctx.pool.indices_at(Position::Qb) {
            let Some(qb) = ctx.pool.get(i) else {
                continue;
            };
            if qb.smart_value().is_none() && qb.ownership().is_none() {
                continue;
            }
            let weak_value = qb.smart_value().unwrap_or(0.0) < safety.qb_min_smart_value;
            let low_owned = qb.ownership().unwrap_or(0.0) < safety.qb_min_ownership;
            if weak_value && low_owned {
                f.fix(format!("unsafe_qb:{}", qb.name()), i, 0.0);
            }
        }
    }
}

/// At most `max_low_owned` players below the low-ownership threshold.
#[derive(Debug, Clone, Copy)]
pub struct LowOwnershipCapRule;

impl RosterRule for LowOwnershipCapRule {
    fn name(&self) -> &'static str {
        "low_ownership_cap"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let safety = &ctx.config.safety;
        if !safety.enabled {
            return;
        }

        let low: Vec<usize> = ctx
            .pool
            .iter()
            .filter(|(_, p)| p.ownership().is_some_and(|o| o < safety.low_ownership_threshold))
            .map(|(i, _)| i)
            .collect();
        if low.is_empty() {
            return;
        }

        let selected = f.sum(low);
        let cap = safety.max_low_owned as f64;
        f.require("low_ownership_cap", constraint!(selected <= cap));
    }
}

/// At least `min_chalk_players` players at or above the chalk threshold,
/// when any exist.
#[derive(Debug, Clone, Copy)]
pub struct ChalkFloorRule;

impl RosterRule for ChalkFloorRule {
    fn name(&self) -> &'static str {
        "chalk_floor"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let safety = &ctx.config.safety;
        if !safety.enabled {
            return;
        }

        let chalk: Vec<usize> = ctx
            .pool
            .iter()
            .filter(|(_, p)| p.ownership().is_some_and(|o| o >= safety.chalk_ownership_threshold))
            .map(|(i, _)| i)
            .collect();
        if chalk.is_empty() {
            return;
        }

        let selected = f.sum(chalk);
        let floor = safety.min_chalk_players as f64;
        f.require("chalk_floor", constraint!(selected >= floor));
    }
}

/// At least one RB inside the anchor ownership band with a strong smart
/// value, when any exist.
#[derive(Debug, Clone, Copy)]
pub struct AnchorRbRule;

impl RosterRule for AnchorRbRule {
    fn name(&self) -> &'static str {
        "anchor_rb"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let safety = &ctx.config.safety;
        if !safety.enabled {
            return;
        }

        let band = safety.anchor_rb_min_ownership..=safety.anchor_rb_max_ownership;
        let anchors: Vec<usize> = ctx
            .pool
            .iter()
            .filter(|(_, p)| {
                p.position() == Position::Rb
                    && p.ownership().is_some_and(|o| band.contains(&o))
                    && p.smart_value().is_some_and(|sv| sv >= safety.anchor_rb_min_smart_value)
            })
            .map(|(i, _)| i)
            .collect();
        if anchors.is_empty() {
            return;
        }

        let selected = f.sum(anchors);
        f.require("anchor_rb", constraint!(selected >= 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{labels_for, pool};
    use super::*;
    use crate::domain::{PlayerPool, PlayerRecord};
    use crate::optimizer::GenerationRequest;

    fn safety_pool() -> PlayerPool {
        pool(vec![
            // weak value, low owned: blocked
            PlayerRecord::new("QB Dart", "QB", 5_000, 14.0, "NYG", "DAL")
                .with_smart_value(30.0)
                .with_ownership(3.0),
            // strong value: fine
            PlayerRecord::new("QB Solid", "QB", 7_000, 20.0, "KC", "BUF")
                .with_smart_value(65.0)
                .with_ownership(4.0),
            // ownership only, low: missing smart value counts as failing
            PlayerRecord::new("QB Unknown", "QB", 6_000, 17.0, "SF", "LA").with_ownership(5.0),
            // no data at all: left alone
            PlayerRecord::new("QB Bare", "QB", 6_000, 17.0, "DET", "GB"),
            PlayerRecord::new("RB Anchor", "RB", 7_500, 19.0, "KC", "BUF")
                .with_smart_value(75.0)
                .with_ownership(22.0),
            PlayerRecord::new("RB Chalk", "RB", 8_000, 20.0, "SF", "LA")
                .with_smart_value(60.0)
                .with_ownership(35.0),
        ])
    }

    #[test]
    fn test_unsafe_qbs_blocked() {
        let labels = labels_for(&UnsafeQbRule, &safety_pool(), &GenerationRequest::new(1), &[]);
        assert_eq!(labels, vec!["unsafe_qb:QB Dart", "unsafe_qb:QB Unknown"]);
    }

    #[test]
    fn test_ownership_balance_rules() {
        let pool = safety_pool();
        let request = GenerationRequest::new(1);
        assert_eq!(
            labels_for(&LowOwnershipCapRule, &pool, &request, &[]),
            vec!["low_ownership_cap"]
        );
        assert_eq!(labels_for(&ChalkFloorRule, &pool, &request, &[]), vec!["chalk_floor"]);
        assert_eq!(labels_for(&AnchorRbRule, &pool, &request, &[]), vec!["anchor_rb"]);
    }

    #[test]
    fn test_rules_skip_pools_without_ownership() {
        let pool = pool(vec![PlayerRecord::new("RB", "RB", 5_000, 12.0, "KC", "BUF")]);
        let request = GenerationRequest::new(1);
        assert!(labels_for(&LowOwnershipCapRule, &pool, &request, &[]).is_empty());
        assert!(labels_for(&ChalkFloorRule, &pool, &request, &[]).is_empty());
        assert!(labels_for(&AnchorRbRule, &pool, &request, &[]).is_empty());
    }
}
