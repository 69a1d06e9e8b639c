//! Site roster rules: salary window and position counts.

use good_lp::constraint;

use crate::domain::{Position, ROSTER_SIZE};

use super::{Formulation, RosterRule, RoundContext};

/// FLEX-eligible players per lineup (2 RB + 3 WR + 1 TE + FLEX).
const FLEX_POOL_SIZE: f64 = 7.0;

/// Total salary within `[min_salary_usage, salary_cap]`.
#[derive(Debug, Clone, Copy)]
pub struct SalaryRule;

impl RosterRule for SalaryRule {
    fn name(&self) -> &'static str {
        "salary"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let salaries: Vec<(usize, f64)> = ctx
            .pool
            .iter()
            .map(|(i, p)| (i, f64::from(p.salary())))
            .collect();

        let cap = f64::from(ctx.config.salary_cap);
        let floor = f64::from(ctx.config.min_salary_usage);

        let spent = f.weighted(salaries.iter().copied());
        f.require("salary_cap", constraint!(spent <= cap));
        let spent = f.weighted(salaries);
        f.require("salary_floor", constraint!(spent >= floor));
    }
}

/// QB=1, RB>=2, WR>=3, 1<=TE<=max, DST=1, RB+WR+TE=7, total=9.
#[derive(Debug, Clone, Copy)]
pub struct PositionRule;

impl RosterRule for PositionRule {
    fn name(&self) -> &'static str {
        "positions"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let pool = ctx.pool;
        let qbs = f.sum(pool.indices_at(Position::Qb));
        let rbs = f.sum(pool.indices_at(Position::Rb));
        let wrs = f.sum(pool.indices_at(Position::Wr));
        let tes = f.sum(pool.indices_at(Position::Te));
        let te_max = f.sum(pool.indices_at(Position::Te));
        let dsts = f.sum(pool.indices_at(Position::Dst));
        let flex = f.sum(
            pool.iter()
                .filter(|(_, p)| p.position().is_flex_eligible())
                .map(|(i, _)| i),
        );
        let total = f.sum(0..pool.len());

        let max_tes = ctx.config.max_tight_ends as f64;
        let roster_size = ROSTER_SIZE as f64;

        f.require("qb_exact", constraint!(qbs == 1.0));
        f.require("rb_min", constraint!(rbs >= 2.0));
        f.require("wr_min", constraint!(wrs >= 3.0));
        f.require("te_min", constraint!(tes >= 1.0));
        f.require("te_max", constraint!(te_max <= max_tes));
        f.require("dst_exact", constraint!(dsts == 1.0));
        f.require("flex_total", constraint!(flex == FLEX_POOL_SIZE));
        f.require("roster_size", constraint!(total == roster_size));
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{labels_for, pool};
    use super::*;
    use crate::domain::PlayerRecord;
    use crate::optimizer::GenerationRequest;

    fn small_pool() -> crate::domain::PlayerPool {
        pool(vec![
            PlayerRecord::new("QB", "QB", 7_000, 20.0, "KC", "BUF"),
            PlayerRecord::new("RB", "RB", 6_000, 15.0, "KC", "BUF"),
        ])
    }

    #[test]
    fn test_salary_rule_adds_window() {
        let labels = labels_for(&SalaryRule, &small_pool(), &GenerationRequest::new(1), &[]);
        assert_eq!(labels, vec!["salary_cap", "salary_floor"]);
    }

    #[test]
    fn test_position_rule_adds_all_counts() {
        let labels = labels_for(&PositionRule, &small_pool(), &GenerationRequest::new(1), &[]);
        assert_eq!(labels.len(), 8);
        assert!(labels.contains(&"te_max".to_string()));
        assert!(labels.contains(&"flex_total".to_string()));
    }
}
