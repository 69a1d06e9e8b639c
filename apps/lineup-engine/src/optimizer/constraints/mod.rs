//! Roster rules for one optimization round.
//!
//! Each business rule is a [`RosterRule`] that writes its constraints into a
//! [`Formulation`]. A [`ConstraintSet`] is the ordered registry the optimizer
//! walks every round:
//! - Site rules (salary, positions)
//! - User selections (locks, excludes)
//! - Batch knobs (ownership ceiling, smart-value floor, uniqueness, exposure)
//! - Stacking (QB stacks, game stack)
//! - Safety defaults (unsafe QBs, ownership balance, anchor RB)
//!
//! Rules never solve anything. Adding or removing a rule does not touch the
//! solve loop.

mod diversity;
mod ownership;
mod roster;
mod safety;
mod selection;
mod smart_value;
mod stacking;

use std::fmt;

use good_lp::{Constraint, Expression, ProblemVariables, Variable, constraint, variable};

use crate::config::OptimizerConfig;
use crate::domain::{Lineup, PlayerPool};

use super::ledger::ExposureLedger;
use super::request::GenerationRequest;

pub use diversity::{ExposureRule, UniquenessRule};
pub use ownership::OwnershipCeilingRule;
pub use roster::{PositionRule, SalaryRule};
pub use safety::{AnchorRbRule, ChalkFloorRule, LowOwnershipCapRule, UnsafeQbRule};
pub use selection::{ExcludedPlayersRule, LockedPlayersRule};
pub use smart_value::SmartValueFloorRule;
pub use stacking::{GameStackRule, QbStackRule};

// ============================================
// Round context
// ============================================

/// Everything a rule may consult when formulating a round.
#[derive(Debug, Clone, Copy)]
pub struct RoundContext<'a> {
    /// Candidate players; index `i` owns decision variable `i`.
    pub pool: &'a PlayerPool,
    /// Batch parameters.
    pub request: &'a GenerationRequest,
    /// Site rules and thresholds.
    pub config: &'a OptimizerConfig,
    /// Lineups accepted in earlier rounds.
    pub accepted: &'a [Lineup],
    /// Appearance counts over `accepted`.
    pub exposure: &'a ExposureLedger,
}

// ============================================
// Formulation
// ============================================

/// A named linear constraint.
pub struct LabeledConstraint {
    /// Human-readable label, e.g. `"salary_cap"`.
    pub label: String,
    /// The constraint itself.
    pub constraint: Constraint,
}

/// One round's integer program under construction: a binary decision
/// variable per pooled player, the projection objective, and the constraints
/// added by rules.
pub struct Formulation {
    pub(crate) variables: ProblemVariables,
    pub(crate) picks: Vec<Variable>,
    pub(crate) objective: Expression,
    pub(crate) constraints: Vec<LabeledConstraint>,
}

impl Formulation {
    /// Declare one binary per player and the objective Σ projection·x.
    pub fn new(pool: &PlayerPool) -> Self {
        let mut variables = ProblemVariables::new();
        let picks: Vec<Variable> = (0..pool.len())
            .map(|_| variables.add(variable().binary()))
            .collect();

        let mut objective = Expression::with_capacity(pool.len());
        for (i, player) in pool.iter() {
            objective.add_mul(player.projection(), picks[i]);
        }

        Self {
            variables,
            picks,
            objective,
            constraints: Vec::new(),
        }
    }

    /// Decision variable for pool index `index`.
    pub fn pick(&self, index: usize) -> Variable {
        self.picks[index]
    }

    /// Number of player variables.
    pub fn player_count(&self) -> usize {
        self.picks.len()
    }

    /// Σ x over `indices`.
    pub fn sum<I>(&self, indices: I) -> Expression
    where
        I: IntoIterator<Item = usize>,
    {
        self.weighted(indices.into_iter().map(|i| (i, 1.0)))
    }

    /// Σ coefficient·x over `terms`.
    pub fn weighted<I>(&self, terms: I) -> Expression
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut expr = Expression::with_capacity(self.picks.len());
        for (i, coefficient) in terms {
            expr.add_mul(coefficient, self.picks[i]);
        }
        expr
    }

    /// Declare an auxiliary binary variable.
    pub fn add_binary(&mut self) -> Variable {
        self.variables.add(variable().binary())
    }

    /// Add a constraint.
    pub fn require(&mut self, label: impl Into<String>, constraint: Constraint) {
        self.constraints.push(LabeledConstraint {
            label: label.into(),
            constraint,
        });
    }

    /// Pin player `index` to `value` (0 or 1).
    pub fn fix(&mut self, label: impl Into<String>, index: usize, value: f64) {
        let pick = self.sum([index]);
        self.require(label, constraint!(pick == value));
    }

    /// Constraints added so far.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Labels of the constraints added so far, in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(|c| c.label.as_str())
    }
}

impl fmt::Debug for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formulation")
            .field("players", &self.picks.len())
            .field("constraints", &self.constraints.len())
            .finish_non_exhaustive()
    }
}

// ============================================
// Rules
// ============================================

/// A business rule that contributes constraints to a round.
pub trait RosterRule: Send + Sync + fmt::Debug {
    /// Stable identifier used to remove or report the rule.
    fn name(&self) -> &'static str;

    /// Add this rule's constraints for the round described by `ctx`.
    fn apply(&self, formulation: &mut Formulation, ctx: &RoundContext<'_>);
}

/// Ordered registry of rules applied every round.
#[derive(Debug, Default)]
pub struct ConstraintSet {
    rules: Vec<Box<dyn RosterRule>>,
}

impl ConstraintSet {
    /// No rules at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every built-in rule, in application order.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(SalaryRule)
            .with_rule(PositionRule)
            .with_rule(LockedPlayersRule)
            .with_rule(ExcludedPlayersRule)
            .with_rule(OwnershipCeilingRule)
            .with_rule(SmartValueFloorRule)
            .with_rule(UniquenessRule)
            .with_rule(ExposureRule)
            .with_rule(QbStackRule)
            .with_rule(GameStackRule)
            .with_rule(UnsafeQbRule)
            .with_rule(LowOwnershipCapRule)
            .with_rule(ChalkFloorRule)
            .with_rule(AnchorRbRule)
    }

    /// Append a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: impl RosterRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Drop every rule named `name`.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.rules.retain(|r| r.name() != name);
        self
    }

    /// Rule names in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Build a round's formulation by applying every rule.
    pub fn formulate(&self, ctx: &RoundContext<'_>) -> Formulation {
        let mut formulation = Formulation::new(ctx.pool);
        for rule in &self.rules {
            let before = formulation.constraint_count();
            rule.apply(&mut formulation, ctx);
            tracing::trace!(
                rule = rule.name(),
                added = formulation.constraint_count() - before,
                "Applied roster rule"
            );
        }
        formulation
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::OptimizerConfig;
    use crate::domain::{Lineup, PlayerPool, PlayerRecord, SalaryBounds};
    use crate::optimizer::ledger::ExposureLedger;
    use crate::optimizer::request::GenerationRequest;

    use super::{Formulation, RosterRule, RoundContext};

    pub fn pool(records: Vec<PlayerRecord>) -> PlayerPool {
        PlayerPool::from_records(records, &SalaryBounds::default()).unwrap()
    }

    /// Apply one rule to a fresh formulation and return its labels.
    pub fn labels_for(
        rule: &dyn RosterRule,
        pool: &PlayerPool,
        request: &GenerationRequest,
        accepted: &[Lineup],
    ) -> Vec<String> {
        let config = OptimizerConfig::default();
        let exposure = ExposureLedger::from_lineups(accepted);
        let ctx = RoundContext {
            pool,
            request,
            config: &config,
            accepted,
            exposure: &exposure,
        };
        let mut formulation = Formulation::new(pool);
        rule.apply(&mut formulation, &ctx);
        formulation.labels().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_order() {
        let names = ConstraintSet::standard().names();
        assert_eq!(names.first(), Some(&"salary"));
        assert_eq!(names.last(), Some(&"anchor_rb"));
        assert_eq!(names.len(), 14);
    }

    #[test]
    fn test_without_removes_rule() {
        let set = ConstraintSet::standard().without("game_stack");
        assert!(!set.names().contains(&"game_stack"));
        assert_eq!(set.names().len(), 13);
    }
}
