//! Ownership ceiling.

use good_lp::constraint;

use super::{Formulation, RosterRule, RoundContext};

/// For every player with ownership: `x * ownership / 100 <= cap`.
///
/// With binary `x` this bans players owned above the cap. Players without an
/// ownership figure are unconstrained.
#[derive(Debug, Clone, Copy)]
pub struct OwnershipCeilingRule;

impl RosterRule for OwnershipCeilingRule {
    fn name(&self) -> &'static str {
        "ownership_ceiling"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let Some(cap) = ctx.request.ownership_cap else {
            return;
        };

        for (i, player) in ctx.pool.iter() {
            let Some(ownership) = player.ownership() else {
                continue;
            };
            let exposure = f.weighted([(i, ownership / 100.0)]);
            f.require(
                format!("ownership:{}", player.name()),
                constraint!(exposure <= cap),
            );
        }
    }
}
