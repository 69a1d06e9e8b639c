//! Batch diversity: pairwise uniqueness and per-player exposure.

use good_lp::constraint;

use super::{Formulation, RosterRule, RoundContext};

/// For each accepted lineup, the new lineup may reuse at most
/// `floor(9 * (1 - uniqueness))` of its players.
#[derive(Debug, Clone, Copy)]
pub struct UniquenessRule;

impl RosterRule for UniquenessRule {
    fn name(&self) -> &'static str {
        "uniqueness"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let max_shared = ctx.request.max_shared_players() as f64;

        for previous in ctx.accepted {
            let indices: Vec<usize> = ctx
                .pool
                .iter()
                .filter(|(_, p)| previous.contains(p.name()))
                .map(|(i, _)| i)
                .collect();
            let overlap = f.sum(indices);
            f.require(
                format!("unique_vs_{}", previous.lineup_id()),
                constraint!(overlap <= max_shared),
            );
        }
    }
}

/// Players that reached `floor(lineup_count * max_exposure)` appearances are
/// excluded from later rounds.
#[derive(Debug, Clone, Copy)]
pub struct ExposureRule;

impl RosterRule for ExposureRule {
    fn name(&self) -> &'static str {
        "exposure"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let limit = ctx.request.exposure_limit();
        for (i, player) in ctx.pool.iter() {
            if ctx.exposure.is_saturated(player.name(), limit) {
                f.fix(format!("exposure:{}", player.name()), i, 0.0);
            }
        }
    }
}
