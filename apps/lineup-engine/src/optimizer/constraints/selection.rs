//! User selections: locked and excluded players.

use crate::domain::PlayerSelection;

use super::{Formulation, RosterRule, RoundContext};

/// Locked players appear in every lineup.
#[derive(Debug, Clone, Copy)]
pub struct LockedPlayersRule;

impl RosterRule for LockedPlayersRule {
    fn name(&self) -> &'static str {
        "locked"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        for (i, player) in ctx.pool.iter() {
            if player.selection() == PlayerSelection::Locked {
                f.fix(format!("lock:{}", player.name()), i, 1.0);
            }
        }
    }
}

/// Excluded players never appear.
#[derive(Debug, Clone, Copy)]
pub struct ExcludedPlayersRule;

impl RosterRule for ExcludedPlayersRule {
    fn name(&self) -> &'static str {
        "excluded"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        for (i, player) in ctx.pool.iter() {
            if player.selection() == PlayerSelection::Excluded {
                f.fix(format!("exclude:{}", player.name()), i, 0.0);
            }
        }
    }
}
