//! Correlation-seeking rules: QB stacks and the high-total game stack.

use std::collections::BTreeMap;

use good_lp::{Expression, constraint};

use crate::domain::Position;

use super::{Formulation, RosterRule, RoundContext};

/// Tie the quarterback to his pass catchers.
///
/// Forward: a selected QB needs at least one same-team WR/TE.
/// Reverse: on teams with two or more pass catchers and a QB,
/// `Σ catchers >= 2 * x_qb`, so a selected QB brings two of them. With zero or
/// one catcher selected the QB is simply left out; that is intended.
#[derive(Debug, Clone, Copy)]
pub struct QbStackRule;

impl RosterRule for QbStackRule {
    fn name(&self) -> &'static str {
        "qb_stack"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        if !ctx.request.stacking_enabled {
            return;
        }

        for qb_index in ctx.pool.indices_at(Position::Qb) {
            let Some(qb) = ctx.pool.get(qb_index) else {
                continue;
            };
            let catchers: Vec<usize> = ctx
                .pool
                .iter()
                .filter(|(_, p)| p.position().is_pass_catcher() && p.team() == qb.team())
                .map(|(i, _)| i)
                .collect();

            let mut forward = f.sum(catchers.iter().copied());
            forward.add_mul(-1.0, f.pick(qb_index));
            f.require(
                format!("stack_forward:{}", qb.name()),
                constraint!(forward >= 0.0),
            );

            if catchers.len() >= 2 {
                let mut reverse = f.sum(catchers);
                reverse.add_mul(-2.0, f.pick(qb_index));
                f.require(
                    format!("stack_reverse:{}", qb.name()),
                    constraint!(reverse >= 0.0),
                );
            }
        }
    }
}

/// At least one game with an over/under at or above the threshold must
/// contribute `min_players` players.
///
/// One auxiliary binary per qualifying game; `Σ game players >= k * g` and
/// `Σ g >= 1`. Skipped when stacking is off, the rule is disabled, or no
/// player carries a game total.
#[derive(Debug, Clone, Copy)]
pub struct GameStackRule;

impl RosterRule for GameStackRule {
    fn name(&self) -> &'static str {
        "game_stack"
    }

    fn apply(&self, f: &mut Formulation, ctx: &RoundContext<'_>) {
        let settings = &ctx.config.game_stack;
        if !ctx.request.stacking_enabled || !settings.enabled {
            return;
        }

        // First reported total per game wins.
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for (_, player) in ctx.pool.iter() {
            if let Some(total) = player.game_total() {
                totals.entry(player.game_key()).or_insert(total);
            }
        }
        if totals.is_empty() {
            return;
        }

        let qualifying: Vec<&String> = totals
            .iter()
            .filter(|(_, total)| **total >= settings.min_game_total)
            .map(|(key, _)| key)
            .collect();
        if qualifying.is_empty() {
            tracing::debug!(
                threshold = settings.min_game_total,
                "Game stack skipped: no game meets the total threshold"
            );
            return;
        }

        let mut indicators = Vec::with_capacity(qualifying.len());
        for key in qualifying {
            let indicator = f.add_binary();
            let members: Vec<usize> = ctx
                .pool
                .iter()
                .filter(|(_, p)| p.game_key() == *key)
                .map(|(i, _)| i)
                .collect();
            let mut stacked = f.sum(members);
            stacked.add_mul(-(settings.min_players as f64), indicator);
            f.require(format!("game_stack:{key}"), constraint!(stacked >= 0.0));
            indicators.push(indicator);
        }

        let mut any = Expression::with_capacity(indicators.len());
        for indicator in indicators {
            any.add_mul(1.0, indicator);
        }
        f.require("game_stack_any", constraint!(any >= 1.0));
    }
}
