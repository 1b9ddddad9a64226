//! Turn-start scheduler.
//!
//! Watches the store for a turn boundary and runs every turn-start effect of
//! the entering player exactly once per boundary.
//!
//! ## Boundaries
//!
//! A boundary is the first observation ever, a new round, a higher turn
//! count, or the same turn count with a different active player. Any other
//! observation is a no-op, so observing after every dispatch is safe.
//!
//! ## Pass order
//!
//! 1. Special cards the entering player has held since an earlier turn
//!    are discarded, together with every effect they sourced.
//! 2. Rows back, middle, front. Within a row: the row's ally effects, then
//!    each card's effects left to right, then the row's enemy effects.
//!
//! Lists are snapshotted before iterating and each effect is looked up
//! again right before it runs, so a trigger that removes a later effect
//! stops it from firing. Failing or panicking handlers are logged and the
//! pass continues.

use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, info, warn};

use super::registry::{AbilityContext, EffectHolder, HeroRegistry, TurnStartTrigger};
use crate::board::{EffectList, Lane, RowId};
use crate::core::{CardId, GameState, PlayerId, StoreAction};
use crate::effects::Effect;
use crate::events::GameplayRequest;

/// Turn marker the scheduler compares against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnMark {
    pub round: u32,
    pub turn: u32,
    pub player: PlayerId,
}

impl TurnMark {
    #[must_use]
    pub fn of(state: &GameState) -> Self {
        Self {
            round: state.round,
            turn: state.turn_count,
            player: state.active_player,
        }
    }

    /// Does `self` start a turn after `previous`?
    #[must_use]
    pub fn is_boundary_after(self, previous: Option<Self>) -> bool {
        match previous {
            None => true,
            Some(prev) => {
                self.round != prev.round
                    || self.turn > prev.turn
                    || (self.turn == prev.turn && self.player != prev.player)
            }
        }
    }
}

/// Edge-triggered turn-start runner.
#[derive(Debug, Default)]
pub struct TurnScheduler {
    last: Cell<Option<TurnMark>>,
    running: Cell<bool>,
}

impl TurnScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last boundary a pass ran for.
    #[must_use]
    pub fn last_seen(&self) -> Option<TurnMark> {
        self.last.get()
    }

    /// Check for a boundary and run the pass if one was crossed. Returns
    /// the number of handlers that completed.
    pub fn observe(&self, ctx: &AbilityContext, heroes: &HeroRegistry) -> usize {
        if self.running.get() {
            return 0;
        }
        let state = ctx.bridge.snapshot();
        let mark = TurnMark::of(&state);
        if !mark.is_boundary_after(self.last.get()) {
            return 0;
        }

        self.running.set(true);
        info!(round = mark.round, turn = mark.turn, player = %mark.player, "turn start");
        expire_specials(ctx, &state);
        let fired = run_pass(ctx, heroes, mark.player);
        self.last.set(Some(mark));
        self.running.set(false);
        fired
    }
}

fn expire_specials(ctx: &AbilityContext, state: &GameState) {
    let hand = RowId::hand(state.active_player);
    let expired: Vec<CardId> = state
        .cards_in_row(hand)
        .filter(|card| card.expires_end_of_round && !card.is_played)
        .filter(|card| card.entered_turn.is_none_or(|turn| turn < state.turn_count))
        .map(|card| card.id)
        .collect();

    for card in expired {
        debug!(%card, "special card expired");
        ctx.bridge.dispatch(StoreAction::PurgeSourceEffects { source: card });
        ctx.bridge.dispatch(StoreAction::RemoveCard { card });
        ctx.bridge.request(GameplayRequest::Discard { card });
    }
}

fn run_pass(ctx: &AbilityContext, heroes: &HeroRegistry, player: PlayerId) -> usize {
    let mut fired = 0;
    for lane in Lane::TRIGGER_ORDER {
        let row_id = RowId::new(player, lane);
        let row = ctx.bridge.row(row_id);

        for effect in row.ally_effects.iter().filter(|e| e.runs_on_turn_start()) {
            let holder = EffectHolder::Row {
                row: row_id,
                list: EffectList::Ally,
            };
            fired += usize::from(fire(ctx, heroes, effect, holder));
        }

        for &card in &row.card_ids {
            let Some(snapshot) = ctx.bridge.card(card) else {
                continue;
            };
            for effect in snapshot.effects.iter().filter(|e| e.runs_on_turn_start()) {
                let holder = EffectHolder::Card { card, row: row_id };
                fired += usize::from(fire(ctx, heroes, effect, holder));
            }
        }

        for effect in row.enemy_effects.iter().filter(|e| e.runs_on_turn_start()) {
            let holder = EffectHolder::Row {
                row: row_id,
                list: EffectList::Enemy,
            };
            fired += usize::from(fire(ctx, heroes, effect, holder));
        }
    }
    fired
}

/// Re-read the effect from its holder so removals made by earlier handlers
/// are respected.
fn current(ctx: &AbilityContext, effect: &Effect, holder: EffectHolder) -> Option<Effect> {
    match holder {
        EffectHolder::Row { row, list } => ctx.bridge.row(row).effect(list, &effect.id).cloned(),
        EffectHolder::Card { card, .. } => ctx.bridge.card(card)?.effect(&effect.id).cloned(),
    }
}

fn fire(ctx: &AbilityContext, heroes: &HeroRegistry, effect: &Effect, holder: EffectHolder) -> bool {
    let Some(effect) = current(ctx, effect, holder) else {
        debug!(effect = %effect.id, "turn-start effect gone before it ran");
        return false;
    };
    let Some(hook) = heroes.get(&effect.hero).and_then(|h| h.on_turn_start.clone()) else {
        debug!(hero = %effect.hero, effect = %effect.id, "no turn-start handler");
        return false;
    };

    let trigger = TurnStartTrigger { effect, holder };
    match catch_unwind(AssertUnwindSafe(|| hook(ctx, &trigger))) {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            warn!(hero = %trigger.effect.hero, effect = %trigger.effect.id, %err, "turn-start handler failed");
            false
        }
        Err(_) => {
            warn!(hero = %trigger.effect.hero, effect = %trigger.effect.id, "turn-start handler panicked");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(round: u32, turn: u32, player: PlayerId) -> TurnMark {
        TurnMark { round, turn, player }
    }

    #[test]
    fn test_first_observation_is_boundary() {
        assert!(mark(1, 1, PlayerId::ONE).is_boundary_after(None));
    }

    #[test]
    fn test_same_mark_is_not_boundary() {
        let m = mark(1, 3, PlayerId::TWO);
        assert!(!m.is_boundary_after(Some(m)));
    }

    #[test]
    fn test_player_change_is_boundary() {
        let prev = mark(1, 2, PlayerId::ONE);
        assert!(mark(1, 2, PlayerId::TWO).is_boundary_after(Some(prev)));
        assert!(mark(1, 3, PlayerId::ONE).is_boundary_after(Some(prev)));
    }

    #[test]
    fn test_new_round_is_boundary() {
        let prev = mark(1, 6, PlayerId::TWO);
        assert!(mark(2, 1, PlayerId::TWO).is_boundary_after(Some(prev)));
    }
}
