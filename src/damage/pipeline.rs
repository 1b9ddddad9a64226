//! Ordered damage resolution.
//!
//! A damage intent passes through these stages in exactly this order. Any
//! stage may end resolution early.
//!
//! | # | Stage | Ends early when |
//! |---|-------|-----------------|
//! | 1 | Invulnerable slot | target's slot is protected |
//! | 2 | Immunity | target carries an immunity |
//! | 3 | Spike guard | (schedules reflection for stage 13) |
//! | 4 | Lethal interception | cheat-death ultimate fires |
//! | 5 | Fixed damage | (skips 6-11) |
//! | 6 | Attacker row reduction | |
//! | 7 | Attacker boost | |
//! | 8 | Target row amplification | |
//! | 9 | Target card amplification | |
//! | 10 | Target row reduction, floor 1 | |
//! | 11 | Absorption scan | |
//! | 12 | Commit: row shield, card shield, health | |
//! | 13 | Deferred reflection | |
//!
//! Reordering stages changes which modifier consumes damage first and is a
//! rules change.

use im::Vector;
use tracing::{debug, info};

use super::intent::{DamageIntent, DamageOutcome, DamageSource, Resolution};
use crate::board::{EffectList, RowId};
use crate::cards::Card;
use crate::core::{CardEdit, CardId, GameState, RowEdit, Store, StoreAction};
use crate::effects::{BarrierScope, Effect, EffectKind};
use crate::events::{CombatEvent, EventBus};

/// Resolve one damage intent against the store.
pub(crate) fn resolve(
    store: &Store,
    combat: &EventBus<CombatEvent>,
    intent: DamageIntent,
) -> DamageOutcome {
    let state = store.state();

    let Some(target) = state.card(intent.target).cloned() else {
        debug!(target = %intent.target, "damage target does not exist");
        return DamageOutcome::short_circuit(Resolution::MissingTarget);
    };
    let Some(row) = state.row_of(target.id) else {
        debug!(target = %target.id, "damage target is not in a row");
        return DamageOutcome::short_circuit(Resolution::MissingTarget);
    };
    if let Some(claimed) = intent.row.filter(|&r| r != row) {
        debug!(target = %target.id, %claimed, actual = %row, "stale target row, using actual");
    }

    // 1. Invulnerable slot
    if state.is_card_invulnerable(target.id) {
        debug!(target = %target.id, stage = "invulnerability", "damage prevented");
        return DamageOutcome::short_circuit(Resolution::Invulnerable);
    }

    // 2. Immunity
    if target
        .effects
        .iter()
        .any(|e| matches!(e.kind, EffectKind::Immunity(_)))
    {
        debug!(target = %target.id, stage = "immunity", "damage prevented");
        return DamageOutcome::short_circuit(Resolution::Immune);
    }

    // 3. Spike guard
    let reflect_at = spike_guard_target(&state, &target, intent.source);

    // 4. Lethal interception
    if intercept_lethal(store, &state, &target, row, &intent) {
        combat.publish(&CombatEvent::Intercepted {
            target: target.id,
            row,
        });
        return DamageOutcome::short_circuit(Resolution::Intercepted);
    }

    // 5-10. Modifiers, skipped entirely for fixed damage
    let amount = if intent.fixed {
        intent.amount.max(0)
    } else {
        apply_modifiers(&state, &target, row, &intent)
    };

    // 11. Absorption
    let (remaining, absorbed_by_tokens) = if intent.fixed || intent.ignore_shields {
        (amount, 0)
    } else {
        absorb(store, &state, &target, row, amount)
    };

    // 12. Commit
    let mut outcome = commit(store, combat, &target, row, &intent, amount, remaining);
    outcome.absorbed_by_tokens = absorbed_by_tokens;

    // 13. Deferred reflection, at the attacker's row as of now
    if let Some(attacker) = reflect_at {
        match store.row_of(attacker) {
            Some(current) => {
                let counter = DamageIntent::new(attacker, store.config().spike_guard_damage)
                    .in_row(current)
                    .with_source(DamageSource::Reflection(target.id))
                    .fixed();
                let reflected = resolve(store, combat, counter);
                outcome.defeated.extend(reflected.defeated.iter().copied());
                outcome.reflection = Some(Box::new(reflected));
            }
            None => debug!(%attacker, "attacker left the table, reflection dropped"),
        }
    }

    outcome
}

/// Attacker to strike back at, if the target has a spike guard and the
/// damage comes from an opposing card.
fn spike_guard_target(state: &GameState, target: &Card, source: DamageSource) -> Option<CardId> {
    let attacker = state.card(source.card()?)?;
    let guarded = target
        .effects
        .iter()
        .any(|e| matches!(e.kind, EffectKind::SpikeGuard));
    (guarded && attacker.owner != target.owner).then_some(attacker.id)
}

/// Divert lethal damage into the configured cheat-death ultimate.
fn intercept_lethal(
    store: &Store,
    state: &GameState,
    target: &Card,
    row: RowId,
    intent: &DamageIntent,
) -> bool {
    let Some(rule) = &store.config().cheat_death else {
        return false;
    };
    if target.hero != rule.hero
        || target.is_defeated()
        || state.ultimate_used(target.owner, &target.hero)
    {
        return false;
    }

    let shields = if intent.ignore_shields {
        0
    } else {
        state.row(row).total_shield() + target.shield
    };
    let incoming = (intent.amount - shields).max(0);
    if target.health - incoming > 0 {
        return false;
    }
    let synergy = state.row(row).synergy;
    if synergy < rule.synergy_cost {
        debug!(target = %target.id, synergy, cost = rule.synergy_cost, "cannot afford interception");
        return false;
    }

    store.dispatch(StoreAction::EditCard {
        card: target.id,
        edit: CardEdit::Health(target.health),
    });
    store.dispatch(StoreAction::EditCard {
        card: target.id,
        edit: CardEdit::Effects(Vector::new()),
    });
    store.dispatch(StoreAction::UpdateRowSynergy {
        row,
        delta: -rule.synergy_cost,
    });
    store.dispatch(StoreAction::MarkUltimateUsed {
        player: target.owner,
        hero: target.hero.clone(),
    });
    info!(target = %target.id, hero = %target.hero, stage = "interception", "lethal damage intercepted");
    true
}

fn sum<'a>(effects: impl Iterator<Item = &'a Effect>, pick: impl Fn(&EffectKind) -> Option<i64>) -> i64 {
    effects.filter_map(|e| pick(&e.kind)).sum()
}

/// Stages 6 through 10.
fn apply_modifiers(state: &GameState, target: &Card, row: RowId, intent: &DamageIntent) -> i64 {
    let mut amount = intent.amount.max(0);

    if let Some(attacker) = intent.source.card().and_then(|id| state.card(id)) {
        // 6. Attacker row reduction
        if !attacker.is_turret() {
            if let Some(attacker_row) = state.row_of(attacker.id) {
                let cut = sum(state.row(attacker_row).all_effects(), |k| match k {
                    EffectKind::OutgoingDamageReduction { amount } => Some(*amount),
                    _ => None,
                });
                amount = (amount - cut).max(0);
            }
        }

        // 7. Attacker boost
        amount += sum(attacker.effects.iter(), |k| match k {
            EffectKind::DamageBoost { amount } => Some(*amount),
            _ => None,
        });
    }

    let amplification = |k: &EffectKind| match k {
        EffectKind::DamageAmplification { amount } => Some(*amount),
        _ => None,
    };

    // 8. Target row amplification
    amount += sum(state.row(row).all_effects(), amplification);

    // 9. Target card amplification
    amount += sum(target.effects.iter(), amplification);

    // 10. Target row reduction, never below 1
    let cut = sum(state.row(row).all_effects(), |k| match k {
        EffectKind::DamageReduction { amount } => Some(*amount),
        _ => None,
    });
    if amount > 0 && cut > 0 {
        amount = (amount - cut).max(1);
    }

    amount.max(0)
}

/// Running absorption total for stage 11.
struct Absorber<'a> {
    store: &'a Store,
    remaining: i64,
    absorbed: i64,
}

impl Absorber<'_> {
    fn done(&self) -> bool {
        self.remaining <= 0
    }

    /// Consume from one token. Returns the token's capacity afterwards.
    fn take(&mut self, capacity: i64) -> i64 {
        let used = capacity.min(self.remaining).max(0);
        self.remaining -= used;
        self.absorbed += used;
        capacity - used
    }

    fn drain_card(&mut self, card: &Card, pick: impl Fn(&EffectKind) -> bool) {
        for effect in card.effects.iter().filter(|e| pick(&e.kind)) {
            if self.done() {
                return;
            }
            let Some(capacity) = effect.capacity().filter(|&c| c > 0) else {
                continue;
            };
            let left = self.take(capacity);
            self.store.dispatch(StoreAction::SetCardEffectCapacity {
                card: card.id,
                id: effect.id.clone(),
                remaining: left,
            });
        }
    }
}

/// Stage 11: column barrier, row shield pool, row barrier, personal absorb.
fn absorb(store: &Store, state: &GameState, target: &Card, row: RowId, amount: i64) -> (i64, i64) {
    let mut absorber = Absorber {
        store,
        remaining: amount,
        absorbed: 0,
    };
    let allies = |card: &&Card| card.owner == target.owner && !card.is_defeated();

    // a. Column barrier on any ally in the target's column
    if let Some(column) = state.row(row).column_of(target.id).filter(|_| row.is_board()) {
        let column_cards: Vec<&Card> = state
            .column(target.owner, column)
            .filter_map(|(_, id)| state.card(id))
            .filter(allies)
            .collect();
        for card in column_cards {
            absorber.drain_card(card, |k| {
                matches!(k, EffectKind::Barrier { scope: BarrierScope::Column, active: true, .. })
            });
        }
    }

    // b. Row shield pool
    for list in [EffectList::Ally, EffectList::Enemy] {
        for effect in state.row(row).effects(list).iter() {
            if absorber.done() {
                break;
            }
            let EffectKind::ShieldPool { charges } = effect.kind else {
                continue;
            };
            if charges <= 0 {
                continue;
            }
            let left = absorber.take(charges);
            store.dispatch(StoreAction::SetRowEffectCapacity {
                row,
                list,
                id: effect.id.clone(),
                remaining: left,
            });
        }
    }

    // c. Row barrier on an ally in the same row
    let row_cards: Vec<&Card> = state.cards_in_row(row).filter(allies).collect();
    for card in row_cards {
        absorber.drain_card(card, |k| {
            matches!(k, EffectKind::Barrier { scope: BarrierScope::Row, active: true, .. })
        });
    }

    // d. Personal absorption
    absorber.drain_card(target, |k| matches!(k, EffectKind::Absorb { .. }));

    if absorber.absorbed > 0 {
        debug!(target = %target.id, absorbed = absorber.absorbed, stage = "absorption", "tokens absorbed damage");
    }
    (absorber.remaining, absorber.absorbed)
}

/// Stage 12: row shield, card shield, health, then the event.
fn commit(
    store: &Store,
    combat: &EventBus<CombatEvent>,
    target: &Card,
    row: RowId,
    intent: &DamageIntent,
    amount: i64,
    remaining: i64,
) -> DamageOutcome {
    let state = store.state();
    let card = state.card(target.id).unwrap_or(target);
    let mut left = remaining.max(0);
    let mut row_absorbed = 0;
    let mut card_absorbed = 0;

    if !intent.ignore_shields {
        let shields = &state.row(row).shield;
        if left > 0 && !shields.is_empty() {
            let mut kept = Vector::new();
            for mut shield in shields.iter().cloned() {
                let used = shield.value.min(left);
                shield.value -= used;
                left -= used;
                row_absorbed += used;
                if shield.value > 0 {
                    kept.push_back(shield);
                }
            }
            store.dispatch(StoreAction::EditRow {
                row,
                edit: RowEdit::Shield(kept),
            });
        }

        card_absorbed = card.shield.min(left);
        if card_absorbed > 0 {
            left -= card_absorbed;
            store.dispatch(StoreAction::EditCard {
                card: card.id,
                edit: CardEdit::Shield(card.shield - card_absorbed),
            });
        }
    }

    let before = card.health;
    let after = (before - left).max(0);
    if after != before {
        store.dispatch(StoreAction::EditCard {
            card: card.id,
            edit: CardEdit::Health(after),
        });
    }
    let defeated = before > 0 && after == 0;

    combat.publish(&CombatEvent::Damaged {
        target: card.id,
        row,
        amount,
        absorbed: amount - left,
        source: intent.source.credited_card(),
        fixed: intent.fixed,
        defeated,
    });

    DamageOutcome {
        resolution: Resolution::Applied,
        amount,
        absorbed_by_tokens: 0,
        absorbed_by_row_shield: row_absorbed,
        absorbed_by_card_shield: card_absorbed,
        health_lost: before - after,
        defeated: if defeated { vec![card.id] } else { Vec::new() },
        reflection: None,
    }
}
