//! Damage pipeline integration tests.
//!
//! These drive the pipeline through `Game`, the way hero abilities do, and
//! check stage ordering, shield consumption and reflection.

use std::cell::RefCell;
use std::rc::Rc;

use hero_clash::board::{EffectList, Lane, RowId, RowShield};
use hero_clash::cards::Card;
use hero_clash::core::{CardEdit, CardId, GameConfig, PlayerId, RowEdit, StoreAction};
use hero_clash::damage::{DamageIntent, DamageSource, Resolution};
use hero_clash::effects::{BarrierScope, Effect, EffectKind};
use hero_clash::events::CombatEvent;
use hero_clash::game::Game;
use hero_clash::triggers::HeroRegistry;
use im::Vector;
use proptest::prelude::*;

fn game() -> Game {
    Game::new(GameConfig::default(), HeroRegistry::new())
}

fn row(player: PlayerId, lane: Lane) -> RowId {
    RowId::new(player, lane)
}

fn spawn(game: &Game, at: RowId, health: i64) -> CardId {
    game.spawn_card(at, None, |id| Card::new(id, at.player, "scout", health))
}

fn barrier(scope: BarrierScope, charges: i64) -> Effect {
    Effect::new(
        "barrier",
        "bulwark",
        EffectKind::Barrier {
            scope,
            active: true,
            charges,
        },
    )
}

fn record(game: &Game) -> Rc<RefCell<Vec<CombatEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    // Dropping the handle keeps the listener attached.
    let _ = game
        .damage()
        .subscribe(move |event: &CombatEvent| sink.borrow_mut().push(event.clone()));
    events
}

// =============================================================================
// Shields
// =============================================================================

#[test]
fn test_row_shield_consumed_front_to_back() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let target = spawn(&game, front, 4);
    game.dispatch(StoreAction::EditRow {
        row: front,
        edit: RowEdit::Shield(Vector::from(vec![RowShield::new("A", 2), RowShield::new("B", 1)])),
    });

    let outcome = game.deal_damage(DamageIntent::new(target, 2).in_row(front));

    let shields = game.state().row(front).shield.clone();
    assert_eq!(shields.len(), 1, "drained shield A is removed");
    assert_eq!(shields[0].id.as_str(), "B");
    assert_eq!(shields[0].value, 1);
    assert_eq!(outcome.absorbed_by_row_shield, 2);
    assert_eq!(outcome.health_lost, 0);
    assert_eq!(game.state().card(target).unwrap().health, 4);
}

#[test]
fn test_card_shield_after_row_shield() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let target = game.spawn_card(front, None, |id| Card::new(id, PlayerId::TWO, "scout", 5).with_shield(2));
    game.dispatch(StoreAction::AddRowShield {
        row: front,
        shield: RowShield::new("wall", 1),
    });

    let outcome = game.deal_damage(DamageIntent::new(target, 4));

    assert_eq!(outcome.absorbed_by_row_shield, 1);
    assert_eq!(outcome.absorbed_by_card_shield, 2);
    assert_eq!(outcome.health_lost, 1);
    let card = game.state().card(target).cloned().unwrap();
    assert_eq!((card.shield, card.health), (0, 4));
}

#[test]
fn test_ignore_shields_hits_health_directly() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let target = game.spawn_card(front, None, |id| Card::new(id, PlayerId::TWO, "scout", 5).with_shield(3));

    let outcome = game.deal_damage(DamageIntent::new(target, 2).ignore_shields());

    assert_eq!(outcome.health_lost, 2);
    assert_eq!(game.state().card(target).unwrap().shield, 3);
}

// =============================================================================
// Absorption tokens
// =============================================================================

#[test]
fn test_column_barrier_absorbs_for_lethal_hit() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let middle = row(PlayerId::TWO, Lane::Middle);
    let target = spawn(&game, front, 3);
    let guard = game.spawn_card(middle, None, |id| {
        Card::new(id, PlayerId::TWO, "bulwark", 6).with_effect(Effect::new(
            "barrier",
            "bulwark",
            EffectKind::Barrier {
                scope: BarrierScope::Column,
                active: true,
                charges: 2,
            },
        ))
    });

    let outcome = game.deal_damage(DamageIntent::new(target, 5).in_row(front));

    assert_eq!(outcome.absorbed_by_tokens, 2);
    assert_eq!(outcome.health_lost, 3);
    assert_eq!(outcome.defeated, vec![target]);
    assert_eq!(game.state().card(target).unwrap().health, 0);
    assert!(
        game.state().card(guard).unwrap().effects.is_empty(),
        "depleted barrier is removed"
    );
}

#[test]
fn test_inactive_barrier_does_nothing() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let target = game.spawn_card(front, None, |id| {
        Card::new(id, PlayerId::TWO, "bulwark", 4).with_effect(Effect::new(
            "barrier",
            "bulwark",
            EffectKind::Barrier {
                scope: BarrierScope::Column,
                active: false,
                charges: 2,
            },
        ))
    });

    let outcome = game.deal_damage(DamageIntent::new(target, 3));
    assert_eq!(outcome.absorbed_by_tokens, 0);
    assert_eq!(outcome.health_lost, 3);
}

#[test]
fn test_partial_pool_writes_back_capacity() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let target = spawn(&game, front, 5);
    game.dispatch(StoreAction::AppendRowEffect {
        row: front,
        list: EffectList::Ally,
        effect: Effect::new("pool", "warden", EffectKind::ShieldPool { charges: 5 }),
    });

    game.deal_damage(DamageIntent::new(target, 2));

    let state = game.state();
    let pool = state.row(front).ally_effects.iter().next().cloned().unwrap();
    assert_eq!(pool.kind, EffectKind::ShieldPool { charges: 3 });
    assert_eq!(state.row(front).ally_effects.len(), 1);
}

#[test]
fn test_row_barrier_covers_only_its_row() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let middle = row(PlayerId::TWO, Lane::Middle);
    let guard = game.spawn_card(front, None, |id| {
        Card::new(id, PlayerId::TWO, "bulwark", 6).with_effect(barrier(BarrierScope::Row, 2))
    });
    let neighbour = spawn(&game, front, 5);
    let elsewhere = spawn(&game, middle, 5);

    let outside = game.deal_damage(DamageIntent::new(elsewhere, 2));
    assert_eq!(outside.absorbed_by_tokens, 0, "row barrier does not reach other rows");
    assert_eq!(outside.health_lost, 2);

    let inside = game.deal_damage(DamageIntent::new(neighbour, 3));
    assert_eq!(inside.absorbed_by_tokens, 2);
    assert_eq!(inside.health_lost, 1);
    assert!(game.state().card(guard).unwrap().effects.is_empty());
}

#[test]
fn test_absorbers_drain_in_order() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let middle = row(PlayerId::TWO, Lane::Middle);
    let target = game.spawn_card(front, None, |id| {
        Card::new(id, PlayerId::TWO, "scout", 6)
            .with_effect(Effect::new("ward", "mystic", EffectKind::Absorb { charges: 2 }))
    });
    let row_guard = game.spawn_card(front, None, |id| {
        Card::new(id, PlayerId::TWO, "bulwark", 6).with_effect(barrier(BarrierScope::Row, 1))
    });
    let column_guard = game.spawn_card(middle, None, |id| {
        Card::new(id, PlayerId::TWO, "bulwark", 6).with_effect(barrier(BarrierScope::Column, 1))
    });
    game.dispatch(StoreAction::AppendRowEffect {
        row: front,
        list: EffectList::Ally,
        effect: Effect::new("pool", "warden", EffectKind::ShieldPool { charges: 1 }),
    });

    let outcome = game.deal_damage(DamageIntent::new(target, 3));

    assert_eq!(outcome.absorbed_by_tokens, 3);
    assert_eq!(outcome.health_lost, 0);
    let state = game.state();
    assert!(state.card(column_guard).unwrap().effects.is_empty(), "column barrier first");
    assert!(state.row(front).ally_effects.is_empty(), "then the row pool");
    assert!(state.card(row_guard).unwrap().effects.is_empty(), "then the row barrier");
    assert_eq!(
        state.card(target).unwrap().effects[0].kind,
        EffectKind::Absorb { charges: 2 },
        "personal absorption is last and untouched"
    );
}

// =============================================================================
// Prevention
// =============================================================================

#[test]
fn test_invulnerable_slot_changes_nothing() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let target = game.spawn_card(front, None, |id| Card::new(id, PlayerId::TWO, "scout", 5).with_shield(1));
    game.dispatch(StoreAction::AddRowShield {
        row: front,
        shield: RowShield::new("wall", 2),
    });
    game.dispatch(StoreAction::SetInvulnerableSlots {
        row: front,
        source: CardId(99),
        columns: [0].into_iter().collect(),
    });
    let events = record(&game);
    let before = game.state();

    let outcome = game.deal_damage(DamageIntent::new(target, 9));

    assert_eq!(outcome.resolution, Resolution::Invulnerable);
    assert_eq!(game.state(), before);
    assert!(events.borrow().is_empty());
}

#[test]
fn test_missing_target() {
    let game = game();
    let outcome = game.deal_damage(DamageIntent::new(CardId(404), 3));
    assert_eq!(outcome.resolution, Resolution::MissingTarget);
}

// =============================================================================
// Modifiers
// =============================================================================

#[test]
fn test_fixed_damage_skips_modifiers() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let target = spawn(&game, front, 10);
    game.dispatch(StoreAction::AppendRowEffect {
        row: front,
        list: EffectList::Enemy,
        effect: Effect::new("marked", "hunter", EffectKind::DamageAmplification { amount: 2 }),
    });

    assert_eq!(game.deal_damage(DamageIntent::new(target, 1).fixed()).health_lost, 1);
    assert_eq!(game.deal_damage(DamageIntent::new(target, 1)).health_lost, 3);
}

#[test]
fn test_row_reduction_floors_at_one() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let target = spawn(&game, front, 10);
    game.dispatch(StoreAction::AppendRowEffect {
        row: front,
        list: EffectList::Ally,
        effect: Effect::new("fort", "warden", EffectKind::DamageReduction { amount: 5 }),
    });

    assert_eq!(game.deal_damage(DamageIntent::new(target, 3)).health_lost, 1);
}

#[test]
fn test_attacker_boost_and_row_penalty() {
    let game = game();
    let enemy_front = row(PlayerId::TWO, Lane::Front);
    let own_back = row(PlayerId::ONE, Lane::Back);
    let target = spawn(&game, enemy_front, 10);
    let attacker = game.spawn_card(own_back, None, |id| {
        Card::new(id, PlayerId::ONE, "archer", 4)
            .with_effect(Effect::new("fury", "berserker", EffectKind::DamageBoost { amount: 2 }))
    });
    game.dispatch(StoreAction::AppendRowEffect {
        row: own_back,
        list: EffectList::Enemy,
        effect: Effect::new("fog", "mystic", EffectKind::OutgoingDamageReduction { amount: 1 }),
    });

    let outcome = game.deal_damage(DamageIntent::new(target, 3).from_card(attacker));
    assert_eq!(outcome.amount, 4);
}

#[test]
fn test_target_card_amplification() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let marked = game.spawn_card(front, None, |id| {
        Card::new(id, PlayerId::TWO, "scout", 10)
            .with_effect(Effect::new("brand", "hunter", EffectKind::DamageAmplification { amount: 2 }))
    });
    let unmarked = spawn(&game, front, 10);

    assert_eq!(game.deal_damage(DamageIntent::new(marked, 1)).health_lost, 3);
    assert_eq!(game.deal_damage(DamageIntent::new(unmarked, 1)).health_lost, 1);
}

#[test]
fn test_turret_ignores_attacker_row_reduction() {
    let game = game();
    let own_back = row(PlayerId::ONE, Lane::Back);
    let target = spawn(&game, row(PlayerId::TWO, Lane::Front), 20);
    let hero = spawn(&game, own_back, 4);
    let turret = game.spawn_card(own_back, None, |id| Card::new(id, PlayerId::ONE, "engineer", 2).turret());
    game.dispatch(StoreAction::AppendRowEffect {
        row: own_back,
        list: EffectList::Enemy,
        effect: Effect::new("fog", "mystic", EffectKind::OutgoingDamageReduction { amount: 2 }),
    });

    assert_eq!(game.deal_damage(DamageIntent::new(target, 3).from_card(hero)).amount, 1);
    assert_eq!(game.deal_damage(DamageIntent::new(target, 3).from_card(turret)).amount, 3);
}

// =============================================================================
// Reflection
// =============================================================================

#[test]
fn test_spike_guard_reflects_at_current_row() {
    let game = game();
    let enemy_front = row(PlayerId::TWO, Lane::Front);
    let own_front = row(PlayerId::ONE, Lane::Front);
    let own_back = row(PlayerId::ONE, Lane::Back);
    let holder = game.spawn_card(enemy_front, None, |id| {
        Card::new(id, PlayerId::TWO, "thorn", 6).with_effect(Effect::new("spikes", "thorn", EffectKind::SpikeGuard))
    });
    let attacker = spawn(&game, own_front, 5);
    assert!(game.move_card(attacker, own_back, None));
    let events = record(&game);

    let outcome = game.deal_damage(DamageIntent::new(holder, 2).from_card(attacker));

    let reflection = outcome.reflection.expect("reflection ran");
    assert_eq!(reflection.health_lost, 1);
    assert_eq!(game.state().card(attacker).unwrap().health, 4);

    let counters: Vec<CombatEvent> = events
        .borrow()
        .iter()
        .filter(|e| matches!(e, CombatEvent::Damaged { target, .. } if *target == attacker))
        .cloned()
        .collect();
    assert_eq!(
        counters,
        vec![CombatEvent::Damaged {
            target: attacker,
            row: own_back,
            amount: 1,
            absorbed: 0,
            source: Some(holder),
            fixed: true,
            defeated: false,
        }]
    );
}

#[test]
fn test_reflection_respects_shield() {
    let game = game();
    let holder = game.spawn_card(row(PlayerId::TWO, Lane::Front), None, |id| {
        Card::new(id, PlayerId::TWO, "thorn", 6).with_effect(Effect::new("spikes", "thorn", EffectKind::SpikeGuard))
    });
    let attacker = game.spawn_card(row(PlayerId::ONE, Lane::Front), None, |id| {
        Card::new(id, PlayerId::ONE, "scout", 5).with_shield(1)
    });

    game.deal_damage(DamageIntent::new(holder, 1).from_card(attacker));

    let card = game.state().card(attacker).cloned().unwrap();
    assert_eq!((card.health, card.shield), (5, 0));
}

#[test]
fn test_no_reflection_from_ally_or_environment() {
    let game = game();
    let front = row(PlayerId::TWO, Lane::Front);
    let holder = game.spawn_card(front, None, |id| {
        Card::new(id, PlayerId::TWO, "thorn", 6).with_effect(Effect::new("spikes", "thorn", EffectKind::SpikeGuard))
    });
    let ally = spawn(&game, row(PlayerId::TWO, Lane::Back), 5);

    assert!(game.deal_damage(DamageIntent::new(holder, 1).from_card(ally)).reflection.is_none());
    assert!(game
        .deal_damage(DamageIntent::new(holder, 1).with_source(DamageSource::Environment))
        .reflection
        .is_none());
}

// =============================================================================
// Lethal interception
// =============================================================================

#[test]
fn test_cheat_death_once_per_round() {
    let game = Game::new(GameConfig::default().with_cheat_death("phoenix", 2), HeroRegistry::new());
    let front = row(PlayerId::TWO, Lane::Front);
    let phoenix = game.spawn_card(front, None, |id| {
        Card::new(id, PlayerId::TWO, "phoenix", 3).with_effect(Effect::new("burn", "pyro", EffectKind::Status))
    });
    game.dispatch(StoreAction::UpdateRowSynergy { row: front, delta: 2 });

    let first = game.deal_damage(DamageIntent::new(phoenix, 5));
    assert_eq!(first.resolution, Resolution::Intercepted);
    let state = game.state();
    let card = state.card(phoenix).unwrap();
    assert_eq!(card.health, 3);
    assert!(card.effects.is_empty());
    assert_eq!(state.row(front).synergy, 0);
    assert!(state.ultimate_used(PlayerId::TWO, &card.hero));

    let second = game.deal_damage(DamageIntent::new(phoenix, 5));
    assert_eq!(second.resolution, Resolution::Applied);
    assert_eq!(second.defeated, vec![phoenix]);
}

#[test]
fn test_cheat_death_needs_synergy() {
    let game = Game::new(GameConfig::default().with_cheat_death("phoenix", 2), HeroRegistry::new());
    let phoenix = spawn_hero(&game, "phoenix", 3);

    let outcome = game.deal_damage(DamageIntent::new(phoenix, 5));
    assert_eq!(outcome.resolution, Resolution::Applied);
    assert_eq!(game.state().card(phoenix).unwrap().health, 0);
}

fn spawn_hero(game: &Game, hero: &'static str, health: i64) -> CardId {
    game.spawn_card(row(PlayerId::TWO, Lane::Front), None, |id| Card::new(id, PlayerId::TWO, hero, health))
}

// =============================================================================
// Healing
// =============================================================================

#[test]
fn test_heal_clamps_and_skips_defeated() {
    let game = game();
    let target = spawn(&game, row(PlayerId::ONE, Lane::Front), 5);
    game.dispatch(StoreAction::EditCard {
        card: target,
        edit: CardEdit::Health(3),
    });

    assert_eq!(game.heal(target, 10), 2);
    assert_eq!(game.state().card(target).unwrap().health, 5);

    game.deal_damage(DamageIntent::new(target, 9));
    assert_eq!(game.heal(target, 2), 0);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_shields_drain_before_health(
        amount in 0i64..20,
        row_shield in 0i64..6,
        card_shield in 0i64..4,
        health in 1i64..12,
    ) {
        let game = game();
        let front = row(PlayerId::TWO, Lane::Front);
        let target = game.spawn_card(front, None, |id| {
            Card::new(id, PlayerId::TWO, "scout", health).with_shield(card_shield)
        });
        if row_shield > 0 {
            game.dispatch(StoreAction::AddRowShield { row: front, shield: RowShield::new("wall", row_shield) });
        }

        let outcome = game.deal_damage(DamageIntent::new(target, amount));

        let from_row = amount.min(row_shield);
        let from_card = (amount - from_row).min(card_shield);
        prop_assert_eq!(outcome.absorbed_by_row_shield, from_row);
        prop_assert_eq!(outcome.absorbed_by_card_shield, from_card);
        prop_assert_eq!(outcome.health_lost, (amount - from_row - from_card).min(health));
        prop_assert!(outcome.health_lost <= amount);
    }

    #[test]
    fn prop_fixed_damage_ignores_modifiers(
        amount in 0i64..10,
        amplify in 0i64..4,
        reduce in 0i64..4,
        health in 1i64..12,
    ) {
        let game = game();
        let front = row(PlayerId::TWO, Lane::Front);
        let target = spawn(&game, front, health);
        game.dispatch(StoreAction::AppendRowEffect {
            row: front,
            list: EffectList::Enemy,
            effect: Effect::new("amp", "hunter", EffectKind::DamageAmplification { amount: amplify }),
        });
        game.dispatch(StoreAction::AppendRowEffect {
            row: front,
            list: EffectList::Ally,
            effect: Effect::new("fort", "warden", EffectKind::DamageReduction { amount: reduce }),
        });

        let outcome = game.deal_damage(DamageIntent::new(target, amount).fixed());

        prop_assert_eq!(outcome.amount, amount);
        prop_assert_eq!(outcome.health_lost, amount.min(health));
    }
}
