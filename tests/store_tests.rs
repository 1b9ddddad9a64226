//! State store integration tests.
//!
//! These verify the reducer contract through the public `Store` handle:
//! no-op removals, independent invulnerability sources, row capacity,
//! deterministic shuffles and configuration loading.

use hero_clash::board::{EffectList, Lane, RowId};
use hero_clash::cards::Card;
use hero_clash::core::{
    CardId, CardUpdate, ConfigError, GameConfig, GameState, PlayerId, Store, StoreAction,
};
use hero_clash::effects::{Effect, EffectId, EffectKind};
use proptest::prelude::*;

fn front(player: PlayerId) -> RowId {
    RowId::new(player, Lane::Front)
}

fn spawn(store: &Store, row: RowId, health: i64) -> CardId {
    store.create_card(row, None, |id| Card::new(id, row.player, "scout", health))
}

// =============================================================================
// Effect removal
// =============================================================================

#[test]
fn test_removing_missing_effect_is_noop() {
    let store = Store::new(GameConfig::default());
    let card = spawn(&store, front(PlayerId::ONE), 3);
    store.dispatch(StoreAction::AppendCardEffect {
        card,
        effect: Effect::new("mark", "hunter", EffectKind::Status),
    });
    let before = store.state();

    store.dispatch(StoreAction::RemoveCardEffect {
        card,
        id: EffectId::new("ghost"),
    });
    store.dispatch(StoreAction::RemoveRowEffect {
        row: front(PlayerId::TWO),
        list: EffectList::Enemy,
        id: EffectId::new("ghost"),
    });
    store.dispatch(StoreAction::RemoveCardEffect {
        card: CardId(999),
        id: EffectId::new("mark"),
    });

    assert_eq!(store.state(), before);
}

#[test]
fn test_removal_twice_equals_once() {
    let store = Store::new(GameConfig::default());
    let row = front(PlayerId::ONE);
    store.dispatch(StoreAction::AppendRowEffect {
        row,
        list: EffectList::Ally,
        effect: Effect::new("aura", "medic", EffectKind::Healing { amount: 1 }),
    });
    let remove = StoreAction::RemoveRowEffect {
        row,
        list: EffectList::Ally,
        id: EffectId::new("aura"),
    };

    let once = store.dispatch(remove.clone());
    let twice = store.dispatch(remove);

    assert_eq!(once, twice);
    assert!(twice.row(row).ally_effects.is_empty());
}

#[test]
fn test_purge_source_reaches_cards_and_rows() {
    let store = Store::new(GameConfig::default());
    let source = spawn(&store, front(PlayerId::ONE), 3);
    let other = spawn(&store, front(PlayerId::TWO), 3);
    store.dispatch(StoreAction::AppendCardEffect {
        card: other,
        effect: Effect::new("brand", "hunter", EffectKind::Status).from_card(source),
    });
    store.dispatch(StoreAction::AppendRowEffect {
        row: front(PlayerId::TWO),
        list: EffectList::Enemy,
        effect: Effect::new("mine", "bastion", EffectKind::EntryHazard { damage: 1 }).from_card(source),
    });
    store.dispatch(StoreAction::AppendRowEffect {
        row: front(PlayerId::TWO),
        list: EffectList::Enemy,
        effect: Effect::new("other", "bastion", EffectKind::EntryHazard { damage: 1 }),
    });

    let state = store.dispatch(StoreAction::PurgeSourceEffects { source });

    assert!(state.card(other).unwrap().effects.is_empty());
    let left: Vec<&str> = state
        .row(front(PlayerId::TWO))
        .enemy_effects
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(left, vec!["other"]);
}

// =============================================================================
// Invulnerable slots
// =============================================================================

#[test]
fn test_overlapping_invulnerability_sources() {
    let store = Store::new(GameConfig::default());
    let row = front(PlayerId::ONE);
    let (a, b) = (CardId(50), CardId(51));
    store.dispatch(StoreAction::SetInvulnerableSlots {
        row,
        source: a,
        columns: [0, 1].into_iter().collect(),
    });
    store.dispatch(StoreAction::SetInvulnerableSlots {
        row,
        source: b,
        columns: [1, 2].into_iter().collect(),
    });
    assert!((0..3).all(|c| store.is_slot_invulnerable(row, c)));

    store.dispatch(StoreAction::ClearInvulnerableSlots { row, source: a });

    assert!(!store.is_slot_invulnerable(row, 0));
    assert!(store.is_slot_invulnerable(row, 1));
    assert!(store.is_slot_invulnerable(row, 2));

    store.dispatch(StoreAction::ClearInvulnerableSlots { row, source: b });
    assert!((0..4).all(|c| !store.is_slot_invulnerable(row, c)));
}

#[test]
fn test_invulnerability_is_per_row() {
    let store = Store::new(GameConfig::default());
    store.dispatch(StoreAction::SetInvulnerableSlots {
        row: front(PlayerId::ONE),
        source: CardId(7),
        columns: [0].into_iter().collect(),
    });

    assert!(store.is_slot_invulnerable(front(PlayerId::ONE), 0));
    assert!(!store.is_slot_invulnerable(front(PlayerId::TWO), 0));
    assert!(!store.is_slot_invulnerable(RowId::new(PlayerId::ONE, Lane::Back), 0));
}

#[test]
fn test_removed_source_stops_protecting() {
    let store = Store::new(GameConfig::default());
    let back = RowId::new(PlayerId::ONE, Lane::Back);
    let source = spawn(&store, front(PlayerId::ONE), 3);
    for row in [front(PlayerId::ONE), back] {
        store.dispatch(StoreAction::SetInvulnerableSlots {
            row,
            source,
            columns: [0].into_iter().collect(),
        });
    }
    store.dispatch(StoreAction::SetInvulnerableSlots {
        row: back,
        source: CardId(77),
        columns: [1].into_iter().collect(),
    });

    store.dispatch(StoreAction::RemoveCard { card: source });

    assert!(!store.is_slot_invulnerable(front(PlayerId::ONE), 0));
    assert!(!store.is_slot_invulnerable(back, 0));
    assert!(store.is_slot_invulnerable(back, 1));

    store.dispatch(StoreAction::ClearInvulnerableSource { source: CardId(77) });
    assert!(store.state().invulnerable().is_empty());
}

// =============================================================================
// Capacity
// =============================================================================

#[test]
fn test_board_row_capacity() {
    let store = Store::new(GameConfig::default().with_max_row_cards(2));
    let row = front(PlayerId::ONE);
    spawn(&store, row, 1);
    spawn(&store, row, 1);
    assert!(store.is_row_full(row));

    let extra = spawn(&store, row, 1);
    assert!(store.card(extra).is_none());
    assert_eq!(store.row(row).len(), 2);

    let hand = RowId::hand(PlayerId::ONE);
    for _ in 0..5 {
        spawn(&store, hand, 1);
    }
    assert!(!store.is_row_full(hand));
    assert_eq!(store.row(hand).len(), 5);
}

#[test]
fn test_move_into_full_row_refused() {
    let store = Store::new(GameConfig::default().with_max_row_cards(1));
    let occupant = spawn(&store, front(PlayerId::ONE), 1);
    let mover = spawn(&store, RowId::hand(PlayerId::ONE), 1);

    let state = store.dispatch(StoreAction::MoveCard {
        card: mover,
        to: front(PlayerId::ONE),
        index: None,
    });

    assert_eq!(state.row_of(mover), Some(RowId::hand(PlayerId::ONE)));
    assert_eq!(state.row_of(occupant), Some(front(PlayerId::ONE)));
}

// =============================================================================
// Turns, rounds and shuffles
// =============================================================================

#[test]
fn test_shuffle_is_deterministic() {
    let shuffled = |seed: u64| {
        let store = Store::new(GameConfig::default().with_seed(seed).with_max_row_cards(8));
        let row = front(PlayerId::TWO);
        for _ in 0..8 {
            spawn(&store, row, 1);
        }
        store.dispatch(StoreAction::ShuffleRow { row });
        store.row(row).card_ids
    };

    assert_eq!(shuffled(11), shuffled(11));
    let mut sorted: Vec<CardId> = shuffled(11).into_iter().collect();
    sorted.sort();
    assert_eq!(sorted, (1..=8).map(CardId).collect::<Vec<_>>());
}

#[test]
fn test_round_reset_keeps_plain_hand_cards() {
    let store = Store::new(GameConfig::default());
    let board = spawn(&store, front(PlayerId::ONE), 3);
    let kept = spawn(&store, RowId::hand(PlayerId::TWO), 3);
    let special = store.create_card(RowId::hand(PlayerId::TWO), None, |id| {
        Card::new(id, PlayerId::TWO, "decoy", 1).special()
    });
    store.dispatch(StoreAction::UpdateRowSynergy {
        row: front(PlayerId::ONE),
        delta: 4,
    });

    let state = store.dispatch(StoreAction::ResetRound {
        starting_player: PlayerId::TWO,
    });

    assert!(state.card(board).is_none());
    assert!(state.card(special).is_none());
    assert_eq!(state.row_of(kept), Some(RowId::hand(PlayerId::TWO)));
    assert_eq!(state.row(front(PlayerId::ONE)).synergy, 0);
    assert_eq!((state.round, state.turn_count), (2, 1));
    assert_eq!(state.active_player, PlayerId::TWO);
    assert_eq!(state.round_starter, PlayerId::TWO);
}

#[test]
fn test_state_serializes() {
    let store = Store::new(GameConfig::default());
    let card = spawn(&store, front(PlayerId::ONE), 3);
    store.dispatch(StoreAction::AppendCardEffect {
        card,
        effect: Effect::new("mark", "hunter", EffectKind::Status),
    });
    let state = store.state();

    let json = serde_json::to_string(&state).unwrap();
    let back: GameState = serde_json::from_str(&json).unwrap();

    assert_eq!(back, state);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_from_json() {
    let config = GameConfig::from_json_str(
        r#"{ "shield_cap": 5, "cheat_death": { "hero": "phoenix", "synergy_cost": 3 } }"#,
    )
    .unwrap();

    assert_eq!(config.shield_cap, 5);
    assert_eq!(config.max_row_cards, 4);
    assert_eq!(config.cheat_death.unwrap().synergy_cost, 3);
}

#[test]
fn test_config_rejects_bad_values() {
    assert!(matches!(
        GameConfig::from_json_str(r#"{ "max_row_cards": 0 }"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        GameConfig::from_json_str("not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_shield_cap_and_exception() {
    let store = Store::new(GameConfig::default().with_uncapped_shield("aegis"));
    let capped = spawn(&store, front(PlayerId::ONE), 3);
    let aegis = store.create_card(front(PlayerId::ONE), None, |id| Card::new(id, PlayerId::ONE, "aegis", 3));

    store.dispatch(StoreAction::UpdateCard {
        card: capped,
        update: CardUpdate::Shield(10),
    });
    store.dispatch(StoreAction::UpdateCard {
        card: aegis,
        update: CardUpdate::Shield(10),
    });

    assert_eq!(store.card(capped).unwrap().shield, 3);
    assert_eq!(store.card(aegis).unwrap().shield, 10);
}

#[test]
fn test_created_card_shield_is_capped() {
    let store = Store::new(GameConfig::default().with_uncapped_shield("aegis"));
    let capped = store.create_card(front(PlayerId::ONE), None, |id| {
        Card::new(id, PlayerId::ONE, "scout", 3).with_shield(7)
    });
    let aegis = store.create_card(front(PlayerId::ONE), None, |id| {
        Card::new(id, PlayerId::ONE, "aegis", 3).with_shield(7)
    });

    assert_eq!(store.card(capped).unwrap().shield, 3);
    assert_eq!(store.card(aegis).unwrap().shield, 7);
}

#[test]
fn test_created_card_health_is_floored() {
    let store = Store::new(GameConfig::default());
    let card = store.create_card(front(PlayerId::TWO), None, |id| {
        let mut card = Card::new(id, PlayerId::TWO, "scout", 3);
        card.health = -4;
        card.max_health = -1;
        card
    });

    let card = store.card(card).unwrap();
    assert_eq!((card.health, card.max_health), (0, 0));
}

#[test]
fn test_hand_cards_are_stamped_on_creation() {
    let store = Store::new(GameConfig::default());
    store.dispatch(StoreAction::AdvanceTurn { player: PlayerId::TWO });
    store.dispatch(StoreAction::AdvanceTurn { player: PlayerId::ONE });

    let held = spawn(&store, RowId::hand(PlayerId::ONE), 2);
    let fielded = spawn(&store, front(PlayerId::ONE), 2);

    assert_eq!(store.card(held).unwrap().entered_turn, Some(2));
    assert_eq!(store.card(fielded).unwrap().entered_turn, None);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_synergy_and_health_never_negative(
        deltas in proptest::collection::vec(-6i64..6, 1..20),
    ) {
        let store = Store::new(GameConfig::default());
        let row = front(PlayerId::ONE);
        let card = spawn(&store, row, 5);

        for delta in deltas {
            store.dispatch(StoreAction::UpdateRowSynergy { row, delta });
            store.dispatch(StoreAction::UpdateCard { card, update: CardUpdate::Health(delta) });
            let state = store.state();
            prop_assert!(state.row(row).synergy >= 0);
            prop_assert!(state.card(card).unwrap().health >= 0);
        }
    }
}
