//! Game state and the reducer.
//!
//! ## GameState
//!
//! The single source of truth for the table:
//! - Turn progression (turn count, active player, round)
//! - Every card instance and the row it sits in
//! - All eight rows (six board lanes, two hands)
//! - The invulnerable-slot map
//! - Per-round ultimate usage
//! - RNG
//!
//! Uses `im` persistent data structures, so cloning a state is O(1) and a
//! new state shares everything the action did not touch.
//!
//! ## Reducer
//!
//! [`reduce`] is a pure function of `(state, action)`: it clones the input,
//! applies one action, and returns the clone. Actions naming a card that
//! does not exist are no-ops.

use im::{HashMap as ImHashMap, HashSet as ImHashSet, Vector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::action::{CardEdit, CardUpdate, RowEdit, StoreAction};
use super::config::GameConfig;
use super::entity::CardId;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::board::{InvulnerableSlots, Lane, Row, RowId};
use crate::cards::{Card, HeroId};
use crate::effects::registry;

/// Complete, immutable game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    // === Turn Progression ===
    /// Turn number within the round (starts at 1).
    pub turn_count: u32,

    /// Player whose turn it is.
    pub active_player: PlayerId,

    /// Player who took the first turn of this round.
    pub round_starter: PlayerId,

    /// Round number (starts at 1).
    pub round: u32,

    // === Table ===
    cards: ImHashMap<CardId, Card>,
    locations: ImHashMap<CardId, RowId>,
    rows: PlayerMap<[Row; 4]>,
    invulnerable: InvulnerableSlots,
    ultimates_used: PlayerMap<ImHashSet<HeroId>>,

    /// Deterministic RNG.
    rng: GameRng,

    /// Next card ID to allocate.
    next_card_id: u32,
}

impl GameState {
    /// Create an empty table on turn 1 of round 1.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            turn_count: 1,
            active_player: PlayerId::ONE,
            round_starter: PlayerId::ONE,
            round: 1,
            cards: ImHashMap::new(),
            locations: ImHashMap::new(),
            rows: PlayerMap::new(|player| {
                [Lane::Front, Lane::Middle, Lane::Back, Lane::Hand]
                    .map(|lane| Row::new(RowId::new(player, lane)))
            }),
            invulnerable: InvulnerableSlots::new(),
            ultimates_used: PlayerMap::with_default(),
            rng: GameRng::new(seed),
            next_card_id: 1,
        }
    }

    // === Cards ===

    /// Look up a card.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// All cards, in no particular order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Number of cards on the table (board and hands).
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// ID the next created card should take.
    #[must_use]
    pub fn next_card_id(&self) -> CardId {
        CardId(self.next_card_id)
    }

    // === Rows ===

    /// Look up a row. Every row always exists.
    #[must_use]
    pub fn row(&self, id: RowId) -> &Row {
        &self.rows[id.player][id.lane.index()]
    }

    fn row_mut(&mut self, id: RowId) -> &mut Row {
        &mut self.rows[id.player][id.lane.index()]
    }

    /// Row a card currently sits in.
    #[must_use]
    pub fn row_of(&self, card: CardId) -> Option<RowId> {
        self.locations.get(&card).copied()
    }

    /// Row and column of a card.
    #[must_use]
    pub fn position_of(&self, card: CardId) -> Option<(RowId, usize)> {
        let row = self.row_of(card)?;
        let column = self.row(row).column_of(card)?;
        Some((row, column))
    }

    /// Cards in a row, in column order.
    pub fn cards_in_row(&self, row: RowId) -> impl Iterator<Item = &Card> {
        self.row(row).card_ids.iter().filter_map(|id| self.cards.get(id))
    }

    /// Cards in one column of a player's board, front to back.
    pub fn column(&self, player: PlayerId, column: usize) -> impl Iterator<Item = (RowId, CardId)> + '_ {
        RowId::lanes_of(player)
            .filter_map(move |row| self.row(row).card_at(column).map(|card| (row, card)))
    }

    // === Invulnerability ===

    /// The invulnerable-slot map.
    #[must_use]
    pub fn invulnerable(&self) -> &InvulnerableSlots {
        &self.invulnerable
    }

    /// Is a board slot protected by any source?
    #[must_use]
    pub fn is_slot_invulnerable(&self, row: RowId, column: usize) -> bool {
        self.invulnerable.is_invulnerable(row, column)
    }

    /// Does a card sit on a protected slot?
    #[must_use]
    pub fn is_card_invulnerable(&self, card: CardId) -> bool {
        self.position_of(card)
            .is_some_and(|(row, column)| self.is_slot_invulnerable(row, column))
    }

    // === Ultimates ===

    /// Has a player used a hero's ultimate this round?
    #[must_use]
    pub fn ultimate_used(&self, player: PlayerId, hero: &HeroId) -> bool {
        self.ultimates_used[player].contains(hero)
    }

    /// The state RNG.
    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    // === Internal edits ===

    fn edit_card(&mut self, id: CardId, f: impl FnOnce(&mut Card)) -> bool {
        match self.cards.get_mut(&id) {
            Some(card) => {
                f(card);
                true
            }
            None => {
                debug!(card = %id, "no such card, action ignored");
                false
            }
        }
    }

    fn has_room(&self, row: RowId, config: &GameConfig) -> bool {
        row.is_hand() || self.row(row).len() < config.max_row_cards
    }

    fn splice_out(&mut self, card: CardId) -> Option<RowId> {
        let row = self.locations.remove(&card)?;
        let ids = &mut self.row_mut(row).card_ids;
        if let Some(index) = ids.iter().position(|&c| c == card) {
            ids.remove(index);
        }
        Some(row)
    }

    fn splice_in(&mut self, card: CardId, row: RowId, index: Option<usize>) {
        let ids = &mut self.row_mut(row).card_ids;
        let index = index.map_or(ids.len(), |i| i.min(ids.len()));
        ids.insert(index, card);
        self.locations.insert(card, row);
    }

    fn discard(&mut self, card: CardId) {
        self.splice_out(card);
        self.cards.remove(&card);
    }
}

/// Apply one action to a state, producing a new state.
///
/// The input is never modified.
#[must_use]
pub fn reduce(state: &GameState, action: StoreAction, config: &GameConfig) -> GameState {
    let mut next = state.clone();
    debug!(action = action.name(), "dispatch");

    match action {
        StoreAction::CreateCard { mut card, row, index } => {
            if next.cards.contains_key(&card.id) {
                debug!(card = %card.id, "card already exists");
            } else if !next.has_room(row, config) {
                debug!(%row, "row full, card not created");
            } else {
                card.health = card.health.max(0);
                card.max_health = card.max_health.max(0);
                card.shield = config.clamp_shield(&card.hero, card.shield);
                if row.is_hand() && card.entered_turn.is_none() {
                    card.entered_turn = Some(next.turn_count);
                }
                let id = card.id;
                next.next_card_id = next.next_card_id.max(id.0 + 1);
                next.cards.insert(id, card);
                next.splice_in(id, row, index);
            }
        }

        StoreAction::MoveCard { card, to, index } => {
            let from = next.row_of(card);
            match from {
                None => debug!(%card, "card is not in a row"),
                Some(from) if from != to && !next.has_room(to, config) => {
                    debug!(%card, row = %to, "row full, card not moved");
                }
                Some(_) => {
                    next.splice_out(card);
                    next.splice_in(card, to, index);
                }
            }
        }

        StoreAction::RemoveCard { card } => {
            if next.cards.contains_key(&card) {
                next.discard(card);
                next.invulnerable.clear_source(card);
            } else {
                debug!(%card, "no such card to remove");
            }
        }

        StoreAction::EditCard { card, edit } => {
            next.edit_card(card, |c| match edit {
                CardEdit::Health(v) => c.health = v.max(0),
                CardEdit::MaxHealth(v) => c.max_health = v.max(0),
                CardEdit::Shield(v) => c.shield = config.clamp_shield(&c.hero, v),
                CardEdit::Power(t) => c.power = t,
                CardEdit::Synergy(t) => c.synergy = t,
                CardEdit::Played(v) => c.is_played = v,
                CardEdit::EnteredTurn(v) => c.entered_turn = v,
                CardEdit::Effects(list) => c.effects = list,
            });
        }

        StoreAction::UpdateCard { card, update } => {
            next.edit_card(card, |c| match update {
                CardUpdate::Health(d) => c.health = (c.health + d).max(0),
                CardUpdate::Shield(d) => c.shield = config.clamp_shield(&c.hero, c.shield + d),
                CardUpdate::Power(d) => c.power = c.power.offset_floored(d),
                CardUpdate::Synergy(d) => c.synergy = c.synergy.offset_floored(d),
            });
        }

        StoreAction::EditRow { row, edit } => {
            let r = next.row_mut(row);
            match edit {
                RowEdit::Synergy(v) => r.synergy = v.max(0),
                RowEdit::Shield(list) => r.shield = list,
            }
        }

        StoreAction::UpdateRowSynergy { row, delta } => {
            let r = next.row_mut(row);
            r.synergy = (r.synergy + delta).max(0);
        }

        StoreAction::AddRowShield { row, shield } => {
            next.row_mut(row).shield.push_back(shield);
        }

        StoreAction::AppendCardEffect { card, effect } => {
            next.edit_card(card, |c| registry::append(&mut c.effects, effect));
        }

        StoreAction::RemoveCardEffect { card, id } => {
            next.edit_card(card, |c| {
                registry::remove(&mut c.effects, &id);
            });
        }

        StoreAction::AppendRowEffect { row, list, effect } => {
            registry::append(next.row_mut(row).effects_mut(list), effect);
        }

        StoreAction::RemoveRowEffect { row, list, id } => {
            registry::remove(next.row_mut(row).effects_mut(list), &id);
        }

        StoreAction::SetRowEffects { row, list, effects } => {
            *next.row_mut(row).effects_mut(list) = effects;
        }

        StoreAction::SetCardEffectCapacity { card, id, remaining } => {
            next.edit_card(card, |c| {
                registry::write_back_capacity(&mut c.effects, &id, remaining);
            });
        }

        StoreAction::SetRowEffectCapacity {
            row,
            list,
            id,
            remaining,
        } => {
            registry::write_back_capacity(next.row_mut(row).effects_mut(list), &id, remaining);
        }

        StoreAction::PurgeSourceEffects { source } => {
            let holders: Vec<CardId> = next
                .cards
                .values()
                .filter(|c| c.effects.iter().any(|e| e.source_card == Some(source)))
                .map(|c| c.id)
                .collect();
            for id in holders {
                next.edit_card(id, |c| {
                    registry::purge_source(&mut c.effects, source);
                });
            }
            for row in RowId::all() {
                let r = next.row_mut(row);
                registry::purge_source(&mut r.ally_effects, source);
                registry::purge_source(&mut r.enemy_effects, source);
            }
        }

        StoreAction::SetInvulnerableSlots { row, source, columns } => {
            next.invulnerable.set(row, source, columns);
        }

        StoreAction::ClearInvulnerableSource { source } => {
            next.invulnerable.clear_source(source);
        }

        StoreAction::ClearInvulnerableSlots { row, source } => {
            next.invulnerable.clear(row, source);
        }

        StoreAction::MarkUltimateUsed { player, hero } => {
            next.ultimates_used[player].insert(hero);
        }

        StoreAction::ResetUltimates => {
            next.ultimates_used = PlayerMap::with_default();
        }

        StoreAction::AdvanceTurn { player } => {
            if player == next.active_player {
                debug!(%player, "already active, turn not advanced");
            } else {
                if player == next.round_starter {
                    next.turn_count += 1;
                }
                next.active_player = player;
            }
        }

        StoreAction::ShuffleRow { row } => {
            let mut ids: Vec<CardId> = next.row(row).card_ids.iter().copied().collect();
            next.rng.shuffle(&mut ids);
            next.row_mut(row).card_ids = ids.into_iter().collect();
        }

        StoreAction::ResetRound { starting_player } => {
            let board: Vec<CardId> = RowId::board()
                .flat_map(|row| next.row(row).card_ids.iter().copied().collect::<Vec<_>>())
                .collect();
            let expired: Vec<CardId> = PlayerId::both()
                .flat_map(|p| {
                    next.cards_in_row(RowId::hand(p))
                        .filter(|c| c.expires_end_of_round)
                        .map(|c| c.id)
                        .collect::<Vec<_>>()
                })
                .collect();
            for card in board.into_iter().chain(expired) {
                next.discard(card);
            }
            for row in RowId::all() {
                let r = next.row_mut(row);
                r.synergy = 0;
                r.shield = Vector::new();
                r.ally_effects = Vector::new();
                r.enemy_effects = Vector::new();
            }
            next.invulnerable.clear_all();
            next.ultimates_used = PlayerMap::with_default();
            next.turn_count = 1;
            next.active_player = starting_player;
            next.round_starter = starting_player;
            next.round += 1;
        }
    }

    next
}
