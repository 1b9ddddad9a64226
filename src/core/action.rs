//! Store actions.
//!
//! Every write to the game state is one of these named actions. The reducer
//! in [`super::state`] turns `(state, action)` into a new state and never
//! touches the old one.
//!
//! Two flavors of field write exist:
//! - *edit* sets an absolute value (`CardEdit`, `RowEdit`)
//! - *update* applies a delta with floor-at-zero clamping (`CardUpdate`,
//!   `StoreAction::UpdateRowSynergy`)

use im::Vector;
use serde::{Deserialize, Serialize};

use super::entity::CardId;
use super::player::PlayerId;
use crate::board::{Columns, EffectList, RowId, RowShield};
use crate::cards::{Card, HeroId, LaneTable};
use crate::effects::{Effect, EffectId};

/// Absolute card field write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEdit {
    /// Set health, floored at zero.
    Health(i64),
    /// Set the heal ceiling.
    MaxHealth(i64),
    /// Set the card shield, floored at zero and capped per config.
    Shield(i64),
    Power(LaneTable),
    Synergy(LaneTable),
    Played(bool),
    EnteredTurn(Option<u32>),
    /// Replace the whole effect list.
    Effects(Vector<Effect>),
}

/// Delta card field write. Results are floored at zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardUpdate {
    Health(i64),
    /// Shield delta, also capped per config.
    Shield(i64),
    /// Shifts every lane of the power table.
    Power(i64),
    /// Shifts every lane of the synergy table.
    Synergy(i64),
}

/// Absolute row field write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowEdit {
    /// Set synergy, floored at zero.
    Synergy(i64),
    /// Replace the shield contribution list.
    Shield(Vector<RowShield>),
}

/// A named state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreAction {
    /// Add a new card to a row at `index` (end of row if `None`).
    CreateCard {
        card: Card,
        row: RowId,
        index: Option<usize>,
    },

    /// Move a card, splicing it out of its row and into `to` at `index`.
    MoveCard {
        card: CardId,
        to: RowId,
        index: Option<usize>,
    },

    /// Discard a card: removed from its row and from the card table.
    RemoveCard { card: CardId },

    EditCard { card: CardId, edit: CardEdit },
    UpdateCard { card: CardId, update: CardUpdate },
    EditRow { row: RowId, edit: RowEdit },
    UpdateRowSynergy { row: RowId, delta: i64 },

    /// Append shield contributions to a row's shield list.
    AddRowShield { row: RowId, shield: RowShield },

    AppendCardEffect { card: CardId, effect: Effect },
    RemoveCardEffect { card: CardId, id: EffectId },
    AppendRowEffect { row: RowId, list: EffectList, effect: Effect },
    RemoveRowEffect { row: RowId, list: EffectList, id: EffectId },

    /// Replace one of a row's effect lists wholesale.
    SetRowEffects {
        row: RowId,
        list: EffectList,
        effects: Vector<Effect>,
    },

    /// Write back an absorbing token's remaining capacity on a card.
    SetCardEffectCapacity {
        card: CardId,
        id: EffectId,
        remaining: i64,
    },

    /// Write back an absorbing token's remaining capacity on a row.
    SetRowEffectCapacity {
        row: RowId,
        list: EffectList,
        id: EffectId,
        remaining: i64,
    },

    /// Remove every effect whose source is this card, from all cards and rows.
    PurgeSourceEffects { source: CardId },

    SetInvulnerableSlots {
        row: RowId,
        source: CardId,
        columns: Columns,
    },
    ClearInvulnerableSlots { row: RowId, source: CardId },
    /// Drop everything `source` protects, in every row.
    ClearInvulnerableSource { source: CardId },

    MarkUltimateUsed { player: PlayerId, hero: HeroId },
    ResetUltimates,

    /// Hand control to `player`. The turn count increases when control
    /// returns to the player who started the round.
    AdvanceTurn { player: PlayerId },

    /// Shuffle a row's card order with the state RNG.
    ShuffleRow { row: RowId },

    /// Discard everything and start a new round with `starting_player`.
    ResetRound { starting_player: PlayerId },
}

impl StoreAction {
    /// Short action name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            StoreAction::CreateCard { .. } => "create_card",
            StoreAction::MoveCard { .. } => "move_card",
            StoreAction::RemoveCard { .. } => "remove_card",
            StoreAction::EditCard { .. } => "edit_card",
            StoreAction::UpdateCard { .. } => "update_card",
            StoreAction::EditRow { .. } => "edit_row",
            StoreAction::UpdateRowSynergy { .. } => "update_row_synergy",
            StoreAction::AddRowShield { .. } => "add_row_shield",
            StoreAction::AppendCardEffect { .. } => "append_card_effect",
            StoreAction::RemoveCardEffect { .. } => "remove_card_effect",
            StoreAction::AppendRowEffect { .. } => "append_row_effect",
            StoreAction::RemoveRowEffect { .. } => "remove_row_effect",
            StoreAction::SetRowEffects { .. } => "set_row_effects",
            StoreAction::SetCardEffectCapacity { .. } => "set_card_effect_capacity",
            StoreAction::SetRowEffectCapacity { .. } => "set_row_effect_capacity",
            StoreAction::PurgeSourceEffects { .. } => "purge_source_effects",
            StoreAction::SetInvulnerableSlots { .. } => "set_invulnerable_slots",
            StoreAction::ClearInvulnerableSlots { .. } => "clear_invulnerable_slots",
            StoreAction::ClearInvulnerableSource { .. } => "clear_invulnerable_source",
            StoreAction::MarkUltimateUsed { .. } => "mark_ultimate_used",
            StoreAction::ResetUltimates => "reset_ultimates",
            StoreAction::AdvanceTurn { .. } => "advance_turn",
            StoreAction::ShuffleRow { .. } => "shuffle_row",
            StoreAction::ResetRound { .. } => "reset_round",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Lane;

    #[test]
    fn test_action_names() {
        let action = StoreAction::UpdateRowSynergy {
            row: RowId::new(PlayerId::ONE, Lane::Front),
            delta: 2,
        };
        assert_eq!(action.name(), "update_row_synergy");
        assert_eq!(StoreAction::ResetUltimates.name(), "reset_ultimates");
    }

    #[test]
    fn test_action_serialization() {
        let action = StoreAction::MoveCard {
            card: CardId(3),
            to: RowId::new(PlayerId::TWO, Lane::Back),
            index: Some(0),
        };
        let json = serde_json::to_string(&action).unwrap();
        let back: StoreAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
