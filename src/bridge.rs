//! The state bridge hero modules program against.
//!
//! Abilities and the turn scheduler never touch the store directly: they
//! receive a `GameStateBridge` and call these operations. [`crate::game::Game`]
//! is the production implementation; tests can supply their own.

use im::Vector;

use crate::board::{EffectList, Row, RowId};
use crate::cards::Card;
use crate::core::{CardId, GameState, StoreAction};
use crate::damage::{DamageIntent, DamageOutcome};
use crate::effects::{Effect, EffectId};
use crate::events::{GameplayRequest, Toast};

/// State access for hero abilities.
pub trait GameStateBridge {
    /// Snapshot of the whole table.
    fn snapshot(&self) -> GameState;

    /// Apply a raw store action.
    fn dispatch(&self, action: StoreAction);

    fn row(&self, row: RowId) -> Row;

    fn card(&self, card: CardId) -> Option<Card>;

    fn set_card_health(&self, card: CardId, health: i64);

    /// Set a card's shield. Clamped by the shield cap.
    fn dispatch_shield_update(&self, card: CardId, shield: i64);

    fn append_card_effect(&self, card: CardId, effect: Effect);

    fn remove_card_effect(&self, card: CardId, id: &EffectId);

    fn append_row_effect(&self, row: RowId, list: EffectList, effect: Effect);

    fn remove_row_effect(&self, row: RowId, list: EffectList, id: &EffectId);

    /// Replace one of a row's effect lists.
    fn set_row_effects(&self, row: RowId, list: EffectList, effects: Vector<Effect>);

    fn update_synergy(&self, row: RowId, delta: i64);

    /// Move a card, then apply the destination's entry hazards. Returns
    /// `false` if the card is missing or the row is full.
    fn move_card_to_row(&self, card: CardId, row: RowId) -> bool;

    fn is_row_full(&self, row: RowId) -> bool;

    fn max_health(&self, card: CardId) -> Option<i64>;

    fn set_invulnerable_slots(&self, row: RowId, source: CardId, columns: &[usize]);

    fn clear_invulnerable_slots(&self, row: RowId, source: CardId);

    /// Drop every slot `source` protects.
    fn clear_invulnerable_source(&self, source: CardId);

    fn is_slot_invulnerable(&self, row: RowId, column: usize) -> bool;

    /// Run the damage pipeline.
    fn deal_damage(&self, intent: DamageIntent) -> DamageOutcome;

    /// Heal up to max health. Returns the health gained.
    fn heal(&self, card: CardId, amount: i64) -> i64;

    /// Show a transient message. Ignored when nothing presents toasts.
    fn toast(&self, _toast: Toast) {}

    /// Ask the surrounding game for a flow action. Ignored by default.
    fn request(&self, _request: GameplayRequest) {}
}
