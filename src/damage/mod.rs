//! Damage and healing.
//!
//! [`DamageBus`] is both the combat notification channel and the only way
//! to damage a card: [`DamageBus::deal_damage`] runs the ordered pipeline in
//! [`pipeline`] and publishes the resulting [`CombatEvent`].

mod intent;
mod pipeline;

pub use intent::{DamageIntent, DamageOutcome, DamageSource, Resolution};

use tracing::debug;

use crate::core::{CardEdit, CardId, Store, StoreAction};
use crate::events::{CombatEvent, EventBus, Subscription};

/// Combat channel plus the damage and heal entry points.
#[derive(Clone, Debug)]
pub struct DamageBus {
    store: Store,
    events: EventBus<CombatEvent>,
}

impl DamageBus {
    /// Bind a combat channel to a store.
    #[must_use]
    pub fn new(store: Store, events: EventBus<CombatEvent>) -> Self {
        Self { store, events }
    }

    /// Listen to combat events.
    pub fn subscribe(&self, listener: impl Fn(&CombatEvent) + 'static) -> Subscription {
        self.events.subscribe(listener)
    }

    /// Publish a combat event without resolving anything.
    pub fn publish(&self, event: &CombatEvent) -> usize {
        self.events.publish(event)
    }

    /// The underlying channel.
    #[must_use]
    pub fn events(&self) -> &EventBus<CombatEvent> {
        &self.events
    }

    /// Resolve a damage intent through every pipeline stage.
    pub fn deal_damage(&self, intent: DamageIntent) -> DamageOutcome {
        pipeline::resolve(&self.store, &self.events, intent)
    }

    /// Restore health up to the card's maximum.
    ///
    /// Defeated and missing cards are not healed. Returns the health gained.
    pub fn heal(&self, target: CardId, amount: i64) -> i64 {
        let state = self.store.state();
        let (Some(card), Some(row)) = (state.card(target), state.row_of(target)) else {
            debug!(%target, "heal target does not exist");
            return 0;
        };
        if card.is_defeated() || amount <= 0 {
            return 0;
        }

        let healed = (card.health + amount).min(card.max_health);
        let gained = (healed - card.health).max(0);
        if gained > 0 {
            self.store.dispatch(StoreAction::EditCard {
                card: target,
                edit: CardEdit::Health(healed),
            });
            self.events.publish(&CombatEvent::Healed {
                target,
                row,
                amount: gained,
            });
        }
        gained
    }
}
