//! Card instances - runtime card state.
//!
//! A `Card` is the single mutable record for one card on the table. It is
//! never mutated in place by game code: reducers clone it, change it, and
//! store the new value in a new `GameState`.
//!
//! A card at `health <= 0` is defeated but stays where it is until
//! something removes it, so column-based targeting and death triggers keep
//! seeing it.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::definition::{HeroId, LaneTable, UnitKind};
use crate::core::{CardId, PlayerId};
use crate::effects::{Effect, EffectId};

/// A card in play, in hand, or spawned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique instance ID.
    pub id: CardId,

    /// Owning player.
    pub owner: PlayerId,

    /// Which hero module drives this card.
    pub hero: HeroId,

    /// Hero or turret.
    pub kind: UnitKind,

    /// Current health, never negative.
    pub health: i64,

    /// Health ceiling for heals.
    pub max_health: i64,

    /// Personal shield, never negative and capped per config.
    pub shield: i64,

    /// Power by lane.
    pub power: LaneTable,

    /// Synergy contributed to the row on deploy, by lane.
    pub synergy: LaneTable,

    /// Has the card been deployed this round?
    pub is_played: bool,

    /// Turn the card arrived in its current zone.
    pub entered_turn: Option<u32>,

    /// Special round-scoped card that expires from hand if never played.
    pub expires_end_of_round: bool,

    /// Effects attached to this card.
    #[serde(default)]
    pub effects: Vector<Effect>,
}

impl Card {
    /// Create a hero card at full health.
    #[must_use]
    pub fn new(id: CardId, owner: PlayerId, hero: impl Into<HeroId>, health: i64) -> Self {
        Self {
            id,
            owner,
            hero: hero.into(),
            kind: UnitKind::Hero,
            health: health.max(0),
            max_health: health.max(0),
            shield: 0,
            power: LaneTable::default(),
            synergy: LaneTable::default(),
            is_played: false,
            entered_turn: None,
            expires_end_of_round: false,
            effects: Vector::new(),
        }
    }

    /// Set per-lane power (builder pattern).
    #[must_use]
    pub fn with_power(mut self, power: LaneTable) -> Self {
        self.power = power;
        self
    }

    /// Set per-lane synergy (builder pattern).
    #[must_use]
    pub fn with_synergy(mut self, synergy: LaneTable) -> Self {
        self.synergy = synergy;
        self
    }

    /// Set the starting shield (builder pattern). Not capped here.
    #[must_use]
    pub fn with_shield(mut self, shield: i64) -> Self {
        self.shield = shield.max(0);
        self
    }

    /// Mark as a turret (builder pattern).
    #[must_use]
    pub fn turret(mut self) -> Self {
        self.kind = UnitKind::Turret;
        self
    }

    /// Mark as a round-scoped special card (builder pattern).
    #[must_use]
    pub fn special(mut self) -> Self {
        self.expires_end_of_round = true;
        self
    }

    /// Attach an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push_back(effect);
        self
    }

    /// Health at or below zero.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Is this card a turret?
    #[must_use]
    pub fn is_turret(&self) -> bool {
        self.kind == UnitKind::Turret
    }

    /// Find an attached effect by ID.
    #[must_use]
    pub fn effect(&self, id: &EffectId) -> Option<&Effect> {
        self.effects.iter().find(|e| &e.id == id)
    }

    /// Check whether an effect ID is attached.
    #[must_use]
    pub fn has_effect(&self, id: &EffectId) -> bool {
        self.effect(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;

    fn sample() -> Card {
        Card::new(CardId(10), PlayerId::ONE, "sentinel", 4)
    }

    #[test]
    fn test_card_new() {
        let card = sample();

        assert_eq!(card.health, 4);
        assert_eq!(card.max_health, 4);
        assert_eq!(card.shield, 0);
        assert!(!card.is_played);
        assert!(!card.is_turret());
        assert!(!card.is_defeated());
    }

    #[test]
    fn test_negative_health_floored() {
        let card = Card::new(CardId(1), PlayerId::TWO, "ghost", -3);
        assert_eq!(card.health, 0);
        assert!(card.is_defeated());
    }

    #[test]
    fn test_builders() {
        let card = sample()
            .with_power(LaneTable::new(3, 2, 1))
            .with_synergy(LaneTable::flat(1))
            .with_shield(2)
            .turret()
            .special();

        assert_eq!(card.power.front, 3);
        assert_eq!(card.synergy.back, 1);
        assert_eq!(card.shield, 2);
        assert!(card.is_turret());
        assert!(card.expires_end_of_round);
    }

    #[test]
    fn test_effect_lookup() {
        let effect = Effect::new("guard", "sentinel", EffectKind::SpikeGuard);
        let card = sample().with_effect(effect);

        assert!(card.has_effect(&EffectId::new("guard")));
        assert!(!card.has_effect(&EffectId::new("other")));
    }

    #[test]
    fn test_card_serialization() {
        let card = sample().with_effect(Effect::new("guard", "sentinel", EffectKind::SpikeGuard));

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }
}
