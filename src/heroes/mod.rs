//! Sample heroes.
//!
//! Each module exposes its hero id and a [`HeroAbilities`] table. Together
//! they cover the core primitives: barriers, spike guard, entry hazards,
//! turn-start healing, slot invulnerability, damage boosts, row shuffles,
//! targeting and modal choices.

pub mod bastion;
pub mod berserker;
pub mod bulwark;
pub mod medic;
pub mod sanctuary;
pub mod thorn;
pub mod trickster;

use crate::cards::HeroId;
use crate::core::CardId;
use crate::effects::EffectId;
use crate::triggers::{HeroAbilities, HeroRegistry};

/// Every sample hero.
#[must_use]
pub fn all() -> Vec<(&'static str, HeroAbilities)> {
    vec![
        (bastion::HERO, bastion::abilities()),
        (berserker::HERO, berserker::abilities()),
        (bulwark::HERO, bulwark::abilities()),
        (medic::HERO, medic::abilities()),
        (sanctuary::HERO, sanctuary::abilities()),
        (thorn::HERO, thorn::abilities()),
        (trickster::HERO, trickster::abilities()),
    ]
}

/// A registry holding every sample hero.
#[must_use]
pub fn registry() -> HeroRegistry {
    let mut registry = HeroRegistry::new();
    for (hero, abilities) in all() {
        registry.register(HeroId::new(hero), abilities);
    }
    registry
}

/// Effect id unique to one card's copy of an effect.
pub(crate) fn effect_id(name: &str, card: CardId) -> EffectId {
    EffectId::new(format!("{name}.{}", card.0))
}
