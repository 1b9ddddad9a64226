//! Effect (token) definitions.
//!
//! An effect is a modifier record attached to a card or a row. Its `kind`
//! is a closed set: every kind the damage pipeline reacts to is a variant
//! here, so the pipeline can match on it exhaustively instead of comparing
//! free-form type strings.

use serde::{Deserialize, Serialize};

use crate::board::RowId;
use crate::cards::HeroId;
use crate::core::CardId;

/// Effect identifier, unique within the list that holds it by convention.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(String);

impl EffectId {
    /// Create an effect ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EffectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EffectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// When the scheduler should call back into the owning hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTrigger {
    /// At the start of the turn of the player whose side holds the effect.
    TurnStart,
}

/// Which allies a toggleable barrier covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarrierScope {
    /// Allies in the holder's column, on any of its side's lanes.
    Column,
    /// Allies in the holder's own row.
    Row,
}

/// Damage immunity classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImmunityKind {
    Freeze,
    Transcendence,
}

/// What an effect does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// On a row: cards in this row deal `amount` less damage (turrets exempt).
    OutgoingDamageReduction { amount: i64 },

    /// On a card: the card deals `amount` more damage.
    DamageBoost { amount: i64 },

    /// On a card or row: damage taken is increased by `amount`.
    DamageAmplification { amount: i64 },

    /// On a row: damage taken is reduced by `amount`, never below 1.
    DamageReduction { amount: i64 },

    /// On a card: a toggleable barrier that absorbs for allies in `scope`.
    Barrier {
        scope: BarrierScope,
        active: bool,
        charges: i64,
    },

    /// On a row: a pool of absorption charges shared by the whole row.
    ShieldPool { charges: i64 },

    /// On a card: personal absorption charges.
    Absorb { charges: i64 },

    /// On a card: ignores all damage.
    Immunity(ImmunityKind),

    /// Marker for a card whose ability protects slots; the protection itself
    /// lives in the invulnerable-slot map.
    Invulnerability,

    /// On a card: reflects fixed damage at opposing attackers.
    SpikeGuard,

    /// On a row (enemy list): damages each card moved into the row.
    EntryHazard { damage: i64 },

    /// On a row: changes the synergy cost of ultimates used from it.
    UltimateCostModifier { delta: i64 },

    /// Heals each turn start.
    Healing { amount: i64 },

    /// Shuffles the holding row's card order at turn start.
    Shuffle,

    /// Plain status marker or persistent hero trigger with no pipeline role.
    Status,
}

impl EffectKind {
    /// Remaining absorption capacity, for absorbing kinds.
    #[must_use]
    pub fn capacity(&self) -> Option<i64> {
        match self {
            EffectKind::Barrier { charges, .. }
            | EffectKind::ShieldPool { charges }
            | EffectKind::Absorb { charges } => Some(*charges),
            _ => None,
        }
    }

    /// Same kind with a new capacity. Non-absorbing kinds are returned unchanged.
    #[must_use]
    pub fn with_capacity(&self, remaining: i64) -> Self {
        let remaining = remaining.max(0);
        match self {
            EffectKind::Barrier { scope, active, .. } => EffectKind::Barrier {
                scope: *scope,
                active: *active,
                charges: remaining,
            },
            EffectKind::ShieldPool { .. } => EffectKind::ShieldPool { charges: remaining },
            EffectKind::Absorb { .. } => EffectKind::Absorb { charges: remaining },
            other => other.clone(),
        }
    }
}

/// A modifier record attached to a card or row.
///
/// ```
/// use hero_clash::core::CardId;
/// use hero_clash::effects::{Effect, EffectKind, EffectTrigger};
///
/// let regen = Effect::new("regen", "medic", EffectKind::Healing { amount: 1 })
///     .from_card(CardId(7))
///     .on_turn_start();
///
/// assert_eq!(regen.trigger, Some(EffectTrigger::TurnStart));
/// assert_eq!(regen.source_card, Some(CardId(7)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub id: EffectId,

    /// Hero module that owns the effect's behavior.
    pub hero: HeroId,

    pub kind: EffectKind,

    /// Card that created the effect. Non-owning; used for cleanup.
    pub source_card: Option<CardId>,

    /// Row that created the effect. Non-owning.
    pub source_row: Option<RowId>,

    /// Scheduler visibility.
    pub trigger: Option<EffectTrigger>,
}

impl Effect {
    /// Create an effect with no source and no trigger.
    pub fn new(id: impl Into<EffectId>, hero: impl Into<HeroId>, kind: EffectKind) -> Self {
        Self {
            id: id.into(),
            hero: hero.into(),
            kind,
            source_card: None,
            source_row: None,
            trigger: None,
        }
    }

    /// Record the source card (builder pattern).
    #[must_use]
    pub fn from_card(mut self, card: CardId) -> Self {
        self.source_card = Some(card);
        self
    }

    /// Record the source row (builder pattern).
    #[must_use]
    pub fn from_row(mut self, row: RowId) -> Self {
        self.source_row = Some(row);
        self
    }

    /// Make the effect visible to the turn scheduler (builder pattern).
    #[must_use]
    pub fn on_turn_start(mut self) -> Self {
        self.trigger = Some(EffectTrigger::TurnStart);
        self
    }

    /// Does the scheduler run this effect at turn start?
    #[must_use]
    pub fn runs_on_turn_start(&self) -> bool {
        self.trigger == Some(EffectTrigger::TurnStart)
    }

    /// Remaining absorption capacity.
    #[must_use]
    pub fn capacity(&self) -> Option<i64> {
        self.kind.capacity()
    }

    /// Copy with a new absorption capacity.
    #[must_use]
    pub fn with_capacity(&self, remaining: i64) -> Self {
        Self {
            kind: self.kind.with_capacity(remaining),
            ..self.clone()
        }
    }
}
