//! Damage inputs and outputs.

use serde::{Deserialize, Serialize};

use crate::board::RowId;
use crate::core::CardId;

/// Where damage comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    /// A card's ability or attack.
    Card(CardId),
    /// A row token such as an entry hazard.
    Row(RowId),
    /// A spike guard striking back. Names the guard's holder. Never
    /// reflected again.
    Reflection(CardId),
    /// Anything else.
    Environment,
}

impl DamageSource {
    /// The attacking card, for attacker-side modifiers and reflection.
    #[must_use]
    pub fn card(self) -> Option<CardId> {
        match self {
            DamageSource::Card(card) => Some(card),
            _ => None,
        }
    }

    /// Card credited in the published event.
    #[must_use]
    pub fn credited_card(self) -> Option<CardId> {
        match self {
            DamageSource::Card(card) | DamageSource::Reflection(card) => Some(card),
            _ => None,
        }
    }
}

/// A raw request to damage one card.
///
/// ```
/// use hero_clash::core::CardId;
/// use hero_clash::damage::DamageIntent;
///
/// let hit = DamageIntent::new(CardId(4), 3).from_card(CardId(1)).fixed();
/// assert!(hit.fixed);
/// assert!(!hit.ignore_shields);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageIntent {
    pub target: CardId,

    /// Row the caller believes the target is in. The store's current
    /// location wins when they disagree.
    pub row: Option<RowId>,

    pub amount: i64,

    /// Skip row shields, card shields and absorption tokens.
    pub ignore_shields: bool,

    pub source: DamageSource,

    /// Skip every amplify and reduce modifier.
    pub fixed: bool,
}

impl DamageIntent {
    /// Environmental, shield-respecting, modifiable damage.
    #[must_use]
    pub fn new(target: CardId, amount: i64) -> Self {
        Self {
            target,
            row: None,
            amount,
            ignore_shields: false,
            source: DamageSource::Environment,
            fixed: false,
        }
    }

    /// Record the row the caller saw the target in (builder pattern).
    #[must_use]
    pub fn in_row(mut self, row: RowId) -> Self {
        self.row = Some(row);
        self
    }

    /// Attribute to an attacking card (builder pattern).
    #[must_use]
    pub fn from_card(mut self, card: CardId) -> Self {
        self.source = DamageSource::Card(card);
        self
    }

    /// Attribute to a row token (builder pattern).
    #[must_use]
    pub fn from_row(mut self, row: RowId) -> Self {
        self.source = DamageSource::Row(row);
        self
    }

    /// Set an explicit source (builder pattern).
    #[must_use]
    pub fn with_source(mut self, source: DamageSource) -> Self {
        self.source = source;
        self
    }

    /// Bypass shields (builder pattern).
    #[must_use]
    pub fn ignore_shields(mut self) -> Self {
        self.ignore_shields = true;
        self
    }

    /// Mark as fixed damage (builder pattern).
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }
}

/// How a damage intent ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Committed to shields and health.
    Applied,
    /// Target does not exist.
    MissingTarget,
    /// Target's slot is protected.
    Invulnerable,
    /// Target carries an immunity.
    Immune,
    /// Diverted into the target's cheat-death ultimate.
    Intercepted,
}

/// What a damage intent did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub resolution: Resolution,

    /// Damage after modifiers.
    pub amount: i64,

    /// Stopped by absorption tokens.
    pub absorbed_by_tokens: i64,

    /// Stopped by row shields.
    pub absorbed_by_row_shield: i64,

    /// Stopped by the card's own shield.
    pub absorbed_by_card_shield: i64,

    pub health_lost: i64,

    /// Cards taken from positive health to zero, including by reflection.
    pub defeated: Vec<CardId>,

    /// Outcome of the deferred spike guard reflection, if one ran.
    pub reflection: Option<Box<DamageOutcome>>,
}

impl DamageOutcome {
    pub(crate) fn short_circuit(resolution: Resolution) -> Self {
        Self {
            resolution,
            amount: 0,
            absorbed_by_tokens: 0,
            absorbed_by_row_shield: 0,
            absorbed_by_card_shield: 0,
            health_lost: 0,
            defeated: Vec::new(),
            reflection: None,
        }
    }

    /// Total damage that did not reach health.
    #[must_use]
    pub fn absorbed(&self) -> i64 {
        self.absorbed_by_tokens + self.absorbed_by_row_shield + self.absorbed_by_card_shield
    }

    /// Did the damage reach the commit stage?
    #[must_use]
    pub fn applied(&self) -> bool {
        self.resolution == Resolution::Applied
    }
}
