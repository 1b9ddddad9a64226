//! Rows: the six board lanes and two hands.
//!
//! A row's `card_ids` order is meaningful. Index `i` in a player's front,
//! middle, and back lanes forms column `i`, which several abilities use to
//! find "the card directly behind" or "the ally in the same column".

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId};
use crate::effects::{Effect, EffectId};

/// Which lane of a player's side a row is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    Front,
    Middle,
    Back,
    Hand,
}

impl Lane {
    /// Board lanes, front to back.
    pub const BOARD: [Lane; 3] = [Lane::Front, Lane::Middle, Lane::Back];

    /// Board lanes in turn-trigger order (back first).
    pub const TRIGGER_ORDER: [Lane; 3] = [Lane::Back, Lane::Middle, Lane::Front];

    /// Slot of this lane in a player's row table.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Lane::Front => 0,
            Lane::Middle => 1,
            Lane::Back => 2,
            Lane::Hand => 3,
        }
    }

    fn code(self) -> char {
        match self {
            Lane::Front => 'f',
            Lane::Middle => 'm',
            Lane::Back => 'b',
            Lane::Hand => 'h',
        }
    }
}

/// Row identifier: a player's lane or hand.
///
/// Displays and serializes as `"1f"`, `"2m"`, `"1h"` and so on.
///
/// ```
/// use hero_clash::board::{Lane, RowId};
/// use hero_clash::core::PlayerId;
///
/// let row: RowId = "2b".parse().unwrap();
/// assert_eq!(row, RowId::new(PlayerId::TWO, Lane::Back));
/// assert_eq!(row.to_string(), "2b");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RowId {
    pub player: PlayerId,
    pub lane: Lane,
}

impl RowId {
    /// Create a row ID.
    #[must_use]
    pub const fn new(player: PlayerId, lane: Lane) -> Self {
        Self { player, lane }
    }

    /// A player's hand.
    #[must_use]
    pub const fn hand(player: PlayerId) -> Self {
        Self::new(player, Lane::Hand)
    }

    /// Is this a board lane (not a hand)?
    #[must_use]
    pub fn is_board(self) -> bool {
        self.lane != Lane::Hand
    }

    /// Is this a hand?
    #[must_use]
    pub fn is_hand(self) -> bool {
        self.lane == Lane::Hand
    }

    /// A player's three board lanes, front to back.
    pub fn lanes_of(player: PlayerId) -> impl Iterator<Item = RowId> {
        Lane::BOARD.into_iter().map(move |lane| RowId::new(player, lane))
    }

    /// All six board lanes, player one first.
    pub fn board() -> impl Iterator<Item = RowId> {
        PlayerId::both().flat_map(RowId::lanes_of)
    }

    /// All eight rows: board lanes then hands.
    pub fn all() -> impl Iterator<Item = RowId> {
        RowId::board().chain(PlayerId::both().map(RowId::hand))
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.player.index() + 1, self.lane.code())
    }
}

impl std::str::FromStr for RowId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(p), Some(l), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("malformed row id: {s:?}"));
        };
        let player = match p {
            '1' => PlayerId::ONE,
            '2' => PlayerId::TWO,
            _ => return Err(format!("unknown player in row id: {s:?}")),
        };
        let lane = match l {
            'f' => Lane::Front,
            'm' => Lane::Middle,
            'b' => Lane::Back,
            'h' => Lane::Hand,
            _ => return Err(format!("unknown lane in row id: {s:?}")),
        };
        Ok(RowId::new(player, lane))
    }
}

impl From<RowId> for String {
    fn from(id: RowId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for RowId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Which of a row's two effect lists.
///
/// Ally effects were placed by the row's owner, enemy effects by the
/// opponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectList {
    Ally,
    Enemy,
}

/// One shield contribution to a row's shield pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowShield {
    pub id: EffectId,
    pub source: Option<CardId>,
    pub value: i64,
}

impl RowShield {
    /// Create a shield contribution.
    #[must_use]
    pub fn new(id: impl Into<EffectId>, value: i64) -> Self {
        Self {
            id: id.into(),
            source: None,
            value: value.max(0),
        }
    }

    /// Record the card that raised this shield (builder pattern).
    #[must_use]
    pub fn from_card(mut self, source: CardId) -> Self {
        self.source = Some(source);
        self
    }
}

/// A board lane or hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,

    /// Cards in column order.
    pub card_ids: Vector<CardId>,

    /// Synergy pool, never negative.
    pub synergy: i64,

    /// Shield contributions, consumed front to back.
    pub shield: Vector<RowShield>,

    pub ally_effects: Vector<Effect>,
    pub enemy_effects: Vector<Effect>,
}

impl Row {
    /// Create an empty row.
    #[must_use]
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            card_ids: Vector::new(),
            synergy: 0,
            shield: Vector::new(),
            ally_effects: Vector::new(),
            enemy_effects: Vector::new(),
        }
    }

    /// Column index of a card in this row.
    #[must_use]
    pub fn column_of(&self, card: CardId) -> Option<usize> {
        self.card_ids.iter().position(|&c| c == card)
    }

    /// Card at a column.
    #[must_use]
    pub fn card_at(&self, column: usize) -> Option<CardId> {
        self.card_ids.get(column).copied()
    }

    /// Does the row hold this card?
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.column_of(card).is_some()
    }

    /// Number of cards in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    /// Row has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }

    /// One of the two effect lists.
    #[must_use]
    pub fn effects(&self, list: EffectList) -> &Vector<Effect> {
        match list {
            EffectList::Ally => &self.ally_effects,
            EffectList::Enemy => &self.enemy_effects,
        }
    }

    /// Mutable access to one of the two effect lists.
    pub fn effects_mut(&mut self, list: EffectList) -> &mut Vector<Effect> {
        match list {
            EffectList::Ally => &mut self.ally_effects,
            EffectList::Enemy => &mut self.enemy_effects,
        }
    }

    /// Both effect lists, ally first.
    pub fn all_effects(&self) -> impl Iterator<Item = &Effect> {
        self.ally_effects.iter().chain(self.enemy_effects.iter())
    }

    /// Find an effect in a list by ID.
    #[must_use]
    pub fn effect(&self, list: EffectList, id: &EffectId) -> Option<&Effect> {
        self.effects(list).iter().find(|e| &e.id == id)
    }

    /// Sum of all shield contributions.
    #[must_use]
    pub fn total_shield(&self) -> i64 {
        self.shield.iter().map(|s| s.value).sum()
    }
}
