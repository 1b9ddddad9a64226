//! Static card data: hero identity, unit kind, per-lane stat tables.

use serde::{Deserialize, Serialize};

use crate::board::Lane;

/// Hero identifier.
///
/// Hero modules register under this key and effects record which hero
/// created them, so the turn scheduler can route a trigger back to its
/// owner.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeroId(String);

impl HeroId {
    /// Create a hero ID.
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

impl From<&str> for HeroId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for HeroId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for HeroId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of unit a card is.
///
/// Turrets are spawned by a hero, deal damage on their own, and are exempt
/// from attacker-row damage reduction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    #[default]
    Hero,
    Turret,
}

/// A stat that depends on which board lane the card sits in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneTable {
    pub front: i64,
    pub middle: i64,
    pub back: i64,
}

impl LaneTable {
    /// Same value in every lane.
    #[must_use]
    pub const fn flat(value: i64) -> Self {
        Self {
            front: value,
            middle: value,
            back: value,
        }
    }

    /// Explicit per-lane values.
    #[must_use]
    pub const fn new(front: i64, middle: i64, back: i64) -> Self {
        Self { front, middle, back }
    }

    /// Value for a lane. Hands have no stat and return 0.
    #[must_use]
    pub fn get(&self, lane: Lane) -> i64 {
        match lane {
            Lane::Front => self.front,
            Lane::Middle => self.middle,
            Lane::Back => self.back,
            Lane::Hand => 0,
        }
    }

    /// Add `delta` to every lane, flooring each at zero.
    #[must_use]
    pub fn offset_floored(&self, delta: i64) -> Self {
        Self {
            front: (self.front + delta).max(0),
            middle: (self.middle + delta).max(0),
            back: (self.back + delta).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_id() {
        let id = HeroId::from("sentinel");
        assert_eq!(id.as_str(), "sentinel");
        assert_eq!(id.to_string(), "sentinel");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sentinel\"");
    }

    #[test]
    fn test_lane_table_lookup() {
        let table = LaneTable::new(3, 2, 1);
        assert_eq!(table.get(Lane::Front), 3);
        assert_eq!(table.get(Lane::Back), 1);
        assert_eq!(table.get(Lane::Hand), 0);
    }

    #[test]
    fn test_offset_floors_at_zero() {
        let table = LaneTable::new(3, 1, 0).offset_floored(-2);
        assert_eq!(table, LaneTable::new(1, 0, 0));
    }
}
