//! Card system: hero identity, unit kinds, lane tables, and runtime cards.
//!
//! ## Key Types
//!
//! - `HeroId`: Which hero module drives a card
//! - `UnitKind`: Hero or turret
//! - `LaneTable`: A stat that depends on the lane the card occupies
//! - `Card`: Runtime card state (health, shield, power, synergy, effects)

pub mod definition;
pub mod instance;

pub use definition::{HeroId, LaneTable, UnitKind};
pub use instance::Card;
