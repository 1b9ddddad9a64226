//! Board layout: rows, columns, shields, and invulnerable slots.
//!
//! Each player owns three board lanes (front, middle, back) and a hand.
//! Column `i` is the `i`-th card of each of a player's three lanes.

mod row;
mod slots;

pub use row::{EffectList, Lane, Row, RowId, RowShield};
pub use slots::{Columns, InvulnerableSlots};
