//! Effect list invariants.
//!
//! There is no separate effect store. These helpers are the only code that
//! edits an effect list, and the reducer calls them for every effect action:
//!
//! - Append never deduplicates. Heroes that need "one token per source"
//!   call [`upsert`] instead.
//! - Removal is keyed by ID and removing a missing ID is a no-op.
//! - An absorbing token is written back with its remaining capacity after
//!   each absorption and removed once it reaches zero.
//! - Nothing here cascades. Purging effects whose source died is an explicit
//!   call made by the owning hero.

use im::Vector;

use super::{Effect, EffectId};
use crate::core::CardId;

/// Append an effect. Duplicate IDs are allowed.
pub fn append(list: &mut Vector<Effect>, effect: Effect) {
    list.push_back(effect);
}

/// Replace an effect with the same ID, or append it if absent.
///
/// Keeps the original position when replacing.
pub fn upsert(list: &mut Vector<Effect>, effect: Effect) {
    match list.iter().position(|e| e.id == effect.id) {
        Some(index) => {
            list.set(index, effect);
        }
        None => list.push_back(effect),
    }
}

/// Remove every effect with this ID. Returns whether anything was removed.
pub fn remove(list: &mut Vector<Effect>, id: &EffectId) -> bool {
    let before = list.len();
    list.retain(|e| &e.id != id);
    list.len() != before
}

/// Remove every effect created by a source card. Returns how many were removed.
pub fn purge_source(list: &mut Vector<Effect>, source: CardId) -> usize {
    let before = list.len();
    list.retain(|e| e.source_card != Some(source));
    before - list.len()
}

/// Write back an absorbing token's remaining capacity.
///
/// At zero the token is removed. Only the first effect with the ID is
/// updated. Returns whether the token still exists.
pub fn write_back_capacity(list: &mut Vector<Effect>, id: &EffectId, remaining: i64) -> bool {
    let Some(index) = list.iter().position(|e| &e.id == id) else {
        return false;
    };
    if remaining <= 0 {
        list.remove(index);
        false
    } else {
        let updated = list[index].with_capacity(remaining);
        list.set(index, updated);
        true
    }
}

/// First effect with an ID.
#[must_use]
pub fn find<'a>(list: &'a Vector<Effect>, id: &EffectId) -> Option<&'a Effect> {
    list.iter().find(|e| &e.id == id)
}
