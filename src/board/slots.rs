//! Invulnerable board slots.
//!
//! `row -> source card -> protected columns`. Several sources can protect
//! the same row at once; each source's columns are stored separately so
//! clearing one source never lifts another's protection.

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::RowId;
use crate::core::CardId;

/// Protected columns contributed by one source.
pub type Columns = SmallVec<[usize; 4]>;

/// Additive invulnerability map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvulnerableSlots {
    rows: ImHashMap<RowId, ImHashMap<CardId, Columns>>,
}

impl InvulnerableSlots {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one source's protected columns in a row.
    ///
    /// Other sources in the same row are untouched. An empty column list
    /// clears the source.
    pub fn set(&mut self, row: RowId, source: CardId, columns: impl IntoIterator<Item = usize>) {
        let mut columns: Columns = columns.into_iter().collect();
        columns.sort_unstable();
        columns.dedup();

        if columns.is_empty() {
            self.clear(row, source);
            return;
        }
        self.rows
            .entry(row)
            .or_insert_with(ImHashMap::new)
            .insert(source, columns);
    }

    /// Remove one source's protection from a row.
    pub fn clear(&mut self, row: RowId, source: CardId) {
        let now_empty = match self.rows.get_mut(&row) {
            Some(sources) => {
                sources.remove(&source);
                sources.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.rows.remove(&row);
        }
    }

    /// Remove one source's protection from every row.
    pub fn clear_source(&mut self, source: CardId) {
        let rows: Vec<RowId> = self.rows.keys().copied().collect();
        for row in rows {
            self.clear(row, source);
        }
    }

    /// Remove all protection.
    pub fn clear_all(&mut self) {
        self.rows.clear();
    }

    /// Is a column protected by any source?
    #[must_use]
    pub fn is_invulnerable(&self, row: RowId, column: usize) -> bool {
        self.rows
            .get(&row)
            .is_some_and(|sources| sources.values().any(|cols| cols.contains(&column)))
    }

    /// Columns one source protects in a row.
    #[must_use]
    pub fn columns_for(&self, row: RowId, source: CardId) -> Option<&Columns> {
        self.rows.get(&row).and_then(|sources| sources.get(&source))
    }

    /// Does anything protect anything?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
