//! Shared store handle.
//!
//! `Store` owns the current [`GameState`] and replaces it wholesale on every
//! dispatch. Readers get cheap snapshots; nothing outside this file ever
//! holds a mutable reference into the state.
//!
//! Dispatches interleave in call order. A value read before an `.await`
//! may be stale afterwards, so ability code re-reads after every await.

use std::cell::RefCell;
use std::rc::Rc;

use super::action::StoreAction;
use super::config::GameConfig;
use super::entity::CardId;
use super::state::{reduce, GameState};
use crate::board::{Row, RowId};
use crate::cards::Card;

struct StoreInner {
    config: GameConfig,
    state: RefCell<GameState>,
}

/// Cloneable handle to the single source of truth.
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Store {
    /// Create a store with an empty table seeded from `config.seed`.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let state = GameState::new(config.seed);
        Self::with_state(state, config)
    }

    /// Create a store around an existing state.
    #[must_use]
    pub fn with_state(state: GameState, config: GameConfig) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                config,
                state: RefCell::new(state),
            }),
        }
    }

    /// Rules the reducer applies.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.inner.config
    }

    /// Snapshot of the current state. O(1).
    #[must_use]
    pub fn state(&self) -> GameState {
        self.inner.state.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Apply an action and return the new state.
    pub fn dispatch(&self, action: StoreAction) -> GameState {
        let next = {
            let current = self.inner.state.borrow();
            reduce(&current, action, &self.inner.config)
        };
        *self.inner.state.borrow_mut() = next.clone();
        next
    }

    /// Create a card with the next free ID.
    pub fn create_card(
        &self,
        row: RowId,
        index: Option<usize>,
        build: impl FnOnce(CardId) -> Card,
    ) -> CardId {
        let id = self.read(GameState::next_card_id);
        let card = build(id);
        let id = card.id;
        self.dispatch(StoreAction::CreateCard { card, row, index });
        id
    }

    // === Queries ===

    /// Current value of a card.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<Card> {
        self.read(|s| s.card(id).cloned())
    }

    /// Current value of a row.
    #[must_use]
    pub fn row(&self, id: RowId) -> Row {
        self.read(|s| s.row(id).clone())
    }

    /// Row a card currently sits in.
    #[must_use]
    pub fn row_of(&self, card: CardId) -> Option<RowId> {
        self.read(|s| s.row_of(card))
    }

    /// Board lane at capacity. Hands are never full.
    #[must_use]
    pub fn is_row_full(&self, row: RowId) -> bool {
        row.is_board() && self.read(|s| s.row(row).len()) >= self.inner.config.max_row_cards
    }

    /// Is a board slot protected by any source?
    #[must_use]
    pub fn is_slot_invulnerable(&self, row: RowId, column: usize) -> bool {
        self.read(|s| s.is_slot_invulnerable(row, column))
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}
