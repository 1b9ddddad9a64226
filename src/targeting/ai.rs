//! AI delegation.
//!
//! When an AI controls the choosing player, the coordinator asks the
//! installed [`AiController`] instead of waiting for pointer input. The
//! controller may answer immediately (a ready future) or later.

use std::cell::{Cell, RefCell};

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;

use super::request::{CardTarget, CardTargetRequest, RowTarget, RowTargetRequest};
use crate::core::{GameRng, GameState, PlayerId};

/// An automated chooser.
pub trait AiController {
    /// Is it the AI's turn?
    fn is_ai_turn(&self, state: &GameState) -> bool;

    /// Is the AI resolving a triggered ability outside its own turn?
    fn is_ai_triggering(&self) -> bool {
        false
    }

    /// Pick a card target.
    fn select_card_target(
        &self,
        request: &CardTargetRequest,
        state: &GameState,
    ) -> LocalBoxFuture<'static, Option<CardTarget>>;

    /// Pick a row target.
    fn select_row_target(
        &self,
        request: &RowTargetRequest,
        state: &GameState,
    ) -> LocalBoxFuture<'static, Option<RowTarget>>;

    /// Answer a modal choice. Defaults to the first option.
    fn choose_option(&self, _title: &str, choices: &[String]) -> Option<usize> {
        (!choices.is_empty()).then_some(0)
    }
}

/// Reference AI that picks uniformly among valid targets.
#[derive(Debug)]
pub struct RandomAi {
    player: PlayerId,
    max_row_cards: usize,
    rng: RefCell<GameRng>,
    triggering: Cell<bool>,
}

impl RandomAi {
    /// Control `player`.
    #[must_use]
    pub fn new(player: PlayerId, max_row_cards: usize, seed: u64) -> Self {
        Self {
            player,
            max_row_cards,
            rng: RefCell::new(GameRng::new(seed)),
            triggering: Cell::new(false),
        }
    }

    /// The controlled player.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Flag that the AI is resolving a trigger on the opponent's turn.
    pub fn set_triggering(&self, triggering: bool) {
        self.triggering.set(triggering);
    }
}

impl AiController for RandomAi {
    fn is_ai_turn(&self, state: &GameState) -> bool {
        state.active_player == self.player
    }

    fn is_ai_triggering(&self) -> bool {
        self.triggering.get()
    }

    fn select_card_target(
        &self,
        request: &CardTargetRequest,
        state: &GameState,
    ) -> LocalBoxFuture<'static, Option<CardTarget>> {
        let candidates = request.candidates(state);
        let pick = self.rng.borrow_mut().choose(&candidates).copied();
        future::ready(pick).boxed_local()
    }

    fn select_row_target(
        &self,
        request: &RowTargetRequest,
        state: &GameState,
    ) -> LocalBoxFuture<'static, Option<RowTarget>> {
        let candidates = request.candidates(state, self.max_row_cards);
        let pick = self.rng.borrow_mut().choose(&candidates).copied();
        future::ready(pick).boxed_local()
    }

    fn choose_option(&self, _title: &str, choices: &[String]) -> Option<usize> {
        if choices.is_empty() {
            None
        } else {
            Some(self.rng.borrow_mut().gen_range_usize(0..choices.len()))
        }
    }
}
