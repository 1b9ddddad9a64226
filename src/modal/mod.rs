//! Modal decision contract.
//!
//! Abilities that branch ask for a choice here. The core does not render
//! anything: it publishes a [`ModalRequest`] on the modal bus and continues
//! from whichever answer arrives first. When the AI is active it answers
//! synchronously instead.
//!
//! An answer outside the choice list is treated as declining. A request
//! nobody answers never calls back; the async helpers resolve to `None`
//! once every copy of the responder is dropped.

use futures::channel::oneshot;
use tracing::{debug, warn};

use crate::core::{PlayerId, Store};
use crate::events::{EventBus, ModalKind, ModalRequest, ModalResponder};
use crate::targeting::TargetingCoordinator;

/// Choice and interrupt prompts.
#[derive(Clone, Debug)]
pub struct Modals {
    bus: EventBus<ModalRequest>,
    store: Store,
    targeting: TargetingCoordinator,
}

impl Modals {
    /// Prompts go out on `bus`; AI delegation follows `targeting`'s AI.
    #[must_use]
    pub fn new(bus: EventBus<ModalRequest>, store: Store, targeting: TargetingCoordinator) -> Self {
        Self {
            bus,
            store,
            targeting,
        }
    }

    /// Ask `player` to pick one branch. `on_select` gets the index, or
    /// `None` if the player declines.
    pub fn show_choice(
        &self,
        player: PlayerId,
        title: impl Into<String>,
        choices: Vec<String>,
        on_select: impl FnOnce(Option<usize>) + 'static,
    ) {
        self.show(ModalKind::Choice, player, title.into(), choices, on_select);
    }

    /// Offer `player` an interrupt.
    pub fn show_interrupt(
        &self,
        player: PlayerId,
        title: impl Into<String>,
        choices: Vec<String>,
        on_select: impl FnOnce(Option<usize>) + 'static,
    ) {
        self.show(ModalKind::Interrupt, player, title.into(), choices, on_select);
    }

    /// Awaitable [`Self::show_choice`].
    pub async fn choose(
        &self,
        player: PlayerId,
        title: impl Into<String>,
        choices: Vec<String>,
    ) -> Option<usize> {
        let (tx, rx) = oneshot::channel();
        self.show_choice(player, title, choices, move |choice| {
            let _ = tx.send(choice);
        });
        rx.await.ok().flatten()
    }

    /// Awaitable [`Self::show_interrupt`].
    pub async fn interrupt(
        &self,
        player: PlayerId,
        title: impl Into<String>,
        choices: Vec<String>,
    ) -> Option<usize> {
        let (tx, rx) = oneshot::channel();
        self.show_interrupt(player, title, choices, move |choice| {
            let _ = tx.send(choice);
        });
        rx.await.ok().flatten()
    }

    fn show(
        &self,
        kind: ModalKind,
        player: PlayerId,
        title: String,
        choices: Vec<String>,
        on_select: impl FnOnce(Option<usize>) + 'static,
    ) {
        let len = choices.len();
        let checked = move |choice: Option<usize>| match choice {
            Some(index) if index >= len => {
                warn!(index, len, "modal answer out of range, treated as declined");
                on_select(None);
            }
            other => on_select(other),
        };

        let state = self.store.state();
        if let Some(ai) = self.targeting.active_ai(&state) {
            let choice = ai.choose_option(&title, &choices);
            debug!(?kind, %player, ?choice, "modal answered by AI");
            checked(choice);
            return;
        }

        let request = ModalRequest {
            kind,
            player,
            title,
            choices,
            responder: ModalResponder::new(checked),
        };
        if self.bus.publish(&request) == 0 {
            debug!(?kind, %player, "no modal listener");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::events::EventBus;
    use futures::executor::block_on;
    use std::cell::Cell;
    use std::rc::Rc;

    fn modals() -> Modals {
        let store = Store::new(GameConfig::default());
        let targeting =
            TargetingCoordinator::new(store.clone(), EventBus::new("toast"), EventBus::new("aim"));
        Modals::new(EventBus::new("modal"), store, targeting)
    }

    fn options() -> Vec<String> {
        vec!["heal".to_string(), "shield".to_string()]
    }

    #[test]
    fn test_listener_answers_choice() {
        let modals = modals();
        let _sub = modals.bus.subscribe(|req: &ModalRequest| {
            req.responder.respond(Some(1));
        });

        let got = Rc::new(Cell::new(None));
        let g = Rc::clone(&got);
        modals.show_choice(PlayerId::ONE, "Pick", options(), move |c| g.set(c));

        assert_eq!(got.get(), Some(1));
    }

    #[test]
    fn test_out_of_range_answer_declines() {
        let modals = modals();
        let _sub = modals.bus.subscribe(|req: &ModalRequest| {
            req.responder.respond(Some(9));
        });

        assert_eq!(block_on(modals.choose(PlayerId::ONE, "Pick", options())), None);
    }

    #[test]
    fn test_unanswered_choose_resolves_none() {
        let modals = modals();
        assert_eq!(block_on(modals.interrupt(PlayerId::TWO, "Counter?", options())), None);
    }

    #[test]
    fn test_async_choose() {
        let modals = modals();
        let _sub = modals.bus.subscribe(|req: &ModalRequest| {
            assert_eq!(req.kind, ModalKind::Choice);
            req.responder.respond(Some(0));
        });

        assert_eq!(block_on(modals.choose(PlayerId::ONE, "Pick", options())), Some(0));
    }
}
