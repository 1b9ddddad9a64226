//! Awaitable card and row selection.
//!
//! Each call moves through `Idle -> AwaitingInput -> Resolved | Cancelled`.
//!
//! - Human chooser: the request waits in a pending slot until a matching
//!   click arrives through [`TargetingCoordinator::submit_card_click`] /
//!   [`TargetingCoordinator::submit_row_click`]. Invalid clicks raise a
//!   toast and leave the request pending.
//! - AI chooser: the installed [`AiController`] answers instead. The
//!   request still occupies the slot, so cancellation reaches it, but clicks
//!   are ignored. Ability code awaits the same future either way.
//!
//! There is one pending slot per request kind. A new request of a kind
//! resolves the previous one of that kind to `None`. The aim line stays up
//! while a newer request is waiting.
//!
//! Cancellation: [`TargetingCoordinator::cancel_all`] and
//! [`TargetingCoordinator::context_menu`] resolve every pending request to
//! `None`. A [`CancellationToken`] passed to a call resolves only that call.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, Either, LocalBoxFuture};
use futures::{pin_mut, FutureExt};
use tracing::{debug, warn};

use super::ai::AiController;
use super::cancel::CancellationToken;
use super::request::{CardTarget, CardTargetRequest, RowTarget, RowTargetRequest};
use crate::board::RowId;
use crate::core::{CardId, GameState, Store, TargetError};
use crate::events::{AimHint, EventBus, Toast};

/// Result of feeding a click to the coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click resolved the pending request.
    Accepted,
    /// The click was invalid; the request is still pending.
    Rejected(TargetError),
    /// Nothing of this kind was pending.
    Idle,
}

/// Who answers a parked request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Chooser {
    Human,
    Ai,
}

struct Pending<R, T> {
    id: u64,
    chooser: Chooser,
    request: R,
    reply: oneshot::Sender<Option<T>>,
}

type PendingCard = Pending<CardTargetRequest, CardTarget>;
type PendingRow = Pending<RowTargetRequest, RowTarget>;

struct CoordinatorInner {
    store: Store,
    toast: EventBus<Toast>,
    aim: EventBus<AimHint>,
    ai: RefCell<Option<Rc<dyn AiController>>>,
    card: RefCell<Option<PendingCard>>,
    row: RefCell<Option<PendingRow>>,
    next_id: Cell<u64>,
}

/// Cloneable handle to the targeting state machine.
#[derive(Clone)]
pub struct TargetingCoordinator {
    inner: Rc<CoordinatorInner>,
}

impl TargetingCoordinator {
    /// Create a coordinator reading `store` and reporting through the buses.
    #[must_use]
    pub fn new(store: Store, toast: EventBus<Toast>, aim: EventBus<AimHint>) -> Self {
        Self {
            inner: Rc::new(CoordinatorInner {
                store,
                toast,
                aim,
                ai: RefCell::new(None),
                card: RefCell::new(None),
                row: RefCell::new(None),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Install the AI used when it is the AI's turn or it is triggering.
    pub fn set_ai(&self, ai: Rc<dyn AiController>) {
        *self.inner.ai.borrow_mut() = Some(ai);
    }

    /// Remove the AI. Every request then waits for clicks.
    pub fn clear_ai(&self) {
        self.inner.ai.borrow_mut().take();
    }

    /// The AI, when it should answer right now.
    #[must_use]
    pub fn active_ai(&self, state: &GameState) -> Option<Rc<dyn AiController>> {
        self.inner
            .ai
            .borrow()
            .as_ref()
            .filter(|ai| ai.is_ai_turn(state) || ai.is_ai_triggering())
            .cloned()
    }

    fn next_id(&self) -> u64 {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        id
    }

    // === Requests ===

    /// Wait for a card target. `None` on cancellation.
    pub async fn select_card(
        &self,
        request: CardTargetRequest,
        cancel: Option<&CancellationToken>,
    ) -> Option<CardTarget> {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return None;
        }
        let state = self.inner.store.state();
        let ai = self.active_ai(&state);

        let answer = ai.map(|ai| {
            let store = self.inner.store.clone();
            let req = request.clone();
            ai.select_card_target(&request, &state)
                .map(move |pick| {
                    let pick = pick?;
                    match req.validate(&store.state(), pick.card, Some(pick.row)) {
                        Ok(target) => Some(target),
                        Err(err) => {
                            warn!(card = %pick.card, %err, "AI chose an invalid card target");
                            None
                        }
                    }
                })
                .boxed_local()
        });
        let chooser = if answer.is_some() { Chooser::Ai } else { Chooser::Human };
        let source = request.source;
        let (id, reply) = self.open(&self.inner.card, request, chooser, source, "card");

        let result = self.race(Self::choice(answer, reply), cancel).await;
        self.close(&self.inner.card, id, chooser);
        result
    }

    /// Wait for a row target. `None` on cancellation.
    pub async fn select_row(
        &self,
        request: RowTargetRequest,
        cancel: Option<&CancellationToken>,
    ) -> Option<RowTarget> {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return None;
        }
        let state = self.inner.store.state();
        let ai = self.active_ai(&state);

        let answer = ai.map(|ai| {
            let store = self.inner.store.clone();
            let req = request.clone();
            ai.select_row_target(&request, &state)
                .map(move |pick| {
                    let pick = pick?;
                    let max = store.config().max_row_cards;
                    match req.validate(&store.state(), pick.row, pick.position, max) {
                        Ok(target) => Some(target),
                        Err(err) => {
                            warn!(row = %pick.row, %err, "AI chose an invalid row target");
                            None
                        }
                    }
                })
                .boxed_local()
        });
        let chooser = if answer.is_some() { Chooser::Ai } else { Chooser::Human };
        let source = request.source;
        let (id, reply) = self.open(&self.inner.row, request, chooser, source, "row");

        let result = self.race(Self::choice(answer, reply), cancel).await;
        self.close(&self.inner.row, id, chooser);
        result
    }

    /// Park a request in its slot, superseding whatever was there.
    fn open<R, T>(
        &self,
        slot: &RefCell<Option<Pending<R, T>>>,
        request: R,
        chooser: Chooser,
        source: Option<CardId>,
        kind: &'static str,
    ) -> (u64, oneshot::Receiver<Option<T>>) {
        let id = self.next_id();
        let (tx, rx) = oneshot::channel();
        let previous = slot.borrow_mut().replace(Pending {
            id,
            chooser,
            request,
            reply: tx,
        });
        if let Some(previous) = previous {
            debug!(replaced = previous.id, kind, "targeting request superseded");
            if previous.chooser == Chooser::Human && chooser == Chooser::Ai {
                self.inner.aim.publish(&AimHint::Hide);
            }
            let _ = previous.reply.send(None);
        }
        if chooser == Chooser::Human {
            if let Some(from) = source {
                self.inner.aim.publish(&AimHint::Show { from });
            }
        }
        (id, rx)
    }

    /// Release the slot if this call still owns it. The aim line is hidden
    /// unless a newer request has taken over.
    fn close<R, T>(&self, slot: &RefCell<Option<Pending<R, T>>>, id: u64, chooser: Chooser) {
        let current = slot.borrow().as_ref().map(|p| p.id);
        if current == Some(id) {
            slot.borrow_mut().take();
        }
        let superseded = current.is_some_and(|c| c != id);
        if chooser == Chooser::Human && !superseded {
            self.inner.aim.publish(&AimHint::Hide);
        }
    }

    /// The answer future. For a human the slot's reply carries the click; for
    /// the AI its pick races the reply, which then only ever carries `None`.
    fn choice<T: 'static>(
        answer: Option<LocalBoxFuture<'static, Option<T>>>,
        reply: oneshot::Receiver<Option<T>>,
    ) -> LocalBoxFuture<'static, Option<T>> {
        let reply = reply.map(|r| r.ok().flatten());
        match answer {
            None => reply.boxed_local(),
            Some(answer) => future::select(answer, reply)
                .map(|either| match either {
                    Either::Left((pick, _)) => pick,
                    Either::Right((pick, _)) => pick,
                })
                .boxed_local(),
        }
    }

    async fn race<T>(
        &self,
        choice: LocalBoxFuture<'static, Option<T>>,
        cancel: Option<&CancellationToken>,
    ) -> Option<T> {
        let Some(token) = cancel else {
            return choice.await;
        };
        let cancelled = token.cancelled();
        pin_mut!(cancelled);
        match future::select(choice, cancelled).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                debug!("targeting cancelled by token");
                None
            }
        }
    }

    // === Input ===

    /// Feed a card click. The row is inferred when `row` is `None`.
    pub fn submit_card_click(&self, card: CardId, row: Option<RowId>) -> ClickOutcome {
        let state = self.inner.store.state();
        let verdict = match self.inner.card.borrow().as_ref() {
            None => return ClickOutcome::Idle,
            Some(pending) if pending.chooser == Chooser::Ai => return ClickOutcome::Idle,
            Some(pending) => pending
                .request
                .validate(&state, card, row)
                .map_err(|err| (pending.request.player, err)),
        };

        match verdict {
            Ok(target) => {
                if let Some(pending) = self.inner.card.borrow_mut().take() {
                    let _ = pending.reply.send(Some(target));
                }
                ClickOutcome::Accepted
            }
            Err((player, err)) => {
                self.inner.toast.publish(&Toast::to(player, err.to_string()));
                ClickOutcome::Rejected(err)
            }
        }
    }

    /// Feed a row click.
    pub fn submit_row_click(&self, row: RowId, position: Option<usize>) -> ClickOutcome {
        let state = self.inner.store.state();
        let max = self.inner.store.config().max_row_cards;
        let verdict = match self.inner.row.borrow().as_ref() {
            None => return ClickOutcome::Idle,
            Some(pending) if pending.chooser == Chooser::Ai => return ClickOutcome::Idle,
            Some(pending) => pending
                .request
                .validate(&state, row, position, max)
                .map_err(|err| (pending.request.player, err)),
        };

        match verdict {
            Ok(target) => {
                if let Some(pending) = self.inner.row.borrow_mut().take() {
                    let _ = pending.reply.send(Some(target));
                }
                ClickOutcome::Accepted
            }
            Err((player, err)) => {
                self.inner.toast.publish(&Toast::to(player, err.to_string()));
                ClickOutcome::Rejected(err)
            }
        }
    }

    // === Cancellation ===

    /// Resolve every pending request to `None`, whoever is answering it.
    pub fn cancel_all(&self) {
        let card = self.inner.card.borrow_mut().take();
        let row = self.inner.row.borrow_mut().take();
        let mut any = false;
        if let Some(pending) = card {
            let _ = pending.reply.send(None);
            any = true;
        }
        if let Some(pending) = row {
            let _ = pending.reply.send(None);
            any = true;
        }
        if any {
            debug!("all pending targeting cancelled");
        }
    }

    /// Right-click / context-menu gesture. Same as [`Self::cancel_all`].
    pub fn context_menu(&self) {
        self.cancel_all();
    }

    /// Is a card request pending, for a click or the AI?
    #[must_use]
    pub fn is_awaiting_card(&self) -> bool {
        self.inner.card.borrow().is_some()
    }

    /// Is a row request pending, for a click or the AI?
    #[must_use]
    pub fn is_awaiting_row(&self) -> bool {
        self.inner.row.borrow().is_some()
    }
}

impl std::fmt::Debug for TargetingCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetingCoordinator")
            .field("awaiting_card", &self.is_awaiting_card())
            .field("awaiting_row", &self.is_awaiting_row())
            .field("ai", &self.inner.ai.borrow().is_some())
            .finish()
    }
}
