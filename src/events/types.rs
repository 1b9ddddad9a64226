//! Event payloads carried by the buses.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::board::RowId;
use crate::core::{CardId, PlayerId};

/// Damage and healing notifications for presentation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// Damage resolved against a card.
    Damaged {
        target: CardId,
        row: RowId,
        /// Damage after every modifier, before absorption and shields.
        amount: i64,
        /// Part of `amount` stopped by tokens and shields.
        absorbed: i64,
        source: Option<CardId>,
        fixed: bool,
        /// The hit took the card from positive health to zero.
        defeated: bool,
    },

    /// A card regained health.
    Healed {
        target: CardId,
        row: RowId,
        amount: i64,
    },

    /// Lethal damage was diverted into the target's ultimate.
    Intercepted { target: CardId, row: RowId },
}

/// Requests for game-flow actions the core does not own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameplayRequest {
    DrawCards { player: PlayerId, count: u32 },
    PassTurn { player: PlayerId },
    /// The core removed this card; file it in its owner's discard pile.
    Discard { card: CardId },
    /// Anything a hero module needs that has no dedicated variant.
    Custom { name: String, card: Option<CardId> },
}

/// Transient user-facing message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Player the message is for. `None` for everyone.
    pub player: Option<PlayerId>,
    pub message: String,
}

impl Toast {
    /// Message for everyone.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            player: None,
            message: message.into(),
        }
    }

    /// Message for one player.
    pub fn to(player: PlayerId, message: impl Into<String>) -> Self {
        Self {
            player: Some(player),
            message: message.into(),
        }
    }
}

/// Cursor "aim line" hint while a targeting request is pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AimHint {
    /// Draw a line from the acting card.
    Show { from: CardId },
    Hide,
}

/// Modal flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalKind {
    /// Pick one branch of an ability.
    Choice,
    /// Offer to interrupt an opponent's action.
    Interrupt,
}

type Reply = Box<dyn FnOnce(Option<usize>)>;

/// One-shot answer slot shared by every listener of a modal request.
///
/// The first call to [`ModalResponder::respond`] wins; later calls are
/// ignored.
#[derive(Clone)]
pub struct ModalResponder {
    reply: Rc<RefCell<Option<Reply>>>,
}

impl ModalResponder {
    pub(crate) fn new(reply: impl FnOnce(Option<usize>) + 'static) -> Self {
        Self {
            reply: Rc::new(RefCell::new(Some(Box::new(reply)))),
        }
    }

    /// Answer with a choice index, or `None` to decline.
    ///
    /// Returns whether this call delivered the answer.
    pub fn respond(&self, choice: Option<usize>) -> bool {
        let reply = self.reply.borrow_mut().take();
        match reply {
            Some(reply) => {
                reply(choice);
                true
            }
            None => false,
        }
    }

    /// Has an answer been delivered?
    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.reply.borrow().is_none()
    }
}

impl std::fmt::Debug for ModalResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalResponder")
            .field("answered", &self.is_answered())
            .finish()
    }
}

/// A choice the core needs someone (human UI or AI) to make.
#[derive(Clone, Debug)]
pub struct ModalRequest {
    pub kind: ModalKind,
    /// Player who decides.
    pub player: PlayerId,
    pub title: String,
    pub choices: Vec<String>,
    pub responder: ModalResponder,
}
