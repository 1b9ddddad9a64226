//! Event buses.
//!
//! Independent typed channels, one per concern:
//!
//! - `combat`: damage, healing and interception notifications
//! - `gameplay`: requests for game-flow actions owned elsewhere
//! - `toast`: transient user-facing messages
//! - `aim`: targeting cursor hints
//! - `modal`: choice and interrupt requests
//!
//! Components never call the presentation layer directly; they publish here.

mod bus;
mod types;

pub use bus::{EventBus, Subscription};
pub use types::{
    AimHint, CombatEvent, GameplayRequest, ModalKind, ModalRequest, ModalResponder, Toast,
};

/// The full set of buses a game uses.
#[derive(Clone, Debug)]
pub struct Buses {
    pub combat: EventBus<CombatEvent>,
    pub gameplay: EventBus<GameplayRequest>,
    pub toast: EventBus<Toast>,
    pub aim: EventBus<AimHint>,
    pub modal: EventBus<ModalRequest>,
}

impl Buses {
    /// Create a fresh set of buses with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            combat: EventBus::new("combat"),
            gameplay: EventBus::new("gameplay"),
            toast: EventBus::new("toast"),
            aim: EventBus::new("aim"),
            modal: EventBus::new("modal"),
        }
    }
}

impl Default for Buses {
    fn default() -> Self {
        Self::new()
    }
}
