//! # hero-clash
//!
//! Resolution core for a two-player hero card game.
//!
//! ## Design Principles
//!
//! 1. **One Source of Truth**: All table state lives in a single
//!    [`GameState`] replaced whole on every dispatch. Components read
//!    snapshots and write only through actions.
//!
//! 2. **Ordered Damage**: Every hit goes through one pipeline with fixed
//!    stage order: invulnerability, immunity, cheat death, modifiers,
//!    absorption tokens, shields, health, reflection.
//!
//! 3. **Capabilities Over Conventions**: Heroes register an explicit
//!    [`HeroAbilities`] table once at startup; effects are a closed
//!    [`EffectKind`] union.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) state cloning via `im-rs`.
//!
//! - **Single-Threaded Cooperative Async**: Targeting and modal prompts
//!   are futures driven by pointer input or an [`AiController`]. No
//!   multi-threaded runtime is involved.
//!
//! - **Injected Bridge**: Hero code talks to the game through
//!   [`GameStateBridge`], which [`Game`] implements.
//!
//! ## Modules
//!
//! - `core`: players, card ids, RNG, config, actions, state and store
//! - `board`: lanes, rows, row shields and the invulnerable-slot map
//! - `cards`: hero ids, lane tables and card instances
//! - `effects`: effect tokens and list invariants
//! - `events`: typed buses for combat, gameplay, toasts, aim and modals
//! - `damage`: the damage pipeline and healing
//! - `targeting`: awaitable card and row selection
//! - `modal`: choice and interrupt prompts
//! - `triggers`: hero capability table and turn-start scheduler
//! - `game`: the assembled [`Game`]
//! - `heroes`: sample heroes

pub mod board;
pub mod bridge;
pub mod cards;
pub mod core;
pub mod damage;
pub mod effects;
pub mod events;
pub mod game;
pub mod heroes;
pub mod modal;
pub mod targeting;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{
    AbilityError, CardEdit, CardId, CardUpdate, CheatDeathRule, ConfigError, GameConfig, GameRng,
    GameState, PlayerId, PlayerMap, RowEdit, Store, StoreAction, TargetError,
};

pub use crate::board::{EffectList, Lane, Row, RowId, RowShield};

pub use crate::cards::{Card, HeroId, LaneTable, UnitKind};

pub use crate::effects::{BarrierScope, Effect, EffectId, EffectKind, EffectTrigger, ImmunityKind};

pub use crate::events::{
    AimHint, Buses, CombatEvent, EventBus, GameplayRequest, ModalKind, ModalRequest, Subscription, Toast,
};

pub use crate::damage::{DamageBus, DamageIntent, DamageOutcome, DamageSource, Resolution};

pub use crate::targeting::{
    AiController, Alignment, CancellationToken, CardTarget, CardTargetRequest, ClickOutcome, RandomAi,
    RowScope, RowTarget, RowTargetRequest, TargetingCoordinator,
};

pub use crate::modal::Modals;

pub use crate::triggers::{
    AbilityContext, AbilityResult, EffectHolder, HeroAbilities, HeroRegistry, TurnScheduler,
    TurnStartTrigger,
};

pub use crate::bridge::GameStateBridge;
pub use crate::game::Game;
