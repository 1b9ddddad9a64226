//! Core types: identities, players, state, actions, the store, RNG,
//! configuration and errors.
//!
//! Everything that writes game state goes through [`Store::dispatch`] with a
//! [`StoreAction`]; everything that reads it goes through the query
//! accessors on [`GameState`] or [`Store`].

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;
pub mod store;

pub use action::{CardEdit, CardUpdate, RowEdit, StoreAction};
pub use config::{CheatDeathRule, GameConfig};
pub use entity::CardId;
pub use error::{AbilityError, ConfigError, TargetError};
pub use player::{InvalidPlayer, PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
pub use state::{reduce, GameState};
pub use store::Store;
