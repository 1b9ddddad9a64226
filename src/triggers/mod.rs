//! Hero abilities and turn-start triggers.
//!
//! - [`HeroRegistry`]: per-hero capability table, built once at startup
//! - [`AbilityContext`]: what a handler receives (bridge, targeting,
//!   modals and its own cancellation token)
//! - [`TurnScheduler`]: runs turn-start effects once per turn boundary

mod registry;
mod scheduler;

pub use registry::{
    AbilityContext, AbilityHook, AbilityResult, DeathHook, EffectHolder, HeroAbilities, HeroRegistry,
    TurnStartHook, TurnStartTrigger,
};
pub use scheduler::{TurnMark, TurnScheduler};
