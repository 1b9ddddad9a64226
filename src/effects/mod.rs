//! Effects (tokens) attached to cards and rows.
//!
//! - `Effect`: A tagged modifier record with an owning hero and optional
//!   source back-references
//! - `EffectKind`: The closed set of behaviors the core understands
//! - `registry`: The list-level invariants (append, upsert, idempotent
//!   removal, capacity write-back, source purge)
//!
//! Effects are owned by the card or row list that holds them. The
//! `source_card` / `source_row` fields never keep anything alive.

mod effect;
pub mod registry;

pub use effect::{BarrierScope, Effect, EffectId, EffectKind, EffectTrigger, ImmunityKind};
