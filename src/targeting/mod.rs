//! Player targeting.
//!
//! - `CardTargetRequest` / `RowTargetRequest`: what may be chosen
//! - `TargetingCoordinator`: awaitable selection served by clicks or AI
//! - `CancellationToken`: per-ability cancellation
//! - `AiController`: the delegation contract, with `RandomAi` as a
//!   reference implementation

mod ai;
mod cancel;
mod coordinator;
mod request;

pub use ai::{AiController, RandomAi};
pub use cancel::CancellationToken;
pub use coordinator::{ClickOutcome, TargetingCoordinator};
pub use request::{Alignment, CardTarget, CardTargetRequest, RowScope, RowTarget, RowTargetRequest};
