//! Bulwark: column barrier.
//!
//! Enters with an active barrier that soaks damage aimed at any ally in its
//! column. The ultimate toggles the barrier and tops it back up.

use crate::core::{CardEdit, CardId, StoreAction};
use crate::effects::{registry, BarrierScope, Effect, EffectKind};
use crate::triggers::{AbilityContext, AbilityResult, HeroAbilities};

use super::effect_id;

pub const HERO: &str = "bulwark";

pub const BARRIER_CHARGES: i64 = 3;

#[must_use]
pub fn abilities() -> HeroAbilities {
    HeroAbilities::new().on_enter(enter).on_ultimate(2, toggle)
}

fn barrier(card: CardId, active: bool) -> Effect {
    Effect::new(
        effect_id("bulwark.barrier", card),
        HERO,
        EffectKind::Barrier {
            scope: BarrierScope::Column,
            active,
            charges: BARRIER_CHARGES,
        },
    )
    .from_card(card)
}

async fn enter(ctx: AbilityContext, card: CardId) -> AbilityResult {
    ctx.bridge.append_card_effect(card, barrier(card, true));
    Ok(())
}

async fn toggle(ctx: AbilityContext, card: CardId) -> AbilityResult {
    let me = ctx.require_card(card)?;
    let active = match me.effect(&effect_id("bulwark.barrier", card)).map(|e| &e.kind) {
        Some(EffectKind::Barrier { active, .. }) => !*active,
        _ => true,
    };

    let mut effects = me.effects;
    registry::upsert(&mut effects, barrier(card, active));
    ctx.bridge.dispatch(StoreAction::EditCard {
        card,
        edit: CardEdit::Effects(effects),
    });
    Ok(())
}
