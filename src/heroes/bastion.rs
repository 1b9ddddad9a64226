//! Bastion: entry hazards.
//!
//! On entry the owner picks an enemy lane and mines it. Every enemy card
//! moved into that lane afterwards takes a hit. The mines go away when
//! Bastion falls.

use crate::board::EffectList;
use crate::core::{CardId, StoreAction};
use crate::effects::{Effect, EffectKind};
use crate::targeting::RowTargetRequest;
use crate::triggers::{AbilityContext, AbilityResult, HeroAbilities};

use super::effect_id;

pub const HERO: &str = "bastion";

pub const HAZARD_DAMAGE: i64 = 1;

#[must_use]
pub fn abilities() -> HeroAbilities {
    HeroAbilities::new().on_enter(enter).on_death(|ctx, card| {
        ctx.bridge.dispatch(StoreAction::PurgeSourceEffects { source: card });
        Ok(())
    })
}

async fn enter(ctx: AbilityContext, card: CardId) -> AbilityResult {
    let owner = ctx.require_card(card)?.owner;
    let target = ctx
        .select_row(RowTargetRequest::new(owner).enemy().from_card(card))
        .await?;
    let hazard = Effect::new(
        effect_id("bastion.hazard", card),
        HERO,
        EffectKind::EntryHazard { damage: HAZARD_DAMAGE },
    )
    .from_card(card);
    ctx.bridge.append_row_effect(target.row, EffectList::Enemy, hazard);
    Ok(())
}
