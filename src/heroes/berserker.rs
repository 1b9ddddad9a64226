//! Berserker: damage boost and a targeted strike.

use crate::core::CardId;
use crate::damage::DamageIntent;
use crate::effects::{Effect, EffectKind};
use crate::targeting::CardTargetRequest;
use crate::triggers::{AbilityContext, AbilityResult, HeroAbilities};

use super::effect_id;

pub const HERO: &str = "berserker";

pub const STRIKE_DAMAGE: i64 = 3;

#[must_use]
pub fn abilities() -> HeroAbilities {
    HeroAbilities::new().on_enter(rally).on_ultimate(2, strike)
}

/// Boost one ally's damage.
async fn rally(ctx: AbilityContext, card: CardId) -> AbilityResult {
    let owner = ctx.require_card(card)?.owner;
    let target = ctx
        .select_card(CardTargetRequest::new(owner).ally().from_card(card))
        .await?;
    let boost = Effect::new(effect_id("berserker.fury", card), HERO, EffectKind::DamageBoost { amount: 1 })
        .from_card(card);
    ctx.bridge.append_card_effect(target.card, boost);
    Ok(())
}

async fn strike(ctx: AbilityContext, card: CardId) -> AbilityResult {
    let owner = ctx.require_card(card)?.owner;
    let target = ctx
        .select_card(CardTargetRequest::new(owner).enemy().from_card(card))
        .await?;
    ctx.bridge.deal_damage(
        DamageIntent::new(target.card, STRIKE_DAMAGE)
            .in_row(target.row)
            .from_card(card),
    );
    Ok(())
}
