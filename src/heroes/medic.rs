//! Medic: regeneration.
//!
//! Plants a healing aura on its lane that mends every living ally there at
//! the start of its owner's turns. The ultimate offers a choice between a
//! big heal and a shield for one ally.

use crate::board::EffectList;
use crate::core::{AbilityError, CardId, StoreAction};
use crate::effects::{Effect, EffectKind};
use crate::targeting::CardTargetRequest;
use crate::triggers::{AbilityContext, AbilityResult, HeroAbilities, TurnStartTrigger};

use super::effect_id;

pub const HERO: &str = "medic";

pub const AURA_HEAL: i64 = 1;
pub const MEND: i64 = 3;
pub const FORTIFY: i64 = 2;

#[must_use]
pub fn abilities() -> HeroAbilities {
    HeroAbilities::new()
        .on_enter(plant_aura)
        .on_turn_start(regenerate)
        .on_ultimate(3, triage)
        .on_death(|ctx, card| {
            ctx.bridge.dispatch(StoreAction::PurgeSourceEffects { source: card });
            Ok(())
        })
}

async fn plant_aura(ctx: AbilityContext, card: CardId) -> AbilityResult {
    let row = ctx.require_row(card)?;
    let aura = Effect::new(effect_id("medic.aura", card), HERO, EffectKind::Healing { amount: AURA_HEAL })
        .from_card(card)
        .from_row(row)
        .on_turn_start();
    ctx.bridge.append_row_effect(row, EffectList::Ally, aura);
    Ok(())
}

fn regenerate(ctx: &AbilityContext, trigger: &TurnStartTrigger) -> AbilityResult {
    let EffectKind::Healing { amount } = trigger.effect.kind else {
        return Ok(());
    };
    let row = ctx.bridge.row(trigger.holder.row());
    for &card in &row.card_ids {
        ctx.bridge.heal(card, amount);
    }
    Ok(())
}

async fn triage(ctx: AbilityContext, card: CardId) -> AbilityResult {
    let owner = ctx.require_card(card)?.owner;
    let choice = ctx
        .modals
        .choose(owner, "Triage", vec!["Mend".to_string(), "Fortify".to_string()])
        .await
        .ok_or(AbilityError::Cancelled)?;
    let target = ctx
        .select_card(CardTargetRequest::new(owner).ally().from_card(card))
        .await?;

    if choice == 0 {
        ctx.bridge.heal(target.card, MEND);
    } else {
        let shield = ctx.require_card(target.card)?.shield;
        ctx.bridge.dispatch_shield_update(target.card, shield + FORTIFY);
    }
    Ok(())
}
