//! Sanctuary: slot invulnerability.
//!
//! The ultimate wards every occupied column of a friendly lane until the
//! start of the owner's next turn. Other sources protecting the same slots
//! are unaffected when the ward lifts. A defeated warden's ward lifts at once.

use crate::core::CardId;
use crate::effects::{Effect, EffectKind};
use crate::targeting::RowTargetRequest;
use crate::triggers::{AbilityContext, AbilityResult, EffectHolder, HeroAbilities, TurnStartTrigger};

use super::effect_id;

pub const HERO: &str = "sanctuary";

#[must_use]
pub fn abilities() -> HeroAbilities {
    HeroAbilities::new()
        .on_ultimate(3, ward)
        .on_turn_start(lift)
        .on_death(fall)
}

async fn ward(ctx: AbilityContext, card: CardId) -> AbilityResult {
    let owner = ctx.require_card(card)?.owner;
    let target = ctx
        .select_row(RowTargetRequest::new(owner).friendly().from_card(card))
        .await?;
    let columns: Vec<usize> = (0..ctx.bridge.row(target.row).len()).collect();
    ctx.bridge.set_invulnerable_slots(target.row, card, &columns);

    let marker = Effect::new(effect_id("sanctuary.ward", card), HERO, EffectKind::Invulnerability)
        .from_card(card)
        .from_row(target.row)
        .on_turn_start();
    ctx.bridge.append_card_effect(card, marker);
    Ok(())
}

fn lift(ctx: &AbilityContext, trigger: &TurnStartTrigger) -> AbilityResult {
    let EffectHolder::Card { card, .. } = trigger.holder else {
        return Ok(());
    };
    if let Some(row) = trigger.effect.source_row {
        ctx.bridge.clear_invulnerable_slots(row, card);
    }
    ctx.bridge.remove_card_effect(card, &trigger.effect.id);
    Ok(())
}

fn fall(ctx: &AbilityContext, card: CardId) -> AbilityResult {
    ctx.bridge.clear_invulnerable_source(card);
    let markers: Vec<_> = ctx
        .require_card(card)?
        .effects
        .iter()
        .filter(|e| e.hero.as_str() == HERO && e.runs_on_turn_start())
        .map(|e| e.id.clone())
        .collect();
    for id in markers {
        ctx.bridge.remove_card_effect(card, &id);
    }
    Ok(())
}
