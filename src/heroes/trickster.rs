//! Trickster: scrambles an enemy lane when that lane's owner next starts a turn.

use crate::board::EffectList;
use crate::core::{CardId, StoreAction};
use crate::effects::{Effect, EffectKind};
use crate::targeting::RowTargetRequest;
use crate::triggers::{AbilityContext, AbilityResult, EffectHolder, HeroAbilities, TurnStartTrigger};

use super::effect_id;

pub const HERO: &str = "trickster";

#[must_use]
pub fn abilities() -> HeroAbilities {
    HeroAbilities::new().on_ultimate(1, plant).on_turn_start(scramble)
}

async fn plant(ctx: AbilityContext, card: CardId) -> AbilityResult {
    let owner = ctx.require_card(card)?.owner;
    let target = ctx
        .select_row(RowTargetRequest::new(owner).enemy().from_card(card))
        .await?;
    let effect = Effect::new(effect_id("trickster.scramble", card), HERO, EffectKind::Shuffle)
        .from_card(card)
        .on_turn_start();
    ctx.bridge.append_row_effect(target.row, EffectList::Enemy, effect);
    Ok(())
}

/// One-shot: shuffle the lane, then remove the token.
fn scramble(ctx: &AbilityContext, trigger: &TurnStartTrigger) -> AbilityResult {
    let EffectHolder::Row { row, list } = trigger.holder else {
        return Ok(());
    };
    ctx.bridge.dispatch(StoreAction::ShuffleRow { row });
    ctx.bridge.remove_row_effect(row, list, &trigger.effect.id);
    Ok(())
}
