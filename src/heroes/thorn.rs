//! Thorn: spike guard.

use crate::core::CardId;
use crate::effects::{Effect, EffectKind};
use crate::triggers::{AbilityContext, AbilityResult, HeroAbilities};

use super::effect_id;

pub const HERO: &str = "thorn";

#[must_use]
pub fn abilities() -> HeroAbilities {
    HeroAbilities::new().on_enter(enter)
}

async fn enter(ctx: AbilityContext, card: CardId) -> AbilityResult {
    let guard = Effect::new(effect_id("thorn.spikes", card), HERO, EffectKind::SpikeGuard).from_card(card);
    ctx.bridge.append_card_effect(card, guard);
    Ok(())
}
