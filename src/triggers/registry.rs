//! Hero capability table.
//!
//! Each hero registers at most one handler per hook. The table is built
//! once at startup and then shared read-only by the game and the scheduler;
//! nothing discovers handlers by naming convention at runtime.

use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::board::{EffectList, RowId};
use crate::bridge::GameStateBridge;
use crate::cards::{Card, HeroId};
use crate::core::{AbilityError, CardId};
use crate::effects::Effect;
use crate::modal::Modals;
use crate::targeting::{
    CancellationToken, CardTarget, CardTargetRequest, RowTarget, RowTargetRequest, TargetingCoordinator,
};

/// Result of running one ability.
pub type AbilityResult = Result<(), AbilityError>;

/// Async hook run with the acting card (enter, ultimate).
pub type AbilityHook = Rc<dyn Fn(AbilityContext, CardId) -> LocalBoxFuture<'static, AbilityResult>>;

/// Synchronous hook run when a card is defeated.
pub type DeathHook = Rc<dyn Fn(&AbilityContext, CardId) -> AbilityResult>;

/// Synchronous hook run for each turn-start effect the hero owns.
pub type TurnStartHook = Rc<dyn Fn(&AbilityContext, &TurnStartTrigger) -> AbilityResult>;

/// Everything an ability may touch.
///
/// Every invocation gets its own [`CancellationToken`]; cancelling it ends
/// that ability's pending selections without affecting any other.
#[derive(Clone)]
pub struct AbilityContext {
    pub bridge: Rc<dyn GameStateBridge>,
    pub targeting: TargetingCoordinator,
    pub modals: Modals,
    pub cancel: CancellationToken,
}

impl AbilityContext {
    /// Wait for a card target under this invocation's token.
    pub async fn select_card(&self, request: CardTargetRequest) -> Result<CardTarget, AbilityError> {
        self.targeting
            .select_card(request, Some(&self.cancel))
            .await
            .ok_or(AbilityError::Cancelled)
    }

    /// Wait for a row target under this invocation's token.
    pub async fn select_row(&self, request: RowTargetRequest) -> Result<RowTarget, AbilityError> {
        self.targeting
            .select_row(request, Some(&self.cancel))
            .await
            .ok_or(AbilityError::Cancelled)
    }

    /// Load a card or fail with [`AbilityError::MissingCard`].
    pub fn require_card(&self, card: CardId) -> Result<Card, AbilityError> {
        self.bridge.card(card).ok_or(AbilityError::MissingCard(card))
    }

    /// Current board row of a card.
    pub fn require_row(&self, card: CardId) -> Result<RowId, AbilityError> {
        self.bridge
            .snapshot()
            .row_of(card)
            .filter(|row| row.is_board())
            .ok_or(AbilityError::MissingCard(card))
    }
}

impl std::fmt::Debug for AbilityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbilityContext")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Where a turn-start effect was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectHolder {
    Row { row: RowId, list: EffectList },
    Card { card: CardId, row: RowId },
}

impl EffectHolder {
    /// Row that holds the effect, directly or through a card.
    #[must_use]
    pub fn row(self) -> RowId {
        match self {
            Self::Row { row, .. } | Self::Card { row, .. } => row,
        }
    }
}

/// A turn-start effect about to run.
#[derive(Clone, Debug)]
pub struct TurnStartTrigger {
    pub effect: Effect,
    pub holder: EffectHolder,
}

/// Optional handlers for one hero.
#[derive(Clone, Default)]
pub struct HeroAbilities {
    pub on_enter: Option<AbilityHook>,
    pub on_ultimate: Option<AbilityHook>,
    pub on_death: Option<DeathHook>,
    pub on_turn_start: Option<TurnStartHook>,
    /// Synergy spent from the hero's row to activate the ultimate.
    pub ultimate_cost: i64,
}

impl HeroAbilities {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run when the hero is deployed from hand.
    #[must_use]
    pub fn on_enter<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(AbilityContext, CardId) -> Fut + 'static,
        Fut: Future<Output = AbilityResult> + 'static,
    {
        self.on_enter = Some(Rc::new(move |ctx, card| hook(ctx, card).boxed_local()));
        self
    }

    /// Run on ultimate activation, after the cost is paid.
    #[must_use]
    pub fn on_ultimate<F, Fut>(mut self, cost: i64, hook: F) -> Self
    where
        F: Fn(AbilityContext, CardId) -> Fut + 'static,
        Fut: Future<Output = AbilityResult> + 'static,
    {
        self.ultimate_cost = cost;
        self.on_ultimate = Some(Rc::new(move |ctx, card| hook(ctx, card).boxed_local()));
        self
    }

    #[must_use]
    pub fn on_death(mut self, hook: impl Fn(&AbilityContext, CardId) -> AbilityResult + 'static) -> Self {
        self.on_death = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_turn_start(
        mut self,
        hook: impl Fn(&AbilityContext, &TurnStartTrigger) -> AbilityResult + 'static,
    ) -> Self {
        self.on_turn_start = Some(Rc::new(hook));
        self
    }
}

impl std::fmt::Debug for HeroAbilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeroAbilities")
            .field("on_enter", &self.on_enter.is_some())
            .field("on_ultimate", &self.on_ultimate.is_some())
            .field("on_death", &self.on_death.is_some())
            .field("on_turn_start", &self.on_turn_start.is_some())
            .field("ultimate_cost", &self.ultimate_cost)
            .finish()
    }
}

/// Lookup from hero to its handlers.
#[derive(Clone, Debug, Default)]
pub struct HeroRegistry {
    heroes: FxHashMap<HeroId, HeroAbilities>,
}

impl HeroRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hero. A second registration replaces the first.
    pub fn register(&mut self, hero: impl Into<HeroId>, abilities: HeroAbilities) -> &mut Self {
        let hero = hero.into();
        if self.heroes.insert(hero.clone(), abilities).is_some() {
            warn!(%hero, "hero registered twice, keeping the later table");
        }
        self
    }

    /// Builder form of [`Self::register`].
    #[must_use]
    pub fn with(mut self, hero: impl Into<HeroId>, abilities: HeroAbilities) -> Self {
        self.register(hero, abilities);
        self
    }

    #[must_use]
    pub fn get(&self, hero: &HeroId) -> Option<&HeroAbilities> {
        self.heroes.get(hero)
    }

    #[must_use]
    pub fn contains(&self, hero: &HeroId) -> bool {
        self.heroes.contains_key(hero)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Lane;
    use crate::core::PlayerId;

    #[test]
    fn test_register_and_lookup() {
        let registry = HeroRegistry::new()
            .with("medic", HeroAbilities::new().on_death(|_, _| Ok(())))
            .with("scout", HeroAbilities::new());

        assert_eq!(registry.len(), 2);
        let medic = registry.get(&HeroId::new("medic")).unwrap();
        assert!(medic.on_death.is_some());
        assert!(medic.on_enter.is_none());
        assert!(registry.get(&HeroId::new("ghost")).is_none());
    }

    #[test]
    fn test_reregister_replaces() {
        let mut registry = HeroRegistry::new();
        registry.register("medic", HeroAbilities::new());
        registry.register(
            "medic",
            HeroAbilities::new().on_ultimate(3, |_, _| futures::future::ready(Ok(()))),
        );

        assert_eq!(registry.len(), 1);
        let medic = registry.get(&HeroId::new("medic")).unwrap();
        assert_eq!(medic.ultimate_cost, 3);
        assert!(medic.on_ultimate.is_some());
    }

    #[test]
    fn test_holder_row() {
        let row = RowId::new(PlayerId::TWO, Lane::Back);
        assert_eq!(EffectHolder::Row { row, list: EffectList::Ally }.row(), row);
        assert_eq!(EffectHolder::Card { card: CardId(4), row }.row(), row);
    }
}
