//! The assembled game.
//!
//! [`Game`] owns one store and wires every service to it: the event buses,
//! the damage pipeline, targeting, modals, the hero registry and the
//! turn-start scheduler. It is the production [`GameStateBridge`].
//!
//! Every dispatch made through `Game` is followed by a scheduler check, so
//! turn-start effects run as soon as a turn transition lands in the store,
//! whoever caused it.

use std::panic::AssertUnwindSafe;
use std::rc::Rc;

use futures::FutureExt;
use im::Vector;
use tracing::{debug, info, warn};

use crate::board::{EffectList, Row, RowId};
use crate::bridge::GameStateBridge;
use crate::cards::Card;
use crate::core::{
    AbilityError, CardEdit, CardId, GameConfig, GameState, PlayerId, Store, StoreAction, TargetError,
};
use crate::damage::{DamageBus, DamageIntent, DamageOutcome};
use crate::effects::{Effect, EffectId, EffectKind};
use crate::events::{Buses, GameplayRequest, Toast};
use crate::modal::Modals;
use crate::targeting::{AiController, CancellationToken, TargetingCoordinator};
use crate::triggers::{AbilityContext, AbilityHook, AbilityResult, HeroRegistry, TurnScheduler};

struct GameInner {
    store: Store,
    buses: Buses,
    damage: DamageBus,
    targeting: TargetingCoordinator,
    modals: Modals,
    heroes: HeroRegistry,
    scheduler: TurnScheduler,
}

/// Cloneable handle to a running game.
#[derive(Clone)]
pub struct Game {
    inner: Rc<GameInner>,
}

impl Game {
    /// Start a game on an empty table. The opening turn's triggers run
    /// immediately.
    #[must_use]
    pub fn new(config: GameConfig, heroes: HeroRegistry) -> Self {
        Self::with_store(Store::new(config), heroes)
    }

    /// Wrap an existing store.
    #[must_use]
    pub fn with_store(store: Store, heroes: HeroRegistry) -> Self {
        let buses = Buses::new();
        let damage = DamageBus::new(store.clone(), buses.combat.clone());
        let targeting =
            TargetingCoordinator::new(store.clone(), buses.toast.clone(), buses.aim.clone());
        let modals = Modals::new(buses.modal.clone(), store.clone(), targeting.clone());
        let game = Self {
            inner: Rc::new(GameInner {
                store,
                buses,
                damage,
                targeting,
                modals,
                heroes,
                scheduler: TurnScheduler::new(),
            }),
        };
        game.run_turn_triggers();
        game
    }

    // === Accessors ===

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.inner.store.config()
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.inner.store.state()
    }

    #[must_use]
    pub fn buses(&self) -> &Buses {
        &self.inner.buses
    }

    #[must_use]
    pub fn damage(&self) -> &DamageBus {
        &self.inner.damage
    }

    #[must_use]
    pub fn targeting(&self) -> &TargetingCoordinator {
        &self.inner.targeting
    }

    #[must_use]
    pub fn modals(&self) -> &Modals {
        &self.inner.modals
    }

    #[must_use]
    pub fn heroes(&self) -> &HeroRegistry {
        &self.inner.heroes
    }

    #[must_use]
    pub fn scheduler(&self) -> &TurnScheduler {
        &self.inner.scheduler
    }

    /// Let `ai` answer targeting and modals when it is active.
    pub fn set_ai(&self, ai: Rc<dyn AiController>) {
        self.inner.targeting.set_ai(ai);
    }

    /// A fresh context for one ability invocation.
    #[must_use]
    pub fn context(&self) -> AbilityContext {
        AbilityContext {
            bridge: Rc::new(self.clone()),
            targeting: self.inner.targeting.clone(),
            modals: self.inner.modals.clone(),
            cancel: CancellationToken::new(),
        }
    }

    // === State changes ===

    /// Apply an action, then run turn-start triggers if a turn began.
    /// Returns the state the action produced.
    pub fn dispatch(&self, action: StoreAction) -> GameState {
        let next = self.inner.store.dispatch(action);
        self.run_turn_triggers();
        next
    }

    /// Run the scheduler now. Returns how many handlers completed.
    pub fn run_turn_triggers(&self) -> usize {
        self.inner.scheduler.observe(&self.context(), &self.inner.heroes)
    }

    /// Hand control to `player`.
    pub fn advance_turn(&self, player: PlayerId) -> GameState {
        self.dispatch(StoreAction::AdvanceTurn { player })
    }

    /// Clear the table and start the next round.
    pub fn reset_round(&self, starting_player: PlayerId) -> GameState {
        info!(%starting_player, "round reset");
        self.dispatch(StoreAction::ResetRound { starting_player })
    }

    /// Put a new card on the table.
    pub fn spawn_card(&self, row: RowId, index: Option<usize>, build: impl FnOnce(CardId) -> Card) -> CardId {
        let card = self.inner.store.create_card(row, index, build);
        self.run_turn_triggers();
        card
    }

    /// Give `player` a card in hand. The store stamps it with the current turn.
    pub fn add_to_hand(&self, player: PlayerId, build: impl FnOnce(CardId) -> Card) -> CardId {
        self.inner.store.create_card(RowId::hand(player), None, build)
    }

    /// Move a card. Moving onto a board lane from elsewhere triggers that
    /// lane's entry hazards. Returns `false` if the card is missing or the
    /// destination is full.
    pub fn move_card(&self, card: CardId, to: RowId, index: Option<usize>) -> bool {
        let Some(from) = self.inner.store.row_of(card) else {
            debug!(%card, "move of unknown card ignored");
            return false;
        };
        if from != to && self.inner.store.is_row_full(to) {
            debug!(%card, row = %to, "move refused, row full");
            return false;
        }
        self.dispatch(StoreAction::MoveCard { card, to, index });
        if to.is_board() && from != to {
            self.apply_entry_hazards(card, to);
        }
        true
    }

    /// Deal one hit per opposing entry hazard in `row` to `card`.
    pub fn apply_entry_hazards(&self, card: CardId, row: RowId) -> usize {
        let state = self.state();
        if state.card(card).is_none_or(|c| c.owner != row.player) {
            return 0;
        }
        let hazards: Vec<i64> = state
            .row(row)
            .enemy_effects
            .iter()
            .filter_map(|effect| match effect.kind {
                EffectKind::EntryHazard { damage } => Some(damage),
                _ => None,
            })
            .collect();

        for &damage in &hazards {
            debug!(%card, %row, damage, "entry hazard");
            self.deal_damage(DamageIntent::new(card, damage).in_row(row).from_row(row));
        }
        hazards.len()
    }

    /// Run the damage pipeline, then the death hooks of every card it
    /// defeated.
    pub fn deal_damage(&self, intent: DamageIntent) -> DamageOutcome {
        let outcome = self.inner.damage.deal_damage(intent);
        for &card in &outcome.defeated {
            self.run_death(card);
        }
        outcome
    }

    /// Heal up to max health.
    pub fn heal(&self, card: CardId, amount: i64) -> i64 {
        self.inner.damage.heal(card, amount)
    }

    fn run_death(&self, card: CardId) {
        let Some(hero) = self.inner.store.card(card).map(|c| c.hero) else {
            return;
        };
        let Some(hook) = self.inner.heroes.get(&hero).and_then(|h| h.on_death.clone()) else {
            return;
        };
        let ctx = self.context();
        match std::panic::catch_unwind(AssertUnwindSafe(|| hook(&ctx, card))) {
            Ok(Ok(())) => debug!(%card, %hero, "death hook ran"),
            Ok(Err(err)) => warn!(%card, %hero, %err, "death hook failed"),
            Err(_) => warn!(%card, %hero, "death hook panicked"),
        }
    }

    // === Abilities ===

    /// Play a card from its owner's hand onto one of their lanes.
    ///
    /// The card is marked played, stamped with the turn, and its lane
    /// synergy is added to the row. Entry hazards resolve next, then the
    /// hero's enter ability if the card survived them.
    pub async fn deploy_card(&self, card: CardId, row: RowId, index: Option<usize>) -> AbilityResult {
        let state = self.state();
        let snapshot = state.card(card).cloned().ok_or(AbilityError::MissingCard(card))?;
        let from = state.row_of(card).ok_or(AbilityError::MissingCard(card))?;
        if !from.is_hand() {
            return Err(AbilityError::Other(format!("{card} is not in hand")));
        }
        if !row.is_board() || row.player != snapshot.owner {
            return Err(TargetError::RowOutOfScope(row).into());
        }
        if self.inner.store.is_row_full(row) {
            return Err(TargetError::RowFull(row).into());
        }

        self.dispatch(StoreAction::MoveCard { card, to: row, index });
        self.dispatch(StoreAction::EditCard {
            card,
            edit: CardEdit::Played(true),
        });
        self.dispatch(StoreAction::EditCard {
            card,
            edit: CardEdit::EnteredTurn(Some(state.turn_count)),
        });
        let synergy = snapshot.synergy.get(row.lane);
        if synergy != 0 {
            self.dispatch(StoreAction::UpdateRowSynergy { row, delta: synergy });
        }
        info!(%card, hero = %snapshot.hero, %row, "card deployed");

        self.apply_entry_hazards(card, row);
        if self.inner.store.card(card).is_none_or(|c| c.is_defeated()) {
            debug!(%card, "defeated on entry, enter ability skipped");
            return Ok(());
        }

        let hook = self.inner.heroes.get(&snapshot.hero).and_then(|h| h.on_enter.clone());
        match hook {
            Some(hook) => self.run_ability(hook, card, snapshot.owner, "enter").await,
            None => Ok(()),
        }
    }

    /// Ultimate cost for a card on the board after row and card modifiers.
    #[must_use]
    pub fn ultimate_cost(&self, card: CardId) -> Option<i64> {
        let state = self.state();
        let snapshot = state.card(card)?;
        let row = state.row_of(card)?;
        let base = self.inner.heroes.get(&snapshot.hero)?.ultimate_cost;
        let delta: i64 = state
            .row(row)
            .all_effects()
            .chain(snapshot.effects.iter())
            .filter_map(|effect| match effect.kind {
                EffectKind::UltimateCostModifier { delta } => Some(delta),
                _ => None,
            })
            .sum();
        Some((base + delta).max(0))
    }

    /// Activate a hero's once-per-round ultimate.
    ///
    /// Usage is marked and synergy spent before the ability runs, so a
    /// second activation while the first awaits a target is refused.
    pub async fn activate_ultimate(&self, card: CardId) -> AbilityResult {
        let state = self.state();
        let snapshot = state.card(card).cloned().ok_or(AbilityError::MissingCard(card))?;
        let row = state
            .row_of(card)
            .filter(|row| row.is_board())
            .ok_or(TargetError::UnknownCard(card))?;
        if snapshot.is_defeated() {
            return Err(TargetError::Defeated(card).into());
        }
        let Some(hook) = self.inner.heroes.get(&snapshot.hero).and_then(|h| h.on_ultimate.clone()) else {
            return Err(AbilityError::Other(format!("{} has no ultimate", snapshot.hero)));
        };
        if state.ultimate_used(snapshot.owner, &snapshot.hero) {
            return Err(AbilityError::UltimateUsed);
        }
        let cost = self.ultimate_cost(card).unwrap_or(0);
        let available = state.row(row).synergy;
        if available < cost {
            return Err(AbilityError::InsufficientSynergy {
                needed: cost,
                available,
            });
        }

        self.dispatch(StoreAction::MarkUltimateUsed {
            player: snapshot.owner,
            hero: snapshot.hero.clone(),
        });
        if cost > 0 {
            self.dispatch(StoreAction::UpdateRowSynergy { row, delta: -cost });
        }
        info!(%card, hero = %snapshot.hero, cost, "ultimate activated");
        self.run_ability(hook, card, snapshot.owner, "ultimate").await
    }

    async fn run_ability(
        &self,
        hook: AbilityHook,
        card: CardId,
        owner: PlayerId,
        kind: &'static str,
    ) -> AbilityResult {
        let result = AssertUnwindSafe(hook(self.context(), card))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(AbilityError::Other(format!("{kind} ability panicked"))));
        match &result {
            Ok(()) => {}
            Err(AbilityError::Cancelled) => debug!(%card, kind, "ability cancelled"),
            Err(err) => {
                warn!(%card, kind, %err, "ability failed");
                self.inner.buses.toast.publish(&Toast::to(owner, err.to_string()));
            }
        }
        result
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("store", &self.inner.store)
            .field("heroes", &self.inner.heroes.len())
            .field("last_turn", &self.inner.scheduler.last_seen())
            .finish_non_exhaustive()
    }
}

impl GameStateBridge for Game {
    fn snapshot(&self) -> GameState {
        self.state()
    }

    fn dispatch(&self, action: StoreAction) {
        Self::dispatch(self, action);
    }

    fn row(&self, row: RowId) -> Row {
        self.inner.store.row(row)
    }

    fn card(&self, card: CardId) -> Option<Card> {
        self.inner.store.card(card)
    }

    fn set_card_health(&self, card: CardId, health: i64) {
        Self::dispatch(self, StoreAction::EditCard {
            card,
            edit: CardEdit::Health(health),
        });
    }

    fn dispatch_shield_update(&self, card: CardId, shield: i64) {
        Self::dispatch(self, StoreAction::EditCard {
            card,
            edit: CardEdit::Shield(shield),
        });
    }

    fn append_card_effect(&self, card: CardId, effect: Effect) {
        Self::dispatch(self, StoreAction::AppendCardEffect { card, effect });
    }

    fn remove_card_effect(&self, card: CardId, id: &EffectId) {
        Self::dispatch(self, StoreAction::RemoveCardEffect { card, id: id.clone() });
    }

    fn append_row_effect(&self, row: RowId, list: EffectList, effect: Effect) {
        Self::dispatch(self, StoreAction::AppendRowEffect { row, list, effect });
    }

    fn remove_row_effect(&self, row: RowId, list: EffectList, id: &EffectId) {
        Self::dispatch(self, StoreAction::RemoveRowEffect {
            row,
            list,
            id: id.clone(),
        });
    }

    fn set_row_effects(&self, row: RowId, list: EffectList, effects: Vector<Effect>) {
        Self::dispatch(self, StoreAction::SetRowEffects { row, list, effects });
    }

    fn update_synergy(&self, row: RowId, delta: i64) {
        Self::dispatch(self, StoreAction::UpdateRowSynergy { row, delta });
    }

    fn move_card_to_row(&self, card: CardId, row: RowId) -> bool {
        self.move_card(card, row, None)
    }

    fn is_row_full(&self, row: RowId) -> bool {
        self.inner.store.is_row_full(row)
    }

    fn max_health(&self, card: CardId) -> Option<i64> {
        self.inner.store.card(card).map(|c| c.max_health)
    }

    fn set_invulnerable_slots(&self, row: RowId, source: CardId, columns: &[usize]) {
        Self::dispatch(self, StoreAction::SetInvulnerableSlots {
            row,
            source,
            columns: columns.iter().copied().collect(),
        });
    }

    fn clear_invulnerable_slots(&self, row: RowId, source: CardId) {
        Self::dispatch(self, StoreAction::ClearInvulnerableSlots { row, source });
    }

    fn clear_invulnerable_source(&self, source: CardId) {
        Self::dispatch(self, StoreAction::ClearInvulnerableSource { source });
    }

    fn is_slot_invulnerable(&self, row: RowId, column: usize) -> bool {
        self.inner.store.is_slot_invulnerable(row, column)
    }

    fn deal_damage(&self, intent: DamageIntent) -> DamageOutcome {
        Self::deal_damage(self, intent)
    }

    fn heal(&self, card: CardId, amount: i64) -> i64 {
        Self::heal(self, card, amount)
    }

    fn toast(&self, toast: Toast) {
        self.inner.buses.toast.publish(&toast);
    }

    fn request(&self, request: GameplayRequest) {
        self.inner.buses.gameplay.publish(&request);
    }
}
