//! Game configuration.
//!
//! Tunable rules live here rather than in the pipeline: the shield cap and
//! its single uncapped exception, row capacity, the one hero whose ultimate
//! intercepts lethal damage, and reflection / entry hazard magnitudes.
//!
//! Configuration can be built in code or loaded from JSON:
//!
//! ```
//! use hero_clash::core::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "shield_cap": 4, "max_row_cards": 5 }"#).unwrap();
//! assert_eq!(config.shield_cap, 4);
//! assert_eq!(config.max_row_cards, 5);
//! assert_eq!(config.spike_guard_damage, 1); // defaulted
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::cards::HeroId;

/// The hero whose ultimate can divert otherwise-lethal damage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatDeathRule {
    /// Hero carrying the interception.
    pub hero: HeroId,
    /// Row synergy consumed on activation.
    pub synergy_cost: i64,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Maximum card shield for every hero not listed as uncapped.
    pub shield_cap: i64,

    /// Heroes whose card shield has no cap.
    pub uncapped_shield_heroes: Vec<HeroId>,

    /// Maximum cards a board lane can hold.
    pub max_row_cards: usize,

    /// Lethal-damage interception rule, if any hero has one.
    pub cheat_death: Option<CheatDeathRule>,

    /// Fixed damage reflected at an attacker by a spike guard.
    pub spike_guard_damage: i64,

    /// Seed for the state's deterministic RNG.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            shield_cap: 3,
            uncapped_shield_heroes: Vec::new(),
            max_row_cards: 4,
            cheat_death: None,
            spike_guard_damage: 1,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shield_cap < 0 {
            return Err(ConfigError::Invalid(format!(
                "shield_cap must be non-negative, got {}",
                self.shield_cap
            )));
        }
        if self.max_row_cards == 0 {
            return Err(ConfigError::Invalid("max_row_cards must be at least 1".to_string()));
        }
        if self.spike_guard_damage < 0 {
            return Err(ConfigError::Invalid(format!(
                "spike_guard_damage must be non-negative, got {}",
                self.spike_guard_damage
            )));
        }
        if let Some(rule) = &self.cheat_death {
            if rule.synergy_cost < 0 {
                return Err(ConfigError::Invalid(format!(
                    "cheat_death synergy_cost must be non-negative, got {}",
                    rule.synergy_cost
                )));
            }
        }
        Ok(())
    }

    /// Set the shield cap.
    #[must_use]
    pub fn with_shield_cap(mut self, cap: i64) -> Self {
        self.shield_cap = cap;
        self
    }

    /// Exempt a hero from the shield cap.
    #[must_use]
    pub fn with_uncapped_shield(mut self, hero: impl Into<HeroId>) -> Self {
        self.uncapped_shield_heroes.push(hero.into());
        self
    }

    /// Set lane capacity.
    #[must_use]
    pub fn with_max_row_cards(mut self, max: usize) -> Self {
        self.max_row_cards = max;
        self
    }

    /// Configure the lethal-damage interception.
    #[must_use]
    pub fn with_cheat_death(mut self, hero: impl Into<HeroId>, synergy_cost: i64) -> Self {
        self.cheat_death = Some(CheatDeathRule {
            hero: hero.into(),
            synergy_cost,
        });
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Shield cap for a hero, `None` if uncapped.
    #[must_use]
    pub fn shield_cap_for(&self, hero: &HeroId) -> Option<i64> {
        if self.uncapped_shield_heroes.contains(hero) {
            None
        } else {
            Some(self.shield_cap)
        }
    }

    /// Clamp a shield value for a hero to `[0, cap]`.
    #[must_use]
    pub fn clamp_shield(&self, hero: &HeroId, shield: i64) -> i64 {
        let floored = shield.max(0);
        match self.shield_cap_for(hero) {
            Some(cap) => floored.min(cap),
            None => floored,
        }
    }
}
