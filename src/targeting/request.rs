//! Targeting requests and their validation rules.

use serde::{Deserialize, Serialize};

use crate::board::RowId;
use crate::core::{CardId, GameState, PlayerId, TargetError};

/// Which side a card target must be on, relative to the chooser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Ally,
    Enemy,
    #[default]
    Any,
}

/// Which board rows a row target may be.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowScope {
    #[default]
    Any,
    Friendly,
    Enemy,
}

/// A chosen card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTarget {
    pub card: CardId,
    pub row: RowId,
}

/// A chosen row, with the slot clicked if the UI reported one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTarget {
    pub row: RowId,
    pub position: Option<usize>,
}

/// "Select a card" options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTargetRequest {
    /// Player making the choice.
    pub player: PlayerId,
    /// Acting card, used for the aim line.
    pub source: Option<CardId>,
    pub alignment: Alignment,
    pub allow_turrets: bool,
    pub allow_defeated: bool,
}

impl CardTargetRequest {
    /// Any living, non-turret card on the board.
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            source: None,
            alignment: Alignment::Any,
            allow_turrets: false,
            allow_defeated: false,
        }
    }

    /// Restrict to allies (builder pattern).
    #[must_use]
    pub fn ally(mut self) -> Self {
        self.alignment = Alignment::Ally;
        self
    }

    /// Restrict to enemies (builder pattern).
    #[must_use]
    pub fn enemy(mut self) -> Self {
        self.alignment = Alignment::Enemy;
        self
    }

    /// Draw the aim line from this card (builder pattern).
    #[must_use]
    pub fn from_card(mut self, card: CardId) -> Self {
        self.source = Some(card);
        self
    }

    /// Allow turrets (builder pattern).
    #[must_use]
    pub fn with_turrets(mut self) -> Self {
        self.allow_turrets = true;
        self
    }

    /// Allow defeated cards (builder pattern).
    #[must_use]
    pub fn with_defeated(mut self) -> Self {
        self.allow_defeated = true;
        self
    }

    /// Check a clicked card. When `row` is omitted it is inferred by
    /// scanning the six board rows.
    pub fn validate(
        &self,
        state: &GameState,
        card: CardId,
        row: Option<RowId>,
    ) -> Result<CardTarget, TargetError> {
        let row = match row {
            Some(row) if row.is_board() && state.row(row).contains(card) => row,
            Some(_) => return Err(TargetError::UnknownCard(card)),
            None => RowId::board()
                .find(|&r| state.row(r).contains(card))
                .ok_or(TargetError::UnknownCard(card))?,
        };
        let found = state.card(card).ok_or(TargetError::UnknownCard(card))?;

        if found.is_defeated() && !self.allow_defeated {
            return Err(TargetError::Defeated(card));
        }
        if found.is_turret() && !self.allow_turrets {
            return Err(TargetError::TurretNotAllowed);
        }
        match self.alignment {
            Alignment::Ally if found.owner != self.player => return Err(TargetError::NotAlly),
            Alignment::Enemy if found.owner == self.player => return Err(TargetError::NotEnemy),
            _ => {}
        }
        Ok(CardTarget { card, row })
    }

    /// Every valid target on the board, in board order.
    #[must_use]
    pub fn candidates(&self, state: &GameState) -> Vec<CardTarget> {
        RowId::board()
            .flat_map(|row| {
                state
                    .row(row)
                    .card_ids
                    .iter()
                    .filter_map(|&card| self.validate(state, card, Some(row)).ok())
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// "Select a row" options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTargetRequest {
    /// Player making the choice.
    pub player: PlayerId,
    /// Acting card, used for the aim line.
    pub source: Option<CardId>,
    pub scope: RowScope,
    /// Refuse rows at capacity.
    pub require_space: bool,
}

impl RowTargetRequest {
    /// Any board row.
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            source: None,
            scope: RowScope::Any,
            require_space: false,
        }
    }

    /// Restrict to the chooser's rows (builder pattern).
    #[must_use]
    pub fn friendly(mut self) -> Self {
        self.scope = RowScope::Friendly;
        self
    }

    /// Restrict to the opponent's rows (builder pattern).
    #[must_use]
    pub fn enemy(mut self) -> Self {
        self.scope = RowScope::Enemy;
        self
    }

    /// Refuse full rows (builder pattern).
    #[must_use]
    pub fn with_space(mut self) -> Self {
        self.require_space = true;
        self
    }

    /// Draw the aim line from this card (builder pattern).
    #[must_use]
    pub fn from_card(mut self, card: CardId) -> Self {
        self.source = Some(card);
        self
    }

    /// Check a clicked row.
    pub fn validate(
        &self,
        state: &GameState,
        row: RowId,
        position: Option<usize>,
        max_row_cards: usize,
    ) -> Result<RowTarget, TargetError> {
        let in_scope = row.is_board()
            && match self.scope {
                RowScope::Any => true,
                RowScope::Friendly => row.player == self.player,
                RowScope::Enemy => row.player != self.player,
            };
        if !in_scope {
            return Err(TargetError::RowOutOfScope(row));
        }
        if self.require_space && state.row(row).len() >= max_row_cards {
            return Err(TargetError::RowFull(row));
        }
        Ok(RowTarget { row, position })
    }

    /// Every valid row, in board order.
    #[must_use]
    pub fn candidates(&self, state: &GameState, max_row_cards: usize) -> Vec<RowTarget> {
        RowId::board()
            .filter_map(|row| self.validate(state, row, None, max_row_cards).ok())
            .collect()
    }
}
