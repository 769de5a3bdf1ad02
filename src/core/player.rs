//! Player representation

use crate::core::{CardId, CardIndex, RoyalCard, RoyalId, TokenCounts, TokenKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum reserved cards per player
pub const MAX_RESERVES: usize = 3;

/// Maximum tokens a player may keep at the end of any token-granting action
pub const TOKEN_CAP: u8 = 10;

/// One of the two seats at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn opponent(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::One => write!(f, "player 1"),
            Seat::Two => write!(f, "player 2"),
        }
    }
}

/// A player: tokens in hand, owned card stacks, reserves, royals, scrolls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,

    pub name: String,

    /// Tokens currently in hand
    pub tokens: TokenCounts,

    /// Owned cards in acquisition order. The most recently appended card of a
    /// color is the top of that color's stack.
    pub cards: Vec<CardId>,

    /// Reserved cards, at most [`MAX_RESERVES`]
    pub reserves: Vec<CardId>,

    /// Royal cards awarded at crown thresholds
    pub royals: Vec<RoyalId>,

    /// Scrolls held
    pub privileges: u8,
}

impl Player {
    pub fn new(seat: Seat, name: impl Into<String>) -> Self {
        Player {
            seat,
            name: name.into(),
            tokens: TokenCounts::new(),
            cards: Vec::new(),
            reserves: Vec::new(),
            royals: Vec::new(),
            privileges: 0,
        }
    }

    pub fn total_tokens(&self) -> u8 {
        self.tokens.total()
    }

    /// Discount units for one gem color: one per owned card of that color,
    /// two for doubles. Wild cards count toward their assigned stack.
    pub fn discount_units(&self, kind: TokenKind, cards: &CardIndex) -> u8 {
        self.cards
            .iter()
            .filter_map(|&id| cards.get(id).ok())
            .filter(|card| card.stack_kind() == Some(kind))
            .map(|card| card.discount_units())
            .sum()
    }

    /// The top card of a color stack: the most recently appended card whose
    /// stack is that color.
    pub fn top_of_stack(&self, kind: TokenKind, cards: &CardIndex) -> Option<CardId> {
        self.cards
            .iter()
            .rev()
            .find(|&&id| {
                cards
                    .get(id)
                    .map(|card| card.stack_kind() == Some(kind))
                    .unwrap_or(false)
            })
            .copied()
    }

    /// Total crowns across owned cards
    pub fn crowns(&self, cards: &CardIndex) -> u8 {
        self.cards
            .iter()
            .filter_map(|&id| cards.get(id).ok())
            .map(|card| card.crowns)
            .sum()
    }

    /// Total prestige points across owned cards and royals
    pub fn points(&self, cards: &CardIndex, royals: &[RoyalCard]) -> u8 {
        let card_points: u8 = self
            .cards
            .iter()
            .filter_map(|&id| cards.get(id).ok())
            .map(|card| card.points)
            .sum();
        let royal_points: u8 = royals
            .iter()
            .filter(|royal| self.royals.contains(&royal.id))
            .map(|royal| royal.points)
            .sum();
        card_points + royal_points
    }

    pub fn can_reserve(&self) -> bool {
        self.reserves.len() < MAX_RESERVES
    }

    /// Does this player hold any non-gold token?
    pub fn has_stealable_token(&self) -> bool {
        self.tokens.total() > self.tokens.gold
    }
}
