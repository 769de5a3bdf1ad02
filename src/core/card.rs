//! Card and royal-card definitions

use crate::core::{CardCost, TokenKind};
use crate::{GameError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple integer ID for cards
///
/// IDs are stable for the whole game - cards never get deallocated, they only
/// move between the decks, the pyramid, reserves and player stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    pub fn new(id: u32) -> Self {
        CardId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simple integer ID for royal cards (separate space from CardId)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoyalId(u32);

impl RoyalId {
    pub fn new(id: u32) -> Self {
        RoyalId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RoyalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Card level, which decides deck membership and pyramid row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardLevel {
    One,
    Two,
    Three,
}

pub const ALL_LEVELS: [CardLevel; 3] = [CardLevel::One, CardLevel::Two, CardLevel::Three];

impl CardLevel {
    pub fn index(self) -> usize {
        match self {
            CardLevel::One => 0,
            CardLevel::Two => 1,
            CardLevel::Three => 2,
        }
    }

    /// Width of this level's face-up pyramid row (5 / 4 / 3)
    pub fn row_width(self) -> usize {
        match self {
            CardLevel::One => 5,
            CardLevel::Two => 4,
            CardLevel::Three => 3,
        }
    }
}

impl fmt::Display for CardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.index() + 1)
    }
}

/// Card color: one of the five gems, neutral (no stack), or wild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardColor {
    Blue,
    White,
    Green,
    Black,
    Red,
    Neutral,
    Wild,
}

impl CardColor {
    /// The token kind this color's discount applies to, if any
    pub fn token_kind(self) -> Option<TokenKind> {
        match self {
            CardColor::Blue => Some(TokenKind::Blue),
            CardColor::White => Some(TokenKind::White),
            CardColor::Green => Some(TokenKind::Green),
            CardColor::Black => Some(TokenKind::Black),
            CardColor::Red => Some(TokenKind::Red),
            CardColor::Neutral | CardColor::Wild => None,
        }
    }
}

/// Special ability granted when a card is acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    None,
    /// Take another turn
    Again,
    /// Take one bonus board token of the card's own color
    Token,
    /// Steal one non-gold token from the opponent
    Steal,
    /// Gain one scroll
    Scroll,
    /// Marker for wild cards (two-phase purchase, see the purchase engine)
    Wild,
}

/// An immutable card record plus the one mutable wild-placement field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub level: CardLevel,
    pub color: CardColor,
    pub points: u8,
    pub crowns: u8,
    pub ability: Ability,
    /// Counts as 2 discount units of its color when owned
    pub is_double: bool,
    pub cost: CardCost,
    /// For wild cards only: the color stack the owner assigned the card to.
    /// Set exactly once at placement, permanent afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wild_stack: Option<TokenKind>,
}

impl Card {
    pub fn is_wild(&self) -> bool {
        self.color == CardColor::Wild
    }

    /// Discount units this card contributes to its stack (doubles count 2)
    pub fn discount_units(&self) -> u8 {
        if self.is_double {
            2
        } else {
            1
        }
    }

    /// The color stack this card belongs to: its printed color, or the
    /// assigned stack for a placed wild card.
    pub fn stack_kind(&self) -> Option<TokenKind> {
        self.color.token_kind().or(self.wild_stack)
    }
}

/// A royal card, awarded once per crown-threshold crossing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoyalCard {
    pub id: RoyalId,
    pub points: u8,
    pub ability: Ability,
    /// Monotonic: flips false -> true once, never back
    pub taken: bool,
}

/// Central storage for all card records, with fast lookup by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardIndex {
    cards: FxHashMap<CardId, Card>,
}

impl CardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, card: Card) {
        self.cards.insert(card.id, card);
    }

    pub fn get(&self, id: CardId) -> Result<&Card> {
        self.cards.get(&id).ok_or(GameError::CardNotFound(id.as_u32()))
    }

    pub fn get_mut(&mut self, id: CardId) -> Result<&mut Card> {
        self.cards
            .get_mut(&id)
            .ok_or(GameError::CardNotFound(id.as_u32()))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CardId, &Card)> {
        self.cards.iter()
    }
}
