//! Token kinds and per-kind token counts

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven token kinds in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Blue,
    White,
    Green,
    Black,
    Red,
    Pearl,
    Gold,
}

/// The five gem colors, in fixed display order
pub const GEM_KINDS: [TokenKind; 5] = [
    TokenKind::Blue,
    TokenKind::White,
    TokenKind::Green,
    TokenKind::Black,
    TokenKind::Red,
];

/// Every token kind, in fixed display order
pub const ALL_KINDS: [TokenKind; 7] = [
    TokenKind::Blue,
    TokenKind::White,
    TokenKind::Green,
    TokenKind::Black,
    TokenKind::Red,
    TokenKind::Pearl,
    TokenKind::Gold,
];

impl TokenKind {
    /// One of the five gem colors (not pearl, not gold)?
    pub fn is_gem(self) -> bool {
        !matches!(self, TokenKind::Pearl | TokenKind::Gold)
    }

    pub fn is_gold(self) -> bool {
        self == TokenKind::Gold
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Blue => write!(f, "B"),
            TokenKind::White => write!(f, "W"),
            TokenKind::Green => write!(f, "G"),
            TokenKind::Black => write!(f, "K"),
            TokenKind::Red => write!(f, "R"),
            TokenKind::Pearl => write!(f, "P"),
            TokenKind::Gold => write!(f, "$"),
        }
    }
}

/// Per-kind token counts (a player's hand, or the bag of returned tokens)
///
/// Copy-eligible since it's just 7 u8 fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounts {
    pub blue: u8,
    pub white: u8,
    pub green: u8,
    pub black: u8,
    pub red: u8,
    pub pearl: u8,
    pub gold: u8,
}

impl TokenCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: TokenKind) -> u8 {
        match kind {
            TokenKind::Blue => self.blue,
            TokenKind::White => self.white,
            TokenKind::Green => self.green,
            TokenKind::Black => self.black,
            TokenKind::Red => self.red,
            TokenKind::Pearl => self.pearl,
            TokenKind::Gold => self.gold,
        }
    }

    fn slot_mut(&mut self, kind: TokenKind) -> &mut u8 {
        match kind {
            TokenKind::Blue => &mut self.blue,
            TokenKind::White => &mut self.white,
            TokenKind::Green => &mut self.green,
            TokenKind::Black => &mut self.black,
            TokenKind::Red => &mut self.red,
            TokenKind::Pearl => &mut self.pearl,
            TokenKind::Gold => &mut self.gold,
        }
    }

    pub fn add(&mut self, kind: TokenKind, amount: u8) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(amount);
    }

    pub fn add_one(&mut self, kind: TokenKind) {
        self.add(kind, 1);
    }

    /// Remove `amount` tokens of a kind. Returns false (and leaves the counts
    /// unchanged) if fewer than `amount` are held.
    pub fn remove(&mut self, kind: TokenKind, amount: u8) -> bool {
        let slot = self.slot_mut(kind);
        if *slot < amount {
            return false;
        }
        *slot -= amount;
        true
    }

    pub fn remove_one(&mut self, kind: TokenKind) -> bool {
        self.remove(kind, 1)
    }

    /// Total tokens across all seven kinds
    pub fn total(&self) -> u8 {
        self.blue + self.white + self.green + self.black + self.red + self.pearl + self.gold
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over (kind, count) pairs with nonzero counts
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (TokenKind, u8)> + '_ {
        ALL_KINDS
            .iter()
            .map(|&kind| (kind, self.get(kind)))
            .filter(|&(_, count)| count > 0)
    }

    /// Expand into one entry per token, in fixed kind order
    pub fn expand(&self) -> Vec<TokenKind> {
        let mut out = Vec::with_capacity(self.total() as usize);
        for (kind, count) in self.iter_nonzero() {
            for _ in 0..count {
                out.push(kind);
            }
        }
        out
    }

    /// Move all counts from `other` into self
    pub fn absorb(&mut self, other: &TokenCounts) {
        for (kind, count) in other.iter_nonzero() {
            self.add(kind, count);
        }
    }
}

impl fmt::Display for TokenCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, count) in self.iter_nonzero() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}{}", count, kind)?;
            first = false;
        }
        if first {
            write!(f, "-")?;
        }
        Ok(())
    }
}
