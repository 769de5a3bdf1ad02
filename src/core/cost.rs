//! Card costs over the five gem colors plus pearl

use crate::core::{TokenCounts, TokenKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six token kinds that can appear in a card cost (gold never does)
pub const COST_KINDS: [TokenKind; 6] = [
    TokenKind::Blue,
    TokenKind::White,
    TokenKind::Green,
    TokenKind::Black,
    TokenKind::Red,
    TokenKind::Pearl,
];

/// A card's cost, per token kind
///
/// Copy-eligible since it's just 6 u8 fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCost {
    pub blue: u8,
    pub white: u8,
    pub green: u8,
    pub black: u8,
    pub red: u8,
    pub pearl: u8,
}

impl CardCost {
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
            TokenKind::Gold => 0,
        }
    }

    pub fn set(&mut self, kind: TokenKind, amount: u8) {
        match kind {
            TokenKind::Blue => self.blue = amount,
            TokenKind::White => self.white = amount,
            TokenKind::Green => self.green = amount,
            TokenKind::Black => self.black = amount,
            TokenKind::Red => self.red = amount,
            TokenKind::Pearl => self.pearl = amount,
            TokenKind::Gold => {}
        }
    }

    /// Total cost across all kinds
    pub fn total(&self) -> u8 {
        self.blue + self.white + self.green + self.black + self.red + self.pearl
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over (kind, amount) pairs with nonzero amounts
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (TokenKind, u8)> + '_ {
        COST_KINDS
            .iter()
            .map(|&kind| (kind, self.get(kind)))
            .filter(|&(_, amount)| amount > 0)
    }

    /// The part of this cost not covered by the given tokens, per kind
    pub fn uncovered_by(&self, tokens: &TokenCounts) -> CardCost {
        let mut out = CardCost::new();
        for &kind in &COST_KINDS {
            out.set(kind, self.get(kind).saturating_sub(tokens.get(kind)));
        }
        out
    }
}

impl fmt::Display for CardCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, amount) in self.iter_nonzero() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}{}", amount, kind)?;
            first = false;
        }
        if first {
            write!(f, "free")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_accessors() {
        let mut cost = CardCost::new();
        cost.set(TokenKind::Blue, 3);
        cost.set(TokenKind::Pearl, 1);

        assert_eq!(cost.get(TokenKind::Blue), 3);
        assert_eq!(cost.get(TokenKind::Pearl), 1);
        assert_eq!(cost.get(TokenKind::Gold), 0);
        assert_eq!(cost.total(), 4);
    }

    #[test]
    fn test_uncovered_by() {
        let mut cost = CardCost::new();
        cost.set(TokenKind::Blue, 3);
        cost.set(TokenKind::White, 1);

        let mut tokens = TokenCounts::new();
        tokens.add(TokenKind::Blue, 2);
        tokens.add(TokenKind::White, 4);

        let uncovered = cost.uncovered_by(&tokens);
        assert_eq!(uncovered.get(TokenKind::Blue), 1);
        assert_eq!(uncovered.get(TokenKind::White), 0);
        assert_eq!(uncovered.total(), 1);
    }
}
