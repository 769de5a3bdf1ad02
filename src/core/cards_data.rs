//! The fixed card distribution
//!
//! Card data lives in code: 30 level-one, 24 level-two and 13 level-three
//! cards plus the 4 royal cards. Deck order is decided at setup by the
//! game RNG, not here.

use crate::core::{Ability, Card, CardColor, CardCost, CardId, CardLevel, RoyalCard, RoyalId};

fn cost(blue: u8, white: u8, green: u8, black: u8, red: u8, pearl: u8) -> CardCost {
    CardCost {
        blue,
        white,
        green,
        black,
        red,
        pearl,
    }
}

#[allow(clippy::too_many_arguments)]
fn card(
    id: u32,
    level: CardLevel,
    color: CardColor,
    points: u8,
    crowns: u8,
    ability: Ability,
    is_double: bool,
    cost: CardCost,
) -> Card {
    Card {
        id: CardId::new(id),
        level,
        color,
        points,
        crowns,
        ability,
        is_double,
        cost,
        wild_stack: None,
    }
}

/// All 67 purchasable cards, grouped by level (30 / 24 / 13)
pub fn standard_cards() -> Vec<Card> {
    use Ability::*;
    use CardColor::*;
    use CardLevel::*;

    vec![
        // Level one: cheap engine cards, an occasional crown or ability
        card(1, One, Blue, 0, 0, None, false, cost(0, 1, 1, 1, 1, 0)),
        card(2, One, Blue, 0, 0, None, false, cost(0, 2, 0, 2, 0, 0)),
        card(3, One, Blue, 0, 0, Token, false, cost(0, 0, 2, 0, 1, 1)),
        card(4, One, Blue, 1, 0, None, false, cost(0, 0, 0, 4, 0, 0)),
        card(5, One, Blue, 0, 1, None, false, cost(0, 2, 2, 0, 0, 1)),
        card(6, One, Blue, 0, 0, Scroll, false, cost(0, 3, 0, 0, 0, 1)),
        card(7, One, White, 0, 0, None, false, cost(1, 0, 1, 1, 1, 0)),
        card(8, One, White, 0, 0, None, false, cost(2, 0, 2, 0, 0, 0)),
        card(9, One, White, 0, 0, Token, false, cost(0, 0, 0, 2, 1, 1)),
        card(10, One, White, 1, 0, None, false, cost(0, 0, 4, 0, 0, 0)),
        card(11, One, White, 0, 1, None, false, cost(2, 0, 0, 2, 0, 1)),
        card(12, One, White, 0, 0, Steal, false, cost(3, 0, 0, 0, 0, 1)),
        card(13, One, Green, 0, 0, None, false, cost(1, 1, 0, 1, 1, 0)),
        card(14, One, Green, 0, 0, None, false, cost(0, 2, 0, 0, 2, 0)),
        card(15, One, Green, 0, 0, Token, false, cost(1, 2, 0, 0, 0, 1)),
        card(16, One, Green, 1, 0, None, false, cost(0, 0, 0, 0, 4, 0)),
        card(17, One, Green, 0, 1, None, false, cost(0, 0, 0, 2, 2, 1)),
        card(18, One, Green, 0, 0, Scroll, false, cost(0, 0, 3, 0, 0, 1)),
        card(19, One, Black, 0, 0, None, false, cost(1, 1, 1, 0, 1, 0)),
        card(20, One, Black, 0, 0, None, false, cost(2, 0, 0, 0, 2, 0)),
        card(21, One, Black, 0, 0, Token, false, cost(0, 1, 2, 0, 0, 1)),
        card(22, One, Black, 1, 0, None, false, cost(4, 0, 0, 0, 0, 0)),
        card(23, One, Black, 0, 1, None, false, cost(2, 2, 0, 0, 0, 1)),
        card(24, One, Black, 0, 0, None, false, cost(0, 0, 1, 0, 3, 0)),
        card(25, One, Red, 0, 0, None, false, cost(1, 1, 1, 1, 0, 0)),
        card(26, One, Red, 0, 0, None, false, cost(0, 0, 2, 2, 0, 0)),
        card(27, One, Red, 0, 0, Token, false, cost(2, 0, 0, 1, 0, 1)),
        card(28, One, Red, 1, 0, None, false, cost(0, 4, 0, 0, 0, 0)),
        card(29, One, Red, 0, 1, None, false, cost(0, 0, 2, 2, 0, 1)),
        card(30, One, Red, 0, 0, Steal, false, cost(3, 1, 0, 0, 0, 1)),
        // Level two: doubles, repeat turns, wilds enter the pool
        card(31, Two, Blue, 1, 0, None, true, cost(0, 2, 2, 2, 0, 0)),
        card(32, Two, Blue, 2, 0, None, false, cost(0, 0, 3, 0, 3, 1)),
        card(33, Two, Blue, 1, 1, Steal, false, cost(0, 3, 0, 3, 0, 0)),
        card(34, Two, Blue, 2, 0, Token, false, cost(0, 0, 0, 5, 0, 1)),
        card(35, Two, Blue, 3, 0, None, false, cost(0, 6, 0, 0, 0, 0)),
        card(36, Two, White, 1, 0, None, true, cost(2, 0, 0, 2, 2, 0)),
        card(37, Two, White, 2, 0, None, false, cost(3, 0, 0, 0, 3, 1)),
        card(38, Two, White, 1, 1, Steal, false, cost(0, 0, 3, 0, 3, 0)),
        card(39, Two, White, 2, 0, Token, false, cost(5, 0, 0, 0, 0, 1)),
        card(40, Two, White, 3, 0, None, false, cost(0, 0, 0, 6, 0, 0)),
        card(41, Two, Green, 1, 0, None, true, cost(2, 2, 0, 0, 2, 0)),
        card(42, Two, Green, 2, 0, None, false, cost(3, 3, 0, 0, 0, 1)),
        card(43, Two, Green, 1, 1, Again, false, cost(0, 0, 0, 3, 3, 0)),
        card(44, Two, Green, 2, 0, Token, false, cost(0, 5, 0, 0, 0, 1)),
        card(45, Two, Black, 1, 0, None, true, cost(0, 2, 2, 0, 2, 0)),
        card(46, Two, Black, 2, 0, None, false, cost(0, 3, 3, 0, 0, 1)),
        card(47, Two, Black, 1, 1, Again, false, cost(3, 0, 3, 0, 0, 0)),
        card(48, Two, Black, 2, 0, Scroll, false, cost(0, 0, 0, 0, 5, 1)),
        card(49, Two, Red, 1, 0, None, true, cost(2, 0, 2, 2, 0, 0)),
        card(50, Two, Red, 2, 0, None, false, cost(0, 0, 0, 3, 3, 1)),
        card(51, Two, Red, 1, 2, None, false, cost(3, 0, 0, 0, 3, 0)),
        card(52, Two, Red, 2, 0, Token, false, cost(0, 0, 5, 0, 0, 1)),
        card(53, Two, CardColor::Wild, 0, 1, Ability::Wild, false, cost(2, 2, 2, 2, 2, 0)),
        card(54, Two, CardColor::Wild, 2, 0, Ability::Wild, false, cost(1, 1, 1, 1, 1, 2)),
        // Level three: the big finishers
        card(55, Three, Blue, 4, 0, None, false, cost(0, 3, 3, 0, 3, 1)),
        card(56, Three, Blue, 3, 2, None, false, cost(0, 0, 6, 0, 2, 0)),
        card(57, Three, White, 4, 0, None, false, cost(3, 0, 0, 3, 3, 1)),
        card(58, Three, White, 3, 2, None, false, cost(6, 0, 0, 2, 0, 0)),
        card(59, Three, Green, 4, 0, None, false, cost(3, 3, 0, 3, 0, 1)),
        card(60, Three, Green, 3, 2, None, false, cost(0, 2, 0, 6, 0, 0)),
        card(61, Three, Black, 4, 0, None, false, cost(3, 0, 3, 0, 3, 1)),
        card(62, Three, Black, 3, 2, Again, false, cost(2, 6, 0, 0, 0, 0)),
        card(63, Three, Red, 4, 0, None, false, cost(0, 3, 3, 3, 0, 1)),
        card(64, Three, Red, 3, 2, None, false, cost(0, 0, 2, 0, 6, 0)),
        card(65, Three, Red, 5, 0, None, false, cost(0, 0, 0, 0, 8, 0)),
        card(66, Three, Neutral, 6, 0, None, false, cost(2, 2, 2, 2, 2, 1)),
        card(67, Three, CardColor::Wild, 3, 3, Ability::Wild, false, cost(4, 0, 0, 4, 0, 2)),
    ]
}

/// The four royal cards
pub fn standard_royals() -> Vec<RoyalCard> {
    use Ability::*;

    let royal = |id: u32, points: u8, ability: Ability| RoyalCard {
        id: RoyalId::new(id),
        points,
        ability,
        taken: false,
    };

    vec![
        royal(1, 3, None),
        royal(2, 2, Again),
        royal(3, 2, Steal),
        royal(4, 2, Scroll),
    ]
}
