//! Purchase planning: discounts, gold assignment, affordability
//!
//! Plan computation is separated from commitment. A [`PaymentPlan`] is pure
//! data; [`crate::game::Game`] commits one by moving the spend into the bag.
//! For wild cards the plan is parked in the pending interaction until the
//! buyer picks a color stack, so cancellation never has anything to undo.

use crate::core::{Card, CardCost, CardIndex, CardLevel, Player, TokenCounts, TokenKind, COST_KINDS};
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};

/// Where a purchased card comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum CardSource {
    Pyramid { level: CardLevel, slot: usize },
    Reserve { index: usize },
}

/// Where a reserved card comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum ReserveSource {
    Pyramid { level: CardLevel, slot: usize },
    DeckTop { level: CardLevel },
}

/// An exact spend per token kind, plus whatever the plan could not cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// Tokens to hand over, including gold
    pub spend: TokenCounts,
    /// Residual need per cost column; zero for a committable plan
    pub shortfall: CardCost,
}

impl PaymentPlan {
    pub fn is_complete(&self) -> bool {
        self.shortfall.is_zero()
    }
}

/// Cost left after applying the player's card discounts. Pearl columns are
/// never discounted.
pub fn needs_after_discount(card: &Card, player: &Player, cards: &CardIndex) -> CardCost {
    let mut needs = CardCost::new();
    for &kind in &COST_KINDS {
        let cost = card.cost.get(kind);
        if kind == TokenKind::Pearl {
            needs.set(kind, cost);
        } else {
            let units = player.discount_units(kind, cards);
            needs.set(kind, cost.saturating_sub(units));
        }
    }
    needs
}

/// Per-column need not coverable by same-kind tokens (gold ignored)
pub fn deficits(needs: &CardCost, tokens: &TokenCounts) -> CardCost {
    needs.uncovered_by(tokens)
}

/// Can the needs be paid at all, counting gold as any kind?
pub fn is_affordable(needs: &CardCost, tokens: &TokenCounts) -> bool {
    deficits(needs, tokens).total() <= tokens.gold
}

/// The default plan: cover each column with same-kind tokens first, then fund
/// the remainder with gold in fixed column order, up to the gold owned.
///
/// Always internally consistent - never spends more gold than owned, never
/// exceeds a column's need. Incomplete (nonzero shortfall) when the player
/// cannot afford the card.
pub fn default_plan(needs: &CardCost, tokens: &TokenCounts) -> PaymentPlan {
    let mut spend = TokenCounts::new();
    let mut shortfall = CardCost::new();
    let mut gold_left = tokens.gold;

    for &kind in &COST_KINDS {
        let need = needs.get(kind);
        let from_tokens = need.min(tokens.get(kind));
        spend.add(kind, from_tokens);

        let remaining = need - from_tokens;
        let from_gold = remaining.min(gold_left);
        spend.add(TokenKind::Gold, from_gold);
        gold_left -= from_gold;

        shortfall.set(kind, remaining - from_gold);
    }

    PaymentPlan { spend, shortfall }
}

/// A plan from an explicit per-gold-token assignment: one entry per owned
/// gold token, `Some(kind)` to spend that gold on a cost column, `None` to
/// keep it. A column may receive gold beyond its remaining need (deliberate
/// substitution for tokens or card-covered cost). Whatever gold does not
/// cover must be payable with same-kind tokens, otherwise the plan is
/// rejected.
pub fn assigned_plan(
    needs: &CardCost,
    tokens: &TokenCounts,
    assignment: &[Option<TokenKind>],
) -> Result<PaymentPlan> {
    if assignment.len() != tokens.gold as usize {
        return Err(GameError::InvalidAction(format!(
            "Expected one gold assignment per owned gold token ({}), got {}",
            tokens.gold,
            assignment.len()
        )));
    }

    let mut gold_for = CardCost::new();
    let mut gold_spent = 0u8;
    for choice in assignment.iter().flatten() {
        if *choice == TokenKind::Gold {
            return Err(GameError::InvalidAction(
                "Gold cannot be assigned to a gold column".to_string(),
            ));
        }
        gold_for.set(*choice, gold_for.get(*choice) + 1);
        gold_spent += 1;
    }

    let mut spend = TokenCounts::new();
    spend.add(TokenKind::Gold, gold_spent);

    for &kind in &COST_KINDS {
        let token_need = needs.get(kind).saturating_sub(gold_for.get(kind));
        if tokens.get(kind) < token_need {
            return Err(GameError::InvalidAction(
                "Selection does not fully cover the cost".to_string(),
            ));
        }
        spend.add(kind, token_need);
    }

    Ok(PaymentPlan {
        spend,
        shortfall: CardCost::new(),
    })
}
