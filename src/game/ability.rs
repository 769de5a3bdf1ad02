//! Card-ability resolution
//!
//! Every card acquisition (purchase, wild placement, royal award - but not a
//! reserve) runs its ability through [`resolve_ability`]. Abilities that need
//! player input surface as a pending [`Interaction`]; the rest apply
//! immediately or no-op when their precondition fails.

use crate::board::Pos;
use crate::core::{Ability, CardId, Seat, TokenKind};
use crate::game::history::ScrollSource;
use crate::game::purchase::{CardSource, PaymentPlan};
use crate::game::state::GameState;
use serde::{Deserialize, Serialize};

/// The single pending interaction of the acting player, if any.
///
/// Exactly one of these can be outstanding at a time; every validator and
/// resolver dispatches on this tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interaction {
    #[default]
    Idle,
    /// Token ability: take one board token of this color
    AwaitingBonusToken { color: TokenKind },
    /// Steal ability: pick a non-gold token kind to take from the opponent
    AwaitingSteal,
    /// A scroll was committed: pick one non-gold board token
    AwaitingScrollToken,
    /// Over the token cap: discard down to the cap
    AwaitingDiscard { excess: u8 },
    /// A wild card is paid for but not yet placed; nothing is deducted until
    /// the stack is chosen
    AwaitingWildPlacement {
        card: CardId,
        plan: PaymentPlan,
        source: CardSource,
    },
    /// A crown threshold was crossed: choose an untaken royal card
    AwaitingRoyal,
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }
}

/// What resolving an ability produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityOutcome {
    /// No ability, or its precondition failed (silent no-op)
    Nothing,
    /// Again: the turn will repeat once the completion check passes
    RepeatQueued,
    /// Token: the owner must pick one board token of this color
    BonusTokenPending { color: TokenKind },
    /// Steal: the owner must pick a kind to steal
    StealPending,
    /// Scroll: granted immediately
    ScrollGranted { source: ScrollSource },
}

/// Resolve an acquired ability against the current state. `stack` is the
/// color stack of the acquired card (for the Token ability); royals pass
/// `None`.
pub fn resolve_ability(
    state: &mut GameState,
    owner: Seat,
    ability: Ability,
    stack: Option<TokenKind>,
) -> AbilityOutcome {
    match ability {
        Ability::Again => AbilityOutcome::RepeatQueued,
        Ability::Token => match stack {
            Some(color) if state.board.has(color) => {
                AbilityOutcome::BonusTokenPending { color }
            }
            _ => AbilityOutcome::Nothing,
        },
        Ability::Steal => {
            if state.player(owner.opponent()).has_stealable_token() {
                AbilityOutcome::StealPending
            } else {
                AbilityOutcome::Nothing
            }
        }
        Ability::Scroll => {
            let source = state.grant_scroll(owner);
            AbilityOutcome::ScrollGranted { source }
        }
        // Wild marks the two-phase purchase; it is not an on-acquire effect
        Ability::None | Ability::Wild => AbilityOutcome::Nothing,
    }
}

/// Board positions currently holding a token of the given color
pub fn board_positions_of(state: &GameState, color: TokenKind) -> Vec<Pos> {
    crate::board::spiral_order()
        .into_iter()
        .filter(|&pos| state.board.token_at(pos) == Some(color))
        .collect()
}
