//! The rules engine: game session, player actions, turn lifecycle

pub mod ability;
pub mod history;
pub mod logger;
pub mod purchase;
pub mod state;
pub mod take;
pub mod turn;

pub use ability::{resolve_ability, AbilityOutcome, Interaction};
pub use history::{ScrollSource, TurnEvent, TurnHistory, TurnRecord, TurnStatus};
pub use logger::{GameLogger, LogEntry, OutputMode, VerbosityLevel};
pub use purchase::{
    assigned_plan, default_plan, deficits, is_affordable, needs_after_discount, CardSource,
    PaymentPlan, ReserveSource,
};
pub use state::{GameState, SeatAssignment, SCROLL_POOL_CAP};
pub use take::{scroll_awards, validate_selection, SelectionMode};
pub use turn::{crown_crossings, Progress, TurnContext};

use crate::board::Pos;
use crate::core::{Ability, CardId, RoyalId, Seat, TokenCounts, TokenKind, GEM_KINDS, TOKEN_CAP};
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};

/// A full game session: shared state, turn context, history and logging.
///
/// Every rules operation is a method here; each one validates, mutates, logs,
/// and then drives the turn lifecycle. There are no free-standing mode flags:
/// all pending input lives in [`TurnContext::interaction`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub state: GameState,
    #[serde(default)]
    pub turn: TurnContext,
    #[serde(default)]
    pub history: TurnHistory,
    #[serde(skip)]
    pub logger: GameLogger,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Game {
            state: GameState::new(seed),
            turn: TurnContext::default(),
            history: TurnHistory::new(),
            logger: GameLogger::new(),
        }
    }

    pub fn interaction(&self) -> &Interaction {
        &self.turn.interaction
    }

    pub fn points(&self, seat: Seat) -> u8 {
        self.state
            .player(seat)
            .points(&self.state.cards, &self.state.royals)
    }

    pub fn crowns(&self, seat: Seat) -> u8 {
        self.state.player(seat).crowns(&self.state.cards)
    }

    fn require_idle(&self) -> Result<()> {
        if self.turn.interaction.is_idle() {
            Ok(())
        } else {
            Err(GameError::InvalidAction(
                "Another interaction is pending".to_string(),
            ))
        }
    }

    fn require_main_open(&self) -> Result<()> {
        if self.turn.main_action_done {
            Err(GameError::InvalidAction(
                "The turn action has already been taken".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn record(&mut self, event: TurnEvent) {
        self.history.record(self.state.current, event);
    }

    // ------------------------------------------------------------------
    // Token actions
    // ------------------------------------------------------------------

    /// Take 1-3 tokens from the board (the turn's main action)
    pub fn take_tokens(&mut self, positions: &[Pos]) -> Result<Progress> {
        self.require_idle()?;
        self.require_main_open()?;

        let kinds = validate_selection(&self.state.board, positions, SelectionMode::Normal)?;

        let seat = self.state.current;
        for (&pos, &kind) in positions.iter().zip(kinds.iter()) {
            self.state.board.take(pos);
            self.state.player_mut(seat).tokens.add_one(kind);
        }
        self.logger
            .event(format!("{} takes {} token(s)", seat, kinds.len()));
        self.record(TurnEvent::TookTokens {
            positions: positions.to_vec(),
            kinds: kinds.to_vec(),
        });

        let awards = scroll_awards(&kinds);
        for _ in 0..awards {
            self.award_scroll(seat.opponent());
        }

        self.turn.main_action_done = true;
        Ok(self.advance())
    }

    /// Pour the bag back onto the board. Free action; always hands the
    /// opponent a scroll and blocks scroll spending for the rest of the turn.
    pub fn refill_board(&mut self) -> Result<Progress> {
        self.require_idle()?;
        self.require_main_open()?;
        if self.state.bag.is_empty() {
            return Err(GameError::InvalidAction("The bag is empty".to_string()));
        }

        let poured = {
            let GameState {
                board, bag, rng, ..
            } = &mut self.state;
            board.refill_from(bag, rng)
        };
        self.turn.board_refilled = true;

        let seat = self.state.current;
        self.logger
            .event(format!("{} refills the board ({} tokens)", seat, poured));
        self.record(TurnEvent::RefilledBoard { poured });
        self.award_scroll(seat.opponent());

        Ok(Progress::InTurn)
    }

    /// Start spending a scroll on a single board token
    pub fn begin_scroll_pickup(&mut self) -> Result<Progress> {
        self.require_idle()?;
        self.require_main_open()?;
        if self.turn.board_refilled {
            return Err(GameError::InvalidAction(
                "Scrolls cannot be spent after refilling the board".to_string(),
            ));
        }
        if self.state.current_player().privileges == 0 {
            return Err(GameError::InvalidAction("No scrolls to spend".to_string()));
        }

        self.turn.interaction = Interaction::AwaitingScrollToken;
        Ok(Progress::AwaitingInteraction)
    }

    /// Finish the scroll spend by picking one non-gold board token
    pub fn pick_scroll_token(&mut self, pos: Pos) -> Result<Progress> {
        if self.turn.interaction != Interaction::AwaitingScrollToken {
            return Err(GameError::InvalidAction(
                "No scroll pickup in progress".to_string(),
            ));
        }

        let kinds = validate_selection(&self.state.board, &[pos], SelectionMode::Normal)?;
        let kind = kinds[0];

        let seat = self.state.current;
        self.state.board.take(pos);
        let player = self.state.player_mut(seat);
        player.privileges -= 1;
        player.tokens.add_one(kind);

        self.logger
            .event(format!("{} spends a scroll for a {} token", seat, kind));
        self.record(TurnEvent::SpentScroll { kind });
        self.turn.interaction = Interaction::Idle;
        Ok(self.advance())
    }

    pub fn cancel_scroll_pickup(&mut self) -> Result<Progress> {
        if self.turn.interaction != Interaction::AwaitingScrollToken {
            return Err(GameError::InvalidAction(
                "No scroll pickup in progress".to_string(),
            ));
        }
        self.turn.interaction = Interaction::Idle;
        Ok(Progress::InTurn)
    }

    // ------------------------------------------------------------------
    // Purchasing and reserving
    // ------------------------------------------------------------------

    /// The card a purchase source currently points at
    pub fn card_at_source(&self, source: CardSource) -> Result<CardId> {
        match source {
            CardSource::Pyramid { level, slot } => self.state.pyramid_card(level, slot),
            CardSource::Reserve { index } => self
                .state
                .current_player()
                .reserves
                .get(index)
                .copied()
                .ok_or_else(|| {
                    GameError::InvalidAction(format!("No reserved card at index {}", index))
                }),
        }
    }

    /// Affordability hint for UI: can the card be paid with the default plan?
    pub fn is_affordable_at(&self, source: CardSource) -> Result<bool> {
        let card_id = self.card_at_source(source)?;
        let card = self.state.cards.get(card_id)?;
        let player = self.state.current_player();
        let needs = needs_after_discount(card, player, &self.state.cards);
        Ok(is_affordable(&needs, &player.tokens))
    }

    /// Informational pre-purchase warning: a Steal/Token ability card that
    /// would push the buyer over the token cap. Never blocks the purchase.
    pub fn cap_warning(&self, source: CardSource) -> Result<Option<String>> {
        let card_id = self.card_at_source(source)?;
        let card = self.state.cards.get(card_id)?;
        if !matches!(card.ability, Ability::Steal | Ability::Token) {
            return Ok(None);
        }
        let player = self.state.current_player();
        let needs = needs_after_discount(card, player, &self.state.cards);
        let plan = default_plan(&needs, &player.tokens);
        let after = player.total_tokens() - plan.spend.total() + 1;
        if after > TOKEN_CAP {
            Ok(Some(format!(
                "This card's ability would put you over {} tokens",
                TOKEN_CAP
            )))
        } else {
            Ok(None)
        }
    }

    /// Gem stacks a wild card could legally join: nonempty and not topped by
    /// another wild
    pub fn eligible_wild_stacks(&self) -> Vec<TokenKind> {
        let player = self.state.current_player();
        GEM_KINDS
            .iter()
            .copied()
            .filter(|&kind| {
                player
                    .top_of_stack(kind, &self.state.cards)
                    .and_then(|top| self.state.cards.get(top).ok())
                    .map(|top| !top.is_wild())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Buy a card from the pyramid or from the player's reserves.
    ///
    /// With no gold assignment the default plan is used and must fully cover
    /// the cost. Wild cards park the plan in a pending placement instead of
    /// committing - nothing is deducted until [`Game::place_wild`].
    pub fn purchase(
        &mut self,
        source: CardSource,
        gold_assignment: Option<&[Option<TokenKind>]>,
    ) -> Result<Progress> {
        self.require_idle()?;
        self.require_main_open()?;

        let card_id = self.card_at_source(source)?;
        let card = self.state.cards.get(card_id)?.clone();
        let player = self.state.current_player();
        let needs = needs_after_discount(&card, player, &self.state.cards);

        let plan = match gold_assignment {
            Some(assignment) => assigned_plan(&needs, &player.tokens, assignment)?,
            None => {
                let plan = default_plan(&needs, &player.tokens);
                if !plan.is_complete() {
                    return Err(GameError::InvalidAction(
                        "Cannot afford this card".to_string(),
                    ));
                }
                plan
            }
        };

        if card.is_wild() {
            if self.eligible_wild_stacks().is_empty() {
                return Err(GameError::InvalidAction(
                    "No eligible color stack for a wild card".to_string(),
                ));
            }
            self.turn.interaction = Interaction::AwaitingWildPlacement {
                card: card_id,
                plan,
                source,
            };
            return Ok(Progress::AwaitingInteraction);
        }

        self.commit_purchase(card_id, source, &plan)?;
        self.turn.main_action_done = true;
        self.on_card_acquired(card_id)?;
        Ok(self.advance())
    }

    /// Assign a pending wild card to a color stack, committing the parked
    /// payment plan
    pub fn place_wild(&mut self, stack: TokenKind) -> Result<Progress> {
        let (card_id, plan, source) = match &self.turn.interaction {
            Interaction::AwaitingWildPlacement { card, plan, source } => (*card, *plan, *source),
            _ => {
                return Err(GameError::InvalidAction(
                    "No wild placement in progress".to_string(),
                ))
            }
        };

        if !stack.is_gem() {
            return Err(GameError::InvalidAction(
                "A wild card must join a gem color stack".to_string(),
            ));
        }
        let player = self.state.current_player();
        let top = player
            .top_of_stack(stack, &self.state.cards)
            .ok_or_else(|| {
                GameError::InvalidAction(format!("No cards in the {} stack", stack))
            })?;
        if self.state.cards.get(top)?.is_wild() {
            return Err(GameError::InvalidAction(
                "Cannot place a wild card on top of another wild card".to_string(),
            ));
        }

        self.turn.interaction = Interaction::Idle;
        self.commit_purchase(card_id, source, &plan)?;
        self.state.cards.get_mut(card_id)?.wild_stack = Some(stack);
        self.record(TurnEvent::WildPlaced {
            card: card_id,
            stack,
        });

        self.turn.main_action_done = true;
        self.on_card_acquired(card_id)?;
        Ok(self.advance())
    }

    /// Abandon a pending wild purchase. The player's resources were never
    /// touched, so there is nothing to roll back.
    pub fn cancel_wild(&mut self) -> Result<Progress> {
        match self.turn.interaction {
            Interaction::AwaitingWildPlacement { .. } => {
                self.turn.interaction = Interaction::Idle;
                Ok(Progress::InTurn)
            }
            _ => Err(GameError::InvalidAction(
                "No wild placement in progress".to_string(),
            )),
        }
    }

    fn commit_purchase(
        &mut self,
        card_id: CardId,
        source: CardSource,
        plan: &PaymentPlan,
    ) -> Result<()> {
        let seat = self.state.current;

        match source {
            CardSource::Pyramid { level, slot } => {
                let taken = self.state.take_from_pyramid(level, slot)?;
                if taken != card_id {
                    return Err(GameError::InvalidAction(
                        "The pyramid slot changed under the purchase".to_string(),
                    ));
                }
            }
            CardSource::Reserve { index } => {
                let reserves = &mut self.state.player_mut(seat).reserves;
                if reserves.get(index) != Some(&card_id) {
                    return Err(GameError::InvalidAction(
                        "The reserve slot changed under the purchase".to_string(),
                    ));
                }
                reserves.remove(index);
            }
        }

        let player = self.state.player_mut(seat);
        for (kind, count) in plan.spend.iter_nonzero() {
            if !player.tokens.remove(kind, count) {
                return Err(GameError::InvalidAction(
                    "Payment plan exceeds tokens held".to_string(),
                ));
            }
        }
        // Spent tokens are never destroyed; they wait in the bag
        self.state.bag.absorb(&plan.spend);

        let points = self.state.cards.get(card_id)?.points;
        self.state.player_mut(seat).cards.push(card_id);

        self.logger
            .event(format!("{} buys card {}", seat, card_id));
        self.record(TurnEvent::Purchased {
            card: card_id,
            points,
        });
        Ok(())
    }

    /// Reserve a card (face-up slot or blind deck top) and take one gold
    pub fn reserve(&mut self, source: ReserveSource, gold_pos: Pos) -> Result<Progress> {
        self.require_idle()?;
        self.require_main_open()?;

        let seat = self.state.current;
        if !self.state.player(seat).can_reserve() {
            return Err(GameError::InvalidAction(
                "Reserve limit reached".to_string(),
            ));
        }
        if self.state.board.token_at(gold_pos) != Some(TokenKind::Gold) {
            return Err(GameError::InvalidAction(
                "Reserving requires taking a gold token from the board".to_string(),
            ));
        }

        let (card_id, level, face_up) = match source {
            ReserveSource::Pyramid { level, slot } => {
                (self.state.take_from_pyramid(level, slot)?, level, true)
            }
            ReserveSource::DeckTop { level } => (self.state.take_from_deck(level)?, level, false),
        };

        self.state.board.take(gold_pos);
        let player = self.state.player_mut(seat);
        player.tokens.add_one(TokenKind::Gold);
        player.reserves.push(card_id);

        self.logger
            .event(format!("{} reserves a {} card", seat, level));
        self.record(TurnEvent::Reserved {
            level,
            card: face_up.then_some(card_id),
        });

        self.turn.main_action_done = true;
        Ok(self.advance())
    }

    // ------------------------------------------------------------------
    // Interaction resolution
    // ------------------------------------------------------------------

    /// Resolve a pending bonus-token ability by picking a board position
    pub fn resolve_bonus_token(&mut self, pos: Pos) -> Result<Progress> {
        let color = match self.turn.interaction {
            Interaction::AwaitingBonusToken { color } => color,
            _ => {
                return Err(GameError::InvalidAction(
                    "No bonus token pending".to_string(),
                ))
            }
        };

        validate_selection(&self.state.board, &[pos], SelectionMode::Bonus { color })?;

        let seat = self.state.current;
        self.state.board.take(pos);
        self.state.player_mut(seat).tokens.add_one(color);
        self.record(TurnEvent::BonusToken { kind: color });

        self.turn.interaction = Interaction::Idle;
        Ok(self.advance())
    }

    /// Resolve a pending steal by naming the kind to take
    pub fn resolve_steal(&mut self, kind: TokenKind) -> Result<Progress> {
        if self.turn.interaction != Interaction::AwaitingSteal {
            return Err(GameError::InvalidAction("No steal pending".to_string()));
        }
        if kind.is_gold() {
            return Err(GameError::InvalidAction(
                "Gold cannot be stolen".to_string(),
            ));
        }

        let seat = self.state.current;
        if !self.state.player_mut(seat.opponent()).tokens.remove_one(kind) {
            return Err(GameError::InvalidAction(format!(
                "Opponent holds no {} token",
                kind
            )));
        }
        self.state.player_mut(seat).tokens.add_one(kind);

        self.logger
            .event(format!("{} steals a {} token", seat, kind));
        self.record(TurnEvent::StoleToken { kind });
        self.turn.interaction = Interaction::Idle;
        Ok(self.advance())
    }

    /// Discard down to the token cap
    pub fn discard_tokens(&mut self, kinds: &[TokenKind]) -> Result<Progress> {
        let excess = match self.turn.interaction {
            Interaction::AwaitingDiscard { excess } => excess,
            _ => {
                return Err(GameError::InvalidAction(
                    "No discard required".to_string(),
                ))
            }
        };
        if kinds.len() != excess as usize {
            return Err(GameError::InvalidAction(format!(
                "Exactly {} token(s) must be discarded",
                excess
            )));
        }

        let mut removal = TokenCounts::new();
        for &kind in kinds {
            removal.add_one(kind);
        }
        let seat = self.state.current;
        let player = self.state.player_mut(seat);
        for (kind, count) in removal.iter_nonzero() {
            if player.tokens.get(kind) < count {
                return Err(GameError::InvalidAction(
                    "Cannot discard tokens you do not hold".to_string(),
                ));
            }
        }
        for (kind, count) in removal.iter_nonzero() {
            player.tokens.remove(kind, count);
        }
        self.state.bag.absorb(&removal);

        self.record(TurnEvent::Discarded {
            kinds: kinds.to_vec(),
        });
        self.turn.interaction = Interaction::Idle;
        Ok(self.advance())
    }

    /// Claim an untaken royal card after a crown-threshold crossing
    pub fn choose_royal(&mut self, id: RoyalId) -> Result<Progress> {
        if self.turn.interaction != Interaction::AwaitingRoyal {
            return Err(GameError::InvalidAction(
                "No royal choice pending".to_string(),
            ));
        }

        let royal = self.state.royal_mut(id)?;
        if royal.taken {
            return Err(GameError::InvalidAction(format!(
                "Royal card {} is already taken",
                id
            )));
        }
        royal.taken = true;
        let ability = royal.ability;

        let seat = self.state.current;
        self.state.player_mut(seat).royals.push(id);
        self.logger.event(format!("{} claims royal {}", seat, id));
        self.record(TurnEvent::RoyalTaken { royal: id });

        self.turn.royals_due = self.turn.royals_due.saturating_sub(1);
        self.turn.interaction = Interaction::Idle;

        // A royal's own ability goes through the resolver like a card's
        self.apply_ability(ability, None);
        Ok(self.advance())
    }

    // ------------------------------------------------------------------
    // Lifecycle internals
    // ------------------------------------------------------------------

    fn award_scroll(&mut self, to: Seat) {
        let source = self.state.grant_scroll(to);
        self.record(TurnEvent::ScrollAwarded { to, source });
    }

    fn apply_ability(&mut self, ability: Ability, stack: Option<TokenKind>) {
        let seat = self.state.current;
        match resolve_ability(&mut self.state, seat, ability, stack) {
            AbilityOutcome::Nothing => {}
            AbilityOutcome::RepeatQueued => {
                self.turn.repeat_pending = true;
                self.logger.event(format!("{} will take another turn", seat));
            }
            AbilityOutcome::BonusTokenPending { color } => {
                self.turn.interaction = Interaction::AwaitingBonusToken { color };
            }
            AbilityOutcome::StealPending => {
                self.turn.interaction = Interaction::AwaitingSteal;
            }
            AbilityOutcome::ScrollGranted { source } => {
                self.record(TurnEvent::ScrollAwarded { to: seat, source });
            }
        }
    }

    fn on_card_acquired(&mut self, card_id: CardId) -> Result<()> {
        let card = self.state.cards.get(card_id)?;
        let (ability, stack) = (card.ability, card.stack_kind());
        self.apply_ability(ability, stack);
        Ok(())
    }

    /// Drive the turn lifecycle after an action or a resolved interaction:
    /// discard gate, then crown gate, then completion.
    fn advance(&mut self) -> Progress {
        if !self.turn.interaction.is_idle() {
            return Progress::AwaitingInteraction;
        }

        let seat = self.state.current;

        // Token-limit gate comes before everything else
        let total = self.state.player(seat).total_tokens();
        if total > TOKEN_CAP {
            self.turn.interaction = Interaction::AwaitingDiscard {
                excess: total - TOKEN_CAP,
            };
            return Progress::AwaitingInteraction;
        }

        // Crown-threshold gate, tracked by the per-seat watermark
        let crowns = self.state.player(seat).crowns(&self.state.cards);
        let watermark = self.turn.crown_watermark[seat.index()];
        if crowns > watermark {
            let crossings = crown_crossings(watermark, crowns);
            self.turn.crown_watermark[seat.index()] = crowns;
            let untaken = self.state.untaken_royals().len() as u8;
            self.turn.royals_due = (self.turn.royals_due + crossings).min(untaken);
        }
        if self.turn.royals_due > 0 && !self.state.untaken_royals().is_empty() {
            self.turn.interaction = Interaction::AwaitingRoyal;
            return Progress::AwaitingInteraction;
        }

        // Completion: only once the main action has happened
        if !self.turn.main_action_done {
            return Progress::InTurn;
        }
        if self.turn.repeat_pending {
            self.turn.repeat_pending = false;
            self.turn.main_action_done = false;
            self.turn.board_refilled = false;
            self.logger.event(format!("{} takes another turn", seat));
            return Progress::TurnRepeats;
        }

        self.history.finalize_pending();
        self.turn.main_action_done = false;
        self.turn.board_refilled = false;
        self.state.current = seat.opponent();
        self.logger
            .event(format!("Turn passes to {}", self.state.current));
        Progress::TurnEnded
    }
}
