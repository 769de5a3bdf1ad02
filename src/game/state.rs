//! The shared game state aggregate

use crate::board::Board;
use crate::core::{
    standard_cards, standard_royals, CardId, CardIndex, CardLevel, Player, RoyalCard, RoyalId,
    Seat, TokenCounts, ALL_LEVELS,
};
use crate::game::history::ScrollSource;
use crate::{GameError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Scrolls in the shared pool at setup (and its cap)
pub const SCROLL_POOL_CAP: u8 = 3;

/// Which physical client owns which seat. The creating client takes
/// [`SeatAssignment::host`]; the joining client takes the other seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub host: Seat,
}

impl Default for SeatAssignment {
    fn default() -> Self {
        SeatAssignment { host: Seat::One }
    }
}

/// Complete shared game state
///
/// Mutated only through rules operations on [`crate::game::Game`], and
/// replaced wholesale by the sync client when a newer remote version lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// All card records in the game
    pub cards: CardIndex,

    /// Per-level draw piles; the back of each Vec is the next draw
    pub decks: [Vec<CardId>; 3],

    /// Per-level face-up offer rows, fixed widths 5/4/3.
    /// A slot goes empty only when its deck is exhausted.
    pub pyramid: [Vec<Option<CardId>>; 3],

    pub board: Board,

    /// Tokens returned from spent purchases, waiting for a refill
    pub bag: TokenCounts,

    pub royals: Vec<RoyalCard>,

    /// Scrolls in the shared pool (0..=3)
    pub scroll_pool: u8,

    pub players: [Player; 2],

    /// Whose turn it is
    pub current: Seat,

    /// Sync seat assignment (which client owns player 1)
    pub assignment: SeatAssignment,

    /// Game RNG, serialized so shuffles replay deterministically across
    /// snapshot round-trips
    pub rng: ChaCha12Rng,
}

impl GameState {
    /// Build a fresh game: shuffled decks, dealt pyramid, spiral-filled
    /// board, full scroll pool, player one to act.
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);

        let mut cards = CardIndex::new();
        let mut decks: [Vec<CardId>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for card in standard_cards() {
            decks[card.level.index()].push(card.id);
            cards.insert(card);
        }
        for deck in decks.iter_mut() {
            deck.shuffle(&mut rng);
        }

        let mut pyramid: [Vec<Option<CardId>>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for level in ALL_LEVELS {
            let row = &mut pyramid[level.index()];
            for _ in 0..level.row_width() {
                row.push(decks[level.index()].pop());
            }
        }

        let board = Board::filled(&mut rng);

        GameState {
            cards,
            decks,
            pyramid,
            board,
            bag: TokenCounts::new(),
            royals: standard_royals(),
            scroll_pool: SCROLL_POOL_CAP,
            players: [
                Player::new(Seat::One, "Player 1"),
                Player::new(Seat::Two, "Player 2"),
            ],
            current: Seat::One,
            assignment: SeatAssignment::default(),
            rng,
        }
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut Player {
        &mut self.players[seat.index()]
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.current)
    }

    pub fn current_player_mut(&mut self) -> &mut Player {
        self.player_mut(self.current)
    }

    /// The face-up card in a pyramid slot
    pub fn pyramid_card(&self, level: CardLevel, slot: usize) -> Result<CardId> {
        self.pyramid[level.index()]
            .get(slot)
            .copied()
            .flatten()
            .ok_or_else(|| {
                GameError::InvalidAction(format!("No card in pyramid slot {} of {}", slot, level))
            })
    }

    /// Remove a pyramid card and refill the slot from its level deck.
    /// The slot goes empty when the deck is exhausted.
    pub fn take_from_pyramid(&mut self, level: CardLevel, slot: usize) -> Result<CardId> {
        let card = self.pyramid_card(level, slot)?;
        let replacement = self.decks[level.index()].pop();
        self.pyramid[level.index()][slot] = replacement;
        Ok(card)
    }

    /// Draw the top card of a level deck (blind reserve)
    pub fn take_from_deck(&mut self, level: CardLevel) -> Result<CardId> {
        self.decks[level.index()]
            .pop()
            .ok_or_else(|| GameError::InvalidAction(format!("The {} deck is empty", level)))
    }

    pub fn royal(&self, id: RoyalId) -> Result<&RoyalCard> {
        self.royals
            .iter()
            .find(|royal| royal.id == id)
            .ok_or(GameError::RoyalNotFound(id.as_u32()))
    }

    pub fn royal_mut(&mut self, id: RoyalId) -> Result<&mut RoyalCard> {
        self.royals
            .iter_mut()
            .find(|royal| royal.id == id)
            .ok_or(GameError::RoyalNotFound(id.as_u32()))
    }

    pub fn untaken_royals(&self) -> Vec<RoyalId> {
        self.royals
            .iter()
            .filter(|royal| !royal.taken)
            .map(|royal| royal.id)
            .collect()
    }

    /// Award one scroll to `to`: from the pool if any remain, otherwise by
    /// stealing one from the other player, otherwise granted outright (the
    /// last case is a preserved quirk of the original rules).
    pub fn grant_scroll(&mut self, to: Seat) -> ScrollSource {
        if self.scroll_pool > 0 {
            self.scroll_pool -= 1;
            self.player_mut(to).privileges += 1;
            ScrollSource::Pool
        } else if self.player(to.opponent()).privileges > 0 {
            self.player_mut(to.opponent()).privileges -= 1;
            self.player_mut(to).privileges += 1;
            ScrollSource::StolenFromOpponent
        } else {
            self.player_mut(to).privileges += 1;
            ScrollSource::Granted
        }
    }

    /// Sum of scrolls in play (pool + both players)
    pub fn scrolls_in_play(&self) -> u8 {
        self.scroll_pool + self.players[0].privileges + self.players[1].privileges
    }
}
