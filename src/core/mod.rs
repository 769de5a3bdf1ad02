//! Core data types: tokens, costs, cards, players

pub mod card;
pub mod cards_data;
pub mod cost;
pub mod player;
pub mod token;

pub use card::{Ability, Card, CardColor, CardId, CardIndex, CardLevel, RoyalCard, RoyalId, ALL_LEVELS};
pub use cards_data::{standard_cards, standard_royals};
pub use cost::{CardCost, COST_KINDS};
pub use player::{Player, Seat, MAX_RESERVES, TOKEN_CAP};
pub use token::{TokenCounts, TokenKind, ALL_KINDS, GEM_KINDS};
