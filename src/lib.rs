//! Gem Duel - rules engine and session synchronization
//!
//! This crate implements the deterministic rules engine for a two-player
//! token-grid card game, plus the optimistic-concurrency sync client that
//! keeps two clients consistent against a versioned remote blob store.

pub mod board;
pub mod core;
pub mod error;
pub mod game;
pub mod sync;

pub use error::{GameError, Result};
