//! Error types for Gem Duel

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Card not found: {0}")]
    CardNotFound(u32),

    #[error("Royal card not found: {0}")]
    RoyalNotFound(u32),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Store error: {0}")]
    StoreError(#[from] crate::sync::StoreError),
}

pub type Result<T> = std::result::Result<T, GameError>;
