//! State-blob codec and session-id namespacing
//!
//! The blob is the JSON snapshot shipped through the store: the full game
//! state, the turn context (crown watermarks included), and the turn
//! history. Older blobs without a history must still decode.

use crate::game::{Game, GameLogger, GameState, TurnContext, TurnHistory};
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};

/// Prefix namespacing every session id of this game
pub const SESSION_PREFIX: &str = "gemduel-";

/// Add the game-type prefix to an imported id. Idempotent.
pub fn with_session_prefix(id: &str) -> String {
    if id.starts_with(SESSION_PREFIX) {
        id.to_string()
    } else {
        format!("{}{}", SESSION_PREFIX, id)
    }
}

/// Strip the game-type prefix for a shareable short code. Idempotent.
pub fn strip_session_prefix(id: &str) -> &str {
    id.strip_prefix(SESSION_PREFIX).unwrap_or(id)
}

/// The serialized session snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBlob {
    pub state: GameState,
    #[serde(default)]
    pub turn: TurnContext,
    /// Missing in blobs from before the history shipped; treated as empty
    #[serde(default)]
    pub history: TurnHistory,
}

impl SessionBlob {
    pub fn from_game(game: &Game) -> Self {
        SessionBlob {
            state: game.state.clone(),
            turn: game.turn.clone(),
            history: game.history.clone(),
        }
    }

    /// Rebuild a [`Game`] from the snapshot. The logger is local-only state
    /// and starts fresh.
    pub fn into_game(self) -> Game {
        Game {
            state: self.state,
            turn: self.turn,
            history: self.history,
            logger: GameLogger::new(),
        }
    }

    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| GameError::SerializationError(err.to_string()))
    }

    pub fn decode(blob: &str) -> Result<Self> {
        serde_json::from_str(blob).map_err(|err| GameError::SerializationError(err.to_string()))
    }
}
