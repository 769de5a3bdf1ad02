//! Append-only per-turn event log
//!
//! One pending record accumulates events for the player currently acting;
//! it is finalized into the history when the turn ends with at least one
//! event, and dropped silently when the turn produced none. The finalized
//! records ship inside the sync blob and feed the opponent catch-up summary.

use crate::board::Pos;
use crate::core::{CardId, CardLevel, RoyalId, Seat, TokenKind};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Where an awarded scroll came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollSource {
    /// Taken from the shared pool
    Pool,
    /// Pool was empty, stolen from the other player
    StolenFromOpponent,
    /// Pool empty and the other player had none; granted outright
    Granted,
}

/// One logged game event inside a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    TookTokens {
        positions: Vec<Pos>,
        kinds: Vec<TokenKind>,
    },
    SpentScroll {
        kind: TokenKind,
    },
    RefilledBoard {
        poured: u8,
    },
    Purchased {
        card: CardId,
        points: u8,
    },
    /// A blind deck reserve carries no card id; the opponent must not learn it
    Reserved {
        level: CardLevel,
        card: Option<CardId>,
    },
    WildPlaced {
        card: CardId,
        stack: TokenKind,
    },
    BonusToken {
        kind: TokenKind,
    },
    StoleToken {
        kind: TokenKind,
    },
    Discarded {
        kinds: Vec<TokenKind>,
    },
    RoyalTaken {
        royal: RoyalId,
    },
    ScrollAwarded {
        to: Seat,
        source: ScrollSource,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Pending,
    Final,
}

/// The events of one player turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub id: u64,
    pub seat: Seat,
    pub events: Vec<TurnEvent>,
    pub status: TurnStatus,
    pub started_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at_ms: Option<u64>,
}

/// Finalized turns plus at most one pending record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnHistory {
    pub turns: Vec<TurnRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<TurnRecord>,
    next_id: u64,
}

impl Default for TurnHistory {
    fn default() -> Self {
        TurnHistory {
            turns: Vec::new(),
            pending: None,
            next_id: 1,
        }
    }
}

impl TurnHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the pending record, opening one if needed
    pub fn record(&mut self, seat: Seat, event: TurnEvent) {
        let pending = self.pending.get_or_insert_with(|| {
            let record = TurnRecord {
                id: self.next_id,
                seat,
                events: Vec::new(),
                status: TurnStatus::Pending,
                started_at_ms: now_ms(),
                ended_at_ms: None,
            };
            self.next_id += 1;
            record
        });
        pending.events.push(event);
    }

    /// Finalize the pending record if it logged anything; drop it otherwise
    pub fn finalize_pending(&mut self) {
        if let Some(mut record) = self.pending.take() {
            if record.events.is_empty() {
                return;
            }
            record.status = TurnStatus::Final;
            record.ended_at_ms = Some(now_ms());
            self.turns.push(record);
        }
    }

    /// Highest finalized turn id, or 0 when none exist
    pub fn latest_final_id(&self) -> u64 {
        self.turns.last().map(|record| record.id).unwrap_or(0)
    }

    /// Finalized turns after `after_id` played by seats other than `viewer`
    pub fn turns_since(&self, after_id: u64, viewer: Seat) -> Vec<TurnRecord> {
        self.turns
            .iter()
            .filter(|record| record.id > after_id && record.seat != viewer)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pending_is_dropped() {
        let mut history = TurnHistory::new();
        history.record(Seat::One, TurnEvent::RefilledBoard { poured: 3 });
        history.pending.as_mut().unwrap().events.clear();
        history.finalize_pending();

        assert!(history.turns.is_empty());
        assert!(history.pending.is_none());
    }

    #[test]
    fn test_record_and_finalize() {
        let mut history = TurnHistory::new();
        history.record(
            Seat::One,
            TurnEvent::TookTokens {
                positions: vec![Pos::new(2, 2)],
                kinds: vec![TokenKind::Blue],
            },
        );
        history.record(Seat::One, TurnEvent::StoleToken { kind: TokenKind::Red });
        history.finalize_pending();

        assert_eq!(history.turns.len(), 1);
        let record = &history.turns[0];
        assert_eq!(record.id, 1);
        assert_eq!(record.events.len(), 2);
        assert_eq!(record.status, TurnStatus::Final);
        assert!(record.ended_at_ms.is_some());
    }

    #[test]
    fn test_turns_since_filters_by_viewer_and_boundary() {
        let mut history = TurnHistory::new();
        for (seat, kind) in [
            (Seat::One, TokenKind::Blue),
            (Seat::Two, TokenKind::Red),
            (Seat::One, TokenKind::Green),
            (Seat::Two, TokenKind::Pearl),
        ] {
            history.record(seat, TurnEvent::StoleToken { kind });
            history.finalize_pending();
        }

        // Viewer One wants opponent turns after turn 1: turns 2 and 4
        let catch_up = history.turns_since(1, Seat::One);
        assert_eq!(catch_up.len(), 2);
        assert!(catch_up.iter().all(|record| record.seat == Seat::Two));
        assert_eq!(history.latest_final_id(), 4);
    }
}
