//! Bounded optimistic-concurrency retry
//!
//! A push retries automatically on stale-version conflicts, re-reading the
//! authoritative version from each 409, up to a fixed bound. Only exhaustion
//! surfaces the conflict to the caller, carrying the last-seen authoritative
//! state so it can reconcile.

use crate::sync::store::{CurrentState, SessionStore, StoreError, UpdateRequest};

/// Retry bound for a single push
pub const MAX_PUSH_ATTEMPTS: u32 = 3;

/// Typed result of a bounded push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Accepted; the store's new version
    Ok { version: u64 },
    /// Every attempt conflicted; the caller should adopt this state
    Exhausted { current: CurrentState },
    /// A non-conflict failure ended the push early
    Transport { message: String },
}

/// Push `blob` with optimistic concurrency, retrying stale-version rejections
/// up to `max_attempts` times.
pub async fn push_with_retry<S: SessionStore>(
    store: &S,
    session_id: &str,
    game_type: &str,
    blob: &str,
    known_version: u64,
    max_attempts: u32,
) -> PushOutcome {
    let mut version = known_version;
    let mut last_current: Option<CurrentState> = None;

    for _ in 0..max_attempts {
        let result = store
            .update(UpdateRequest {
                session_id: session_id.to_string(),
                game_type: game_type.to_string(),
                state_blob: blob.to_string(),
                version,
            })
            .await;

        match result {
            Ok(resp) => return PushOutcome::Ok {
                version: resp.version,
            },
            Err(StoreError::Conflict { current }) => {
                version = current.version;
                last_current = Some(current);
            }
            Err(err) => {
                return PushOutcome::Transport {
                    message: err.to_string(),
                }
            }
        }
    }

    match last_current {
        Some(current) => PushOutcome::Exhausted { current },
        None => PushOutcome::Transport {
            message: "push given no attempts".to_string(),
        },
    }
}
