//! The synchronization session
//!
//! Two clients share one stored session. The local client plays through
//! [`SyncSession::with_game`], pushes when its turn ends, and polls for the
//! opponent's pushes. Remote state is applied only when strictly newer, as a
//! wholesale replacement, and never flips which seat the local client owns.
//! Local play never blocks on the network: pushes are best-effort and
//! failures only degrade the session.

use crate::core::Seat;
use crate::game::{Game, TurnRecord};
use crate::sync::blob::{strip_session_prefix, with_session_prefix, SessionBlob};
use crate::sync::retry::{push_with_retry, PushOutcome, MAX_PUSH_ATTEMPTS};
use crate::sync::store::{CreateRequest, SessionStore, StoreError, GAME_TYPE};
use crate::{GameError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Consecutive poll failures before the session is marked degraded
pub const DEGRADED_AFTER_FAILURES: u32 = 3;

/// Default polling cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Healthy; pushes and polls are landing
    Active,
    /// Errors are piling up; keeps retrying
    Degraded,
    /// The session is gone from the store; polling stopped, local play only
    Offline,
}

/// Notifications emitted to subscribers
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A strictly newer remote state replaced the local one
    RemoteApplied { version: u64 },
    /// It became the local player's turn; these opponent turns were missed
    TurnCatchUp { turns: Vec<TurnRecord> },
    Degraded,
    Recovered,
    SessionLost,
}

/// Result of one poll tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Applied { version: u64 },
    NoChange,
    Failed,
}

#[derive(Debug)]
struct SyncState {
    version: u64,
    status: SyncStatus,
    consecutive_failures: u32,
    /// Last turn id whose events the local client has seen or played
    last_acked_turn: u64,
}

struct SyncInner<S> {
    store: S,
    session_id: String,
    local_seat: Seat,
    /// The single serialization point for "apply remote" vs "local action"
    game: Mutex<Game>,
    sync: Mutex<SyncState>,
    events: mpsc::UnboundedSender<SyncEvent>,
}

/// Handle to a live synchronized session. Cheap to clone.
pub struct SyncSession<S: SessionStore> {
    inner: Arc<SyncInner<S>>,
}

impl<S: SessionStore> Clone for SyncSession<S> {
    fn clone(&self) -> Self {
        SyncSession {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: SessionStore> SyncSession<S> {
    /// Create a new stored session from a local game. The creating client
    /// owns the game's host seat.
    pub async fn create(
        store: S,
        game: Game,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SyncEvent>)> {
        let local_seat = game.state.assignment.host;
        let blob = SessionBlob::from_game(&game).encode()?;
        let resp = store
            .create(CreateRequest {
                game_type: GAME_TYPE.to_string(),
                state_blob: blob,
                meta: serde_json::Value::Null,
            })
            .await
            .map_err(GameError::StoreError)?;

        let last_acked = game.history.latest_final_id();
        Ok(Self::assemble(
            store,
            with_session_prefix(&resp.session_id),
            local_seat,
            game,
            resp.version,
            last_acked,
        ))
    }

    /// Join an existing session by id (short code or full id). The joining
    /// client takes the seat the host does not own.
    pub async fn join(
        store: S,
        session_id: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SyncEvent>)> {
        let session_id = with_session_prefix(session_id);
        let resp = store
            .load(&session_id, GAME_TYPE)
            .await
            .map_err(GameError::StoreError)?;

        let game = SessionBlob::decode(&resp.state_blob)?.into_game();
        let local_seat = game.state.assignment.host.opponent();
        let last_acked = game.history.latest_final_id();
        Ok(Self::assemble(
            store,
            session_id,
            local_seat,
            game,
            resp.version,
            last_acked,
        ))
    }

    fn assemble(
        store: S,
        session_id: String,
        local_seat: Seat,
        game: Game,
        version: u64,
        last_acked_turn: u64,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let session = SyncSession {
            inner: Arc::new(SyncInner {
                store,
                session_id,
                local_seat,
                game: Mutex::new(game),
                sync: Mutex::new(SyncState {
                    version,
                    status: SyncStatus::Active,
                    consecutive_failures: 0,
                    last_acked_turn,
                }),
                events,
            }),
        };
        (session, receiver)
    }

    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// Shareable short code (session id without the game-type prefix)
    pub fn share_code(&self) -> &str {
        strip_session_prefix(&self.inner.session_id)
    }

    pub fn local_seat(&self) -> Seat {
        self.inner.local_seat
    }

    pub async fn status(&self) -> SyncStatus {
        self.inner.sync.lock().await.status
    }

    pub async fn version(&self) -> u64 {
        self.inner.sync.lock().await.version
    }

    /// Run a local action (or any read) against the game, serialized with
    /// remote applies
    pub async fn with_game<R>(&self, f: impl FnOnce(&mut Game) -> R) -> R {
        let mut game = self.inner.game.lock().await;
        f(&mut game)
    }

    fn emit(&self, event: SyncEvent) {
        let _ = self.inner.events.send(event);
    }

    /// Push the local state. Conflicts retry up to the bound; exhaustion
    /// adopts the authoritative remote state (the local push is discarded).
    /// Other failures degrade the session without blocking local play.
    pub async fn push(&self) -> Result<PushOutcome> {
        let blob = {
            let game = self.inner.game.lock().await;
            SessionBlob::from_game(&game).encode()?
        };
        let known_version = self.inner.sync.lock().await.version;

        let outcome = push_with_retry(
            &self.inner.store,
            &self.inner.session_id,
            GAME_TYPE,
            &blob,
            known_version,
            MAX_PUSH_ATTEMPTS,
        )
        .await;

        match &outcome {
            PushOutcome::Ok { version } => {
                let acked = {
                    let game = self.inner.game.lock().await;
                    game.history.latest_final_id()
                };
                let mut sync = self.inner.sync.lock().await;
                sync.version = *version;
                sync.last_acked_turn = acked;
                self.note_success(&mut sync);
            }
            PushOutcome::Exhausted { current } => {
                // Remote truth wins; drop the local pending push
                self.apply_remote(&current.state_blob, current.version).await?;
            }
            PushOutcome::Transport { .. } => {
                let mut sync = self.inner.sync.lock().await;
                if sync.status == SyncStatus::Active {
                    sync.status = SyncStatus::Degraded;
                    self.emit(SyncEvent::Degraded);
                }
            }
        }
        Ok(outcome)
    }

    /// One poll against the store. Applies a strictly newer blob, ignores
    /// stale or equal versions, counts failures toward degradation. A
    /// missing session is fatal: the status flips to Offline and the error
    /// propagates so the poll loop stops.
    pub async fn poll_once(&self) -> Result<PollOutcome> {
        let loaded = self
            .inner
            .store
            .load(&self.inner.session_id, GAME_TYPE)
            .await;

        match loaded {
            Ok(resp) => {
                let known_version = self.inner.sync.lock().await.version;
                if resp.version <= known_version {
                    let mut sync = self.inner.sync.lock().await;
                    self.note_success(&mut sync);
                    return Ok(PollOutcome::NoChange);
                }
                match self.apply_remote(&resp.state_blob, resp.version).await {
                    Ok(()) => Ok(PollOutcome::Applied {
                        version: resp.version,
                    }),
                    Err(_) => {
                        // Undecodable blob: no partial apply, count the failure
                        let mut sync = self.inner.sync.lock().await;
                        self.note_failure(&mut sync);
                        Ok(PollOutcome::Failed)
                    }
                }
            }
            Err(StoreError::NotFound) => {
                {
                    let mut sync = self.inner.sync.lock().await;
                    sync.status = SyncStatus::Offline;
                }
                self.emit(SyncEvent::SessionLost);
                Err(GameError::StoreError(StoreError::NotFound))
            }
            Err(_) => {
                let mut sync = self.inner.sync.lock().await;
                self.note_failure(&mut sync);
                Ok(PollOutcome::Failed)
            }
        }
    }

    /// Replace the local game with a decoded remote blob, all-or-nothing.
    /// The local seat stays pinned regardless of whose turn the blob
    /// encodes; when it is now the local player's turn, unseen opponent
    /// turns are emitted as a catch-up summary and the boundary advances.
    async fn apply_remote(&self, blob: &str, version: u64) -> Result<()> {
        // Decode before touching anything so a bad blob changes no state
        let decoded = SessionBlob::decode(blob)?;

        let catch_up = {
            let mut game = self.inner.game.lock().await;
            *game = decoded.into_game();
            if game.state.current == self.inner.local_seat {
                let acked = self.inner.sync.lock().await.last_acked_turn;
                game.history.turns_since(acked, self.inner.local_seat)
            } else {
                Vec::new()
            }
        };

        let mut sync = self.inner.sync.lock().await;
        sync.version = version;
        if let Some(latest) = catch_up.iter().map(|record| record.id).max() {
            sync.last_acked_turn = latest;
        }
        self.note_success(&mut sync);
        drop(sync);

        if !catch_up.is_empty() {
            self.emit(SyncEvent::TurnCatchUp { turns: catch_up });
        }
        self.emit(SyncEvent::RemoteApplied { version });
        Ok(())
    }

    fn note_success(&self, sync: &mut SyncState) {
        sync.consecutive_failures = 0;
        if sync.status == SyncStatus::Degraded {
            sync.status = SyncStatus::Active;
            self.emit(SyncEvent::Recovered);
        }
    }

    fn note_failure(&self, sync: &mut SyncState) {
        sync.consecutive_failures += 1;
        if sync.consecutive_failures >= DEGRADED_AFTER_FAILURES
            && sync.status == SyncStatus::Active
        {
            sync.status = SyncStatus::Degraded;
            self.emit(SyncEvent::Degraded);
        }
    }

    /// Spawn the background poller. The returned handle stops it
    /// deterministically: after [`PollHandle::stop`] resolves, no further
    /// tick runs.
    pub fn start_polling(&self, interval: Duration) -> PollHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let session = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        // A fatal load error (404) ends the loop
                        if session.poll_once().await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
        PollHandle {
            stop: stop_tx,
            handle,
        }
    }
}

/// Cancellation handle for the background poller
pub struct PollHandle {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling and wait for the loop to wind down
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
