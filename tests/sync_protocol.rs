//! Synchronization protocol: create/join, push/poll, degradation, catch-up

use gem_duel::board::spiral_order;
use gem_duel::core::{Seat, TokenKind};
use gem_duel::game::Game;
use gem_duel::sync::{
    CreateRequest, CreateResponse, LoadResponse, MemoryStore, PollOutcome, PushOutcome,
    SessionStore, StoreError, StoreStatus, SyncEvent, SyncSession, SyncStatus, UpdateRequest,
    UpdateResponse, DEGRADED_AFTER_FAILURES,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

fn take_one_token(game: &mut Game) {
    let pos = spiral_order()
        .into_iter()
        .find(|&pos| {
            game.state
                .board
                .token_at(pos)
                .map(|kind| !kind.is_gold())
                .unwrap_or(false)
        })
        .expect("board has tokens");
    game.take_tokens(&[pos]).expect("take is legal");
}

fn drain(rx: &mut UnboundedReceiver<SyncEvent>) -> Vec<SyncEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_create_join_and_seat_assignment() {
    let store = Arc::new(MemoryStore::new());

    let (host, _host_rx) = SyncSession::create(store.clone(), Game::new(3)).await.unwrap();
    assert_eq!(host.local_seat(), Seat::One);
    assert_eq!(host.version().await, 1);
    assert!(host.session_id().starts_with("gemduel-"));

    // Joining by the short code works and lands on the other seat
    let code = host.share_code().to_string();
    assert!(!code.starts_with("gemduel-"));
    let (guest, _guest_rx) = SyncSession::join(store, &code).await.unwrap();
    assert_eq!(guest.local_seat(), Seat::Two);
    assert_eq!(guest.session_id(), host.session_id());
}

#[tokio::test]
async fn test_push_then_poll_applies_and_catches_up() {
    let store = Arc::new(MemoryStore::new());
    let (host, _host_rx) = SyncSession::create(store.clone(), Game::new(3)).await.unwrap();
    let (guest, mut guest_rx) = SyncSession::join(store, host.share_code()).await.unwrap();

    // Host plays a turn and pushes
    host.with_game(take_one_token).await;
    let outcome = host.push().await.unwrap();
    assert_eq!(outcome, PushOutcome::Ok { version: 2 });

    // Guest polls: the newer state replaces its local copy wholesale
    let polled = guest.poll_once().await.unwrap();
    assert_eq!(polled, PollOutcome::Applied { version: 2 });
    assert_eq!(guest.version().await, 2);

    // Seat pinning: the guest still renders seat Two as its own even though
    // the blob encodes the host's finished turn
    assert_eq!(guest.local_seat(), Seat::Two);
    let current = guest.with_game(|game| game.state.current).await;
    assert_eq!(current, Seat::Two);

    // It became the guest's turn, so the missed host turn arrives as catch-up
    let events = drain(&mut guest_rx);
    let catch_up = events.iter().find_map(|event| match event {
        SyncEvent::TurnCatchUp { turns } => Some(turns.clone()),
        _ => None,
    });
    let turns = catch_up.expect("catch-up emitted");
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].seat, Seat::One);

    // Stale and equal versions are ignored
    assert_eq!(guest.poll_once().await.unwrap(), PollOutcome::NoChange);

    // The boundary advanced: polling again must not replay the same turns
    let events = drain(&mut guest_rx);
    assert!(events
        .iter()
        .all(|event| !matches!(event, SyncEvent::TurnCatchUp { .. })));
}

#[tokio::test]
async fn test_stale_push_retries_invisibly() {
    let store = Arc::new(MemoryStore::new());
    let (host, _host_rx) = SyncSession::create(store.clone(), Game::new(3)).await.unwrap();
    let (guest, _guest_rx) = SyncSession::join(store, host.share_code()).await.unwrap();

    // Host pushes first; the guest's known version is now stale
    host.with_game(take_one_token).await;
    host.push().await.unwrap();

    // The guest's push conflicts once, retries with the authoritative
    // version, and lands. The conflict never surfaces.
    guest
        .with_game(|game| {
            game.state
                .player_mut(Seat::Two)
                .tokens
                .add_one(TokenKind::Pearl)
        })
        .await;
    let outcome = guest.push().await.unwrap();
    assert_eq!(outcome, PushOutcome::Ok { version: 3 });
    assert_eq!(guest.status().await, SyncStatus::Active);
}

#[tokio::test]
async fn test_poll_failures_degrade_then_recover() {
    /// Store whose loads can be switched to fail
    struct FlakyStore {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl SessionStore for FlakyStore {
        async fn status(&self) -> Result<StoreStatus, StoreError> {
            self.inner.status().await
        }
        async fn create(&self, req: CreateRequest) -> Result<CreateResponse, StoreError> {
            self.inner.create(req).await
        }
        async fn load(&self, id: &str, gt: &str) -> Result<LoadResponse, StoreError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Transport("connection reset".to_string()));
            }
            self.inner.load(id, gt).await
        }
        async fn update(&self, req: UpdateRequest) -> Result<UpdateResponse, StoreError> {
            self.inner.update(req).await
        }
    }

    let store = Arc::new(FlakyStore {
        inner: MemoryStore::new(),
        failing: AtomicBool::new(false),
    });
    let (session, mut rx) = SyncSession::create(store.clone(), Game::new(3)).await.unwrap();

    store.failing.store(true, Ordering::SeqCst);
    for _ in 0..DEGRADED_AFTER_FAILURES - 1 {
        assert_eq!(session.poll_once().await.unwrap(), PollOutcome::Failed);
        assert_eq!(session.status().await, SyncStatus::Active);
    }
    assert_eq!(session.poll_once().await.unwrap(), PollOutcome::Failed);
    assert_eq!(session.status().await, SyncStatus::Degraded);
    assert!(drain(&mut rx)
        .iter()
        .any(|event| matches!(event, SyncEvent::Degraded)));

    // Degraded keeps retrying; a success recovers
    store.failing.store(false, Ordering::SeqCst);
    assert_eq!(session.poll_once().await.unwrap(), PollOutcome::NoChange);
    assert_eq!(session.status().await, SyncStatus::Active);
    assert!(drain(&mut rx)
        .iter()
        .any(|event| matches!(event, SyncEvent::Recovered)));
}

#[tokio::test]
async fn test_missing_session_is_fatal() {
    let store = Arc::new(MemoryStore::new());
    let (session, mut rx) = SyncSession::create(store.clone(), Game::new(3)).await.unwrap();

    store.evict(session.session_id());
    assert!(session.poll_once().await.is_err());
    assert_eq!(session.status().await, SyncStatus::Offline);
    assert!(drain(&mut rx)
        .iter()
        .any(|event| matches!(event, SyncEvent::SessionLost)));
}

#[tokio::test(start_paused = true)]
async fn test_poller_stops_deterministically() {
    let store = Arc::new(MemoryStore::new());
    let (host, _host_rx) = SyncSession::create(store.clone(), Game::new(3)).await.unwrap();
    let (guest, _guest_rx) = SyncSession::join(store.clone(), host.share_code()).await.unwrap();

    let handle = guest.start_polling(Duration::from_millis(100));

    // Let a few ticks happen
    tokio::time::sleep(Duration::from_millis(350)).await;

    handle.stop().await;

    // After stop resolves, a fresh remote version must never be picked up
    host.with_game(take_one_token).await;
    host.push().await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(guest.version().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_poller_applies_remote_updates() {
    let store = Arc::new(MemoryStore::new());
    let (host, _host_rx) = SyncSession::create(store.clone(), Game::new(3)).await.unwrap();
    let (guest, _guest_rx) = SyncSession::join(store.clone(), host.share_code()).await.unwrap();

    let handle = guest.start_polling(Duration::from_millis(100));

    host.with_game(take_one_token).await;
    host.push().await.unwrap();

    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(guest.version().await, 2);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_poller_halts_on_lost_session() {
    let store = Arc::new(MemoryStore::new());
    let (session, _rx) = SyncSession::create(store.clone(), Game::new(3)).await.unwrap();

    let handle = session.start_polling(Duration::from_millis(100));
    store.evict(session.session_id());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(handle.is_finished());
    assert_eq!(session.status().await, SyncStatus::Offline);
}
