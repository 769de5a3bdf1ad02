//! Session synchronization over a versioned remote blob store

pub mod blob;
pub mod client;
pub mod http;
pub mod retry;
pub mod store;

pub use blob::{strip_session_prefix, with_session_prefix, SessionBlob, SESSION_PREFIX};
pub use client::{
    PollHandle, PollOutcome, SyncEvent, SyncSession, SyncStatus, DEFAULT_POLL_INTERVAL,
    DEGRADED_AFTER_FAILURES,
};
pub use http::HttpStore;
pub use retry::{push_with_retry, PushOutcome, MAX_PUSH_ATTEMPTS};
pub use store::{
    ConflictBody, CreateRequest, CreateResponse, CurrentState, LoadResponse, MemoryStore,
    SessionStore, StoreError, StoreStatus, UpdateRequest, UpdateResponse, GAME_TYPE,
};
