//! The remote session-store contract
//!
//! The store keeps one opaque blob plus a monotonic integer version per
//! session. The wire shapes here mirror the HTTP API exactly and must not
//! drift; [`SessionStore`] abstracts the transport so tests can run against
//! [`MemoryStore`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;

/// The fixed game type used in every store request
pub const GAME_TYPE: &str = "gemduel";

/// `GET ?action=status` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatus {
    pub status: String,
}

impl StoreStatus {
    pub fn is_operational(&self) -> bool {
        self.status == "operational"
    }
}

/// `POST ?action=create` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    pub game_type: String,
    pub state_blob: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// `POST ?action=create` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub session_id: String,
    pub version: u64,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// `GET ?action=load` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResponse {
    pub session_id: String,
    pub version: u64,
    pub state_blob: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// `POST ?action=update` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub session_id: String,
    pub game_type: String,
    pub state_blob: String,
    pub version: u64,
}

/// `POST ?action=update` success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub session_id: String,
    pub version: u64,
}

/// The store's authoritative state, carried inside a 409 conflict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentState {
    pub version: u64,
    pub state_blob: String,
}

/// 409 conflict response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictBody {
    pub current: CurrentState,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The session does not exist (HTTP 404). Fatal for the session.
    #[error("Session not found")]
    NotFound,

    /// Optimistic-concurrency rejection (HTTP 409) with the authoritative
    /// state attached
    #[error("Version conflict (authoritative version {})", current.version)]
    Conflict { current: CurrentState },

    /// Timeouts, connection failures, non-2xx statuses
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered something the contract does not allow
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Versioned blob store, one entry per session
///
/// Every method returns a `Send` future so sessions can live inside spawned
/// tasks.
pub trait SessionStore: Send + Sync + 'static {
    fn status(&self) -> impl Future<Output = Result<StoreStatus, StoreError>> + Send;

    fn create(
        &self,
        req: CreateRequest,
    ) -> impl Future<Output = Result<CreateResponse, StoreError>> + Send;

    fn load(
        &self,
        session_id: &str,
        game_type: &str,
    ) -> impl Future<Output = Result<LoadResponse, StoreError>> + Send;

    fn update(
        &self,
        req: UpdateRequest,
    ) -> impl Future<Output = Result<UpdateResponse, StoreError>> + Send;
}

impl<T: SessionStore> SessionStore for std::sync::Arc<T> {
    async fn status(&self) -> Result<StoreStatus, StoreError> {
        (**self).status().await
    }

    async fn create(&self, req: CreateRequest) -> Result<CreateResponse, StoreError> {
        (**self).create(req).await
    }

    async fn load(&self, session_id: &str, game_type: &str) -> Result<LoadResponse, StoreError> {
        (**self).load(session_id, game_type).await
    }

    async fn update(&self, req: UpdateRequest) -> Result<UpdateResponse, StoreError> {
        (**self).update(req).await
    }
}

/// In-memory store with the same optimistic-concurrency semantics as the
/// remote service. Backs the test suite and offline experiments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<FxHashMap<String, CurrentState>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a session, as if the remote store expired it
    pub fn evict(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(session_id);
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, FxHashMap<String, CurrentState>>, StoreError>
    {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Transport("store mutex poisoned".to_string()))
    }
}

impl SessionStore for MemoryStore {
    async fn status(&self) -> Result<StoreStatus, StoreError> {
        Ok(StoreStatus {
            status: "operational".to_string(),
        })
    }

    async fn create(&self, req: CreateRequest) -> Result<CreateResponse, StoreError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let session_id = format!("{}-mem-{}", req.game_type, n);
        let entry = CurrentState {
            version: 1,
            state_blob: req.state_blob,
        };
        self.lock()?.insert(session_id.clone(), entry);
        Ok(CreateResponse {
            session_id,
            version: 1,
            meta: req.meta,
        })
    }

    async fn load(&self, session_id: &str, _game_type: &str) -> Result<LoadResponse, StoreError> {
        let sessions = self.lock()?;
        let entry = sessions.get(session_id).ok_or(StoreError::NotFound)?;
        Ok(LoadResponse {
            session_id: session_id.to_string(),
            version: entry.version,
            state_blob: entry.state_blob.clone(),
            meta: serde_json::Value::Null,
        })
    }

    async fn update(&self, req: UpdateRequest) -> Result<UpdateResponse, StoreError> {
        let mut sessions = self.lock()?;
        let entry = sessions.get_mut(&req.session_id).ok_or(StoreError::NotFound)?;
        if req.version != entry.version {
            return Err(StoreError::Conflict {
                current: entry.clone(),
            });
        }
        entry.version += 1;
        entry.state_blob = req.state_blob;
        Ok(UpdateResponse {
            session_id: req.session_id,
            version: entry.version,
        })
    }
}
