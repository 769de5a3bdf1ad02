//! HTTP transport for the session store

use crate::sync::store::{
    ConflictBody, CreateRequest, CreateResponse, LoadResponse, SessionStore, StoreError,
    StoreStatus, UpdateRequest, UpdateResponse,
};
use reqwest::StatusCode;

/// [`SessionStore`] speaking the `?action=` query-routed HTTP contract
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpStore {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn transport(err: reqwest::Error) -> StoreError {
        StoreError::Transport(err.to_string())
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, StoreError> {
        resp.json::<T>()
            .await
            .map_err(|err| StoreError::Protocol(err.to_string()))
    }
}

impl SessionStore for HttpStore {
    async fn status(&self) -> Result<StoreStatus, StoreError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("action", "status")])
            .send()
            .await
            .map_err(Self::transport)?;
        if !resp.status().is_success() {
            return Err(StoreError::Transport(format!(
                "status check failed: HTTP {}",
                resp.status()
            )));
        }
        Self::parse_json(resp).await
    }

    async fn create(&self, req: CreateRequest) -> Result<CreateResponse, StoreError> {
        let resp = self
            .client
            .post(&self.base_url)
            .query(&[("action", "create")])
            .json(&req)
            .send()
            .await
            .map_err(Self::transport)?;
        if !resp.status().is_success() {
            return Err(StoreError::Transport(format!(
                "create failed: HTTP {}",
                resp.status()
            )));
        }
        Self::parse_json(resp).await
    }

    async fn load(&self, session_id: &str, game_type: &str) -> Result<LoadResponse, StoreError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", "load"),
                ("session_id", session_id),
                ("game_type", game_type),
            ])
            .send()
            .await
            .map_err(Self::transport)?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound),
            status if status.is_success() => Self::parse_json(resp).await,
            status => Err(StoreError::Transport(format!(
                "load failed: HTTP {}",
                status
            ))),
        }
    }

    async fn update(&self, req: UpdateRequest) -> Result<UpdateResponse, StoreError> {
        let resp = self
            .client
            .post(&self.base_url)
            .query(&[("action", "update")])
            .json(&req)
            .send()
            .await
            .map_err(Self::transport)?;
        match resp.status() {
            StatusCode::CONFLICT => {
                let body: ConflictBody = Self::parse_json(resp).await?;
                Err(StoreError::Conflict {
                    current: body.current,
                })
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound),
            status if status.is_success() => Self::parse_json(resp).await,
            status => Err(StoreError::Transport(format!(
                "update failed: HTTP {}",
                status
            ))),
        }
    }
}
