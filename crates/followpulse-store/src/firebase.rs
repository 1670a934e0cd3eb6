//! Firebase Realtime Database backend over its REST API.
//!
//! Layout, one node per handle:
//!
//! ```text
//! users/<key>                 latest summary fields
//! users/<key>/history/<ts>    { followers, timestamp }
//! ```
//!
//! `<key>` is the handle with `.` replaced by `,` (the database forbids dots
//! in keys). `<ts>` is `YYYYMMDDTHHMMSSmmmZ`, so keys sort chronologically.
//! Two snapshots for one handle inside the same millisecond share a key and
//! the later write wins.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use followpulse_core::{FirebaseConfig, Handle, HistorySnapshot, LatestSummary};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{HistoryStore, StoreError};

pub struct FirebaseStore {
    client: Client,
    database_url: Url,
    auth_token: Option<String>,
}

impl FirebaseStore {
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidUrl`] if `database_url` is not an absolute
    /// URL, or [`StoreError::Http`] if the client cannot be built.
    pub fn new(
        config: &FirebaseConfig,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, StoreError> {
        let base = format!("{}/", config.database_url.trim_end_matches('/'));
        let database_url = Url::parse(&base).map_err(|e| StoreError::InvalidUrl {
            url: config.database_url.clone(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            database_url,
            auth_token: config.auth_token.clone(),
        })
    }

    fn node_url(&self, path: &str) -> Result<Url, StoreError> {
        let mut url = self
            .database_url
            .join(&format!("{path}.json"))
            .map_err(|e| StoreError::InvalidUrl {
                url: path.to_string(),
                reason: e.to_string(),
            })?;
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let response = self.client.get(self.node_url(path)?).send().await?;
        let body = ensure_success(response)?.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Decode {
            context: path.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl HistoryStore for FirebaseStore {
    fn backend(&self) -> &'static str {
        "firebase"
    }

    async fn latest(&self, handle: &Handle) -> Result<Option<LatestSummary>, StoreError> {
        let path = user_path(handle);
        let node: Value = self.get_json(&path).await?;
        // A node holding only `history` (summary write failed earlier) counts
        // as never recorded.
        if node.is_null() || node.get("lastUpdate").is_none() {
            return Ok(None);
        }
        serde_json::from_value(node)
            .map(Some)
            .map_err(|e| StoreError::Decode {
                context: path,
                source: e,
            })
    }

    async fn append_snapshot(
        &self,
        handle: &Handle,
        snapshot: &HistorySnapshot,
    ) -> Result<(), StoreError> {
        let path = format!(
            "{}/history/{}",
            user_path(handle),
            timestamp_key(snapshot.timestamp)
        );
        let response = self
            .client
            .put(self.node_url(&path)?)
            .json(snapshot)
            .send()
            .await?;
        ensure_success(response)?;
        Ok(())
    }

    async fn put_latest(&self, handle: &Handle, summary: &LatestSummary) -> Result<(), StoreError> {
        // PATCH merges into the node, so the `history` child survives.
        let response = self
            .client
            .patch(self.node_url(&user_path(handle))?)
            .json(summary)
            .send()
            .await?;
        ensure_success(response)?;
        Ok(())
    }

    async fn history(&self, handle: &Handle) -> Result<Vec<HistorySnapshot>, StoreError> {
        let path = format!("{}/history", user_path(handle));
        let nodes: Option<BTreeMap<String, HistorySnapshot>> = self.get_json(&path).await?;
        let mut history: Vec<HistorySnapshot> =
            nodes.map(|n| n.into_values().collect()).unwrap_or_default();
        history.sort_by_key(|s| s.timestamp);
        Ok(history)
    }
}

fn user_path(handle: &Handle) -> String {
    format!("users/{}", handle.as_str().replace('.', ","))
}

fn timestamp_key(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%S%3fZ").to_string()
}

fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut url = response.url().clone();
    // Drop `auth=` so tokens never reach logs.
    url.set_query(None);
    Err(StoreError::UnexpectedStatus {
        status: status.as_u16(),
        url: url.to_string(),
    })
}
