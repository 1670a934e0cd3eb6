//! Follower history persistence: the per-handle latest summary plus an
//! append-only list of timestamped snapshots.

use std::sync::Arc;

use async_trait::async_trait;
use followpulse_core::{FirebaseConfig, Handle, HistorySnapshot, LatestSummary};
use thiserror::Error;

pub mod chain;
pub mod firebase;
pub mod last_known;
pub mod memory;
pub mod recorder;

pub use chain::build_resolver;
pub use firebase::FirebaseStore;
pub use last_known::LastKnownSource;
pub use memory::MemoryStore;
pub use recorder::{RecordOutcome, Recorder};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid store URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl From<reqwest::Error> for StoreError {
    /// Request URLs carry the `auth=` token, so they are dropped here.
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

/// Backend holding each handle's latest summary and snapshot history.
///
/// Writes are not transactional: a snapshot append can succeed while the
/// following summary overwrite fails.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Short backend name reported by health checks.
    fn backend(&self) -> &'static str;

    /// The current summary for `handle`, `None` if it has never been recorded.
    async fn latest(&self, handle: &Handle) -> Result<Option<LatestSummary>, StoreError>;

    async fn append_snapshot(
        &self,
        handle: &Handle,
        snapshot: &HistorySnapshot,
    ) -> Result<(), StoreError>;

    /// Replaces the summary for `handle`. The history is left untouched.
    async fn put_latest(&self, handle: &Handle, summary: &LatestSummary) -> Result<(), StoreError>;

    /// Every snapshot for `handle`, oldest first.
    async fn history(&self, handle: &Handle) -> Result<Vec<HistorySnapshot>, StoreError>;
}

/// Opens the Firebase store when configured, otherwise a process-local one.
///
/// # Errors
///
/// Returns [`StoreError::Http`] if the Firebase HTTP client cannot be built,
/// or [`StoreError::InvalidUrl`] if the database URL does not parse.
pub fn open_store(
    firebase: Option<&FirebaseConfig>,
    timeout_secs: u64,
    user_agent: &str,
) -> Result<Arc<dyn HistoryStore>, StoreError> {
    match firebase {
        Some(config) => {
            let store = FirebaseStore::new(config, timeout_secs, user_agent)?;
            tracing::info!(database_url = %config.database_url, "using firebase history store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("FIREBASE_DATABASE_URL not set; history is kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
