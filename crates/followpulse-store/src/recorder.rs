//! Read-previous / append / overwrite, with persistence failures absorbed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use followpulse_core::{Handle, HistorySnapshot, LatestSummary, ProfileRecord};

use crate::HistoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Follower count of the summary that was replaced; 0 when there was
    /// none or the store could not be read.
    pub previous_follower_count: u64,
    /// Whether both the snapshot and the summary were written.
    pub persisted: bool,
}

#[derive(Clone)]
pub struct Recorder {
    store: Arc<dyn HistoryStore>,
}

impl Recorder {
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Records `profile` at the current time.
    pub async fn record(&self, handle: &Handle, profile: &ProfileRecord) -> RecordOutcome {
        self.record_at(handle, profile, Utc::now()).await
    }

    /// Records `profile` as observed at `at`.
    ///
    /// Never fails: a store error is logged and reported through
    /// [`RecordOutcome::persisted`]. If the previous summary cannot be read,
    /// nothing is written.
    pub async fn record_at(
        &self,
        handle: &Handle,
        profile: &ProfileRecord,
        at: DateTime<Utc>,
    ) -> RecordOutcome {
        let previous_follower_count = match self.store.latest(handle).await {
            Ok(latest) => latest.map_or(0, |s| s.current_followers),
            Err(e) => {
                tracing::warn!(
                    handle = %handle,
                    backend = self.store.backend(),
                    error = %e,
                    "failed to read latest summary; skipping history write"
                );
                return RecordOutcome {
                    previous_follower_count: 0,
                    persisted: false,
                };
            }
        };

        let snapshot = HistorySnapshot {
            followers: profile.follower_count,
            timestamp: at,
        };
        if let Err(e) = self.store.append_snapshot(handle, &snapshot).await {
            tracing::warn!(
                handle = %handle,
                backend = self.store.backend(),
                error = %e,
                "failed to append history snapshot"
            );
            return RecordOutcome {
                previous_follower_count: 0,
                persisted: false,
            };
        }

        let summary = LatestSummary::new(profile.clone(), at);
        if let Err(e) = self.store.put_latest(handle, &summary).await {
            tracing::warn!(
                handle = %handle,
                backend = self.store.backend(),
                error = %e,
                "failed to overwrite latest summary"
            );
            return RecordOutcome {
                previous_follower_count: 0,
                persisted: false,
            };
        }

        tracing::debug!(
            handle = %handle,
            previous = previous_follower_count,
            current = profile.follower_count,
            "recorded follower snapshot"
        );
        RecordOutcome {
            previous_follower_count,
            persisted: true,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }
}
