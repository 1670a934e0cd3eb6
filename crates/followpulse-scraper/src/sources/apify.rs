//! Job-based scraping provider (Apify actor runs).
//!
//! A lookup is a submit / poll / fetch-result cycle:
//!
//! 1. `POST /v2/acts/{actor}/runs` with the username starts a run.
//! 2. `GET /v2/actor-runs/{id}` is polled at a fixed interval until the run
//!    reaches a terminal state or the poll budget runs out.
//! 3. On `SUCCEEDED`, the first item of the run's default dataset holds the
//!    profile.

use std::time::Duration;

use async_trait::async_trait;
use followpulse_core::{ApifyConfig, Handle, ProfileRecord, SourceKind};
use reqwest::Client;
use serde::Deserialize;

use crate::error::SourceError;
use crate::http::{build_client, ensure_success, join_url, read_json};
use crate::source::ProfileSource;

#[derive(Debug, Deserialize)]
struct RunEnvelope {
    data: RunInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunInfo {
    id: String,
    status: String,
    default_dataset_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileItem {
    followers_count: Option<i64>,
    follows_count: Option<i64>,
    full_name: Option<String>,
    biography: Option<String>,
    #[serde(rename = "profilePicUrlHD")]
    profile_pic_url_hd: Option<String>,
    profile_pic_url: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum RunState {
    Succeeded,
    Failed,
    Pending,
}

impl RunState {
    fn from_status(status: &str) -> Self {
        match status {
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" | "ABORTED" | "TIMED-OUT" | "TIMED_OUT" => Self::Failed,
            // READY, RUNNING, ABORTING, TIMING-OUT
            _ => Self::Pending,
        }
    }
}

pub struct ApifySource {
    client: Client,
    api_token: String,
    actor_id: String,
    base_url: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl ApifySource {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ApifyConfig, timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            api_token: config.api_token.clone(),
            actor_id: config.actor_id.clone(),
            base_url: config.base_url.clone(),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            max_poll_attempts: config.max_poll_attempts,
        })
    }

    /// Overrides the configured poll interval (tests poll in milliseconds).
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    async fn start_run(&self, handle: &Handle) -> Result<RunInfo, SourceError> {
        let url = join_url(&self.base_url, &format!("v2/acts/{}/runs", self.actor_id))?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&serde_json::json!({
                "usernames": [handle.as_str()],
                "resultsLimit": 1,
            }))
            .send()
            .await?;
        let envelope: RunEnvelope =
            read_json(ensure_success(response)?, format!("apify run start for {handle}")).await?;
        Ok(envelope.data)
    }

    async fn get_run(&self, run_id: &str) -> Result<RunInfo, SourceError> {
        let url = join_url(&self.base_url, &format!("v2/actor-runs/{run_id}"))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        let envelope: RunEnvelope =
            read_json(ensure_success(response)?, format!("apify run {run_id}")).await?;
        Ok(envelope.data)
    }

    /// Polls until the run is terminal. Polling stops after
    /// `max_poll_attempts` status checks, which bounds the wall-clock wait to
    /// roughly `max_poll_attempts * poll_interval`.
    async fn wait_for_run(&self, mut run: RunInfo) -> Result<RunInfo, SourceError> {
        let mut polls = 0u32;
        loop {
            match RunState::from_status(&run.status) {
                RunState::Succeeded => return Ok(run),
                RunState::Failed => {
                    return Err(SourceError::JobFailed {
                        run_id: run.id,
                        status: run.status,
                    })
                }
                RunState::Pending => {}
            }

            if polls >= self.max_poll_attempts {
                return Err(SourceError::JobTimedOut {
                    run_id: run.id,
                    attempts: polls,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
            run = self.get_run(&run.id).await?;
            polls += 1;
            tracing::debug!(run_id = %run.id, status = %run.status, polls, "polled apify run");
        }
    }

    async fn first_item(&self, run: &RunInfo) -> Result<Option<ProfileItem>, SourceError> {
        let Some(dataset_id) = run.default_dataset_id.as_deref() else {
            return Ok(None);
        };
        let mut url = join_url(&self.base_url, &format!("v2/datasets/{dataset_id}/items"))?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("clean", "true")
            .append_pair("limit", "1");
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        let items: Vec<ProfileItem> =
            read_json(ensure_success(response)?, format!("apify dataset {dataset_id}")).await?;
        Ok(items.into_iter().next())
    }
}

#[async_trait]
impl ProfileSource for ApifySource {
    fn name(&self) -> &'static str {
        "apify"
    }

    async fn attempt(&self, handle: &Handle) -> Result<ProfileRecord, SourceError> {
        let run = self.start_run(handle).await?;
        tracing::debug!(handle = %handle, run_id = %run.id, "started apify run");
        let run = self.wait_for_run(run).await?;

        let item = self
            .first_item(&run)
            .await?
            .ok_or_else(|| SourceError::no_data(self.name(), handle))?;
        let followers = item
            .followers_count
            .and_then(|n| u64::try_from(n).ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| SourceError::no_data(self.name(), handle))?;

        let mut profile = ProfileRecord::new(handle.clone(), SourceKind::Live, self.name());
        profile.follower_count = followers;
        profile.following_count = item
            .follows_count
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);
        profile.display_name = item.full_name.unwrap_or_default();
        profile.biography = item.biography.unwrap_or_default();
        profile.avatar_url = item
            .profile_pic_url_hd
            .or(item.profile_pic_url)
            .unwrap_or_default();
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_state_classifies_terminal_statuses() {
        assert_eq!(RunState::from_status("SUCCEEDED"), RunState::Succeeded);
        assert_eq!(RunState::from_status("FAILED"), RunState::Failed);
        assert_eq!(RunState::from_status("ABORTED"), RunState::Failed);
        assert_eq!(RunState::from_status("TIMED-OUT"), RunState::Failed);
        assert_eq!(RunState::from_status("RUNNING"), RunState::Pending);
        assert_eq!(RunState::from_status("READY"), RunState::Pending);
    }

    #[test]
    fn profile_item_tolerates_missing_fields() {
        let item: ProfileItem = serde_json::from_str(r#"{"followersCount": 10}"#).unwrap();
        assert_eq!(item.followers_count, Some(10));
        assert!(item.full_name.is_none());
    }
}
