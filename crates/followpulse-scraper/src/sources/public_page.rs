//! The platform's own public surfaces: the `web_profile_info` JSON endpoint
//! the web app uses, then the HTML profile page.

use async_trait::async_trait;
use followpulse_core::{Handle, ProfileRecord, SourceKind};
use reqwest::Client;
use serde_json::Value;

use crate::counts::{count_at, string_at};
use crate::error::SourceError;
use crate::extract::{default_extractors, extract_first, CountExtractor, PageDocument};
use crate::http::{build_client, ensure_success, join_url, read_json};
use crate::source::ProfileSource;

/// App id the public web client sends; the JSON endpoint rejects requests
/// without it.
const WEB_APP_ID: &str = "936619743392459";

pub struct PublicPageSource {
    client: Client,
    base_url: String,
    extractors: Vec<Box<dyn CountExtractor>>,
}

impl PublicPageSource {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: base_url.to_string(),
            extractors: default_extractors(),
        })
    }

    async fn from_profile_api(&self, handle: &Handle) -> Result<ProfileRecord, SourceError> {
        let mut url = join_url(&self.base_url, "api/v1/users/web_profile_info/")?;
        url.query_pairs_mut().append_pair("username", handle.as_str());
        let response = self
            .client
            .get(url)
            .header("x-ig-app-id", WEB_APP_ID)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let body: Value = read_json(
            ensure_success(response)?,
            format!("web_profile_info for {handle}"),
        )
        .await?;

        let followers = count_at(&body, &["/data/user/edge_followed_by/count"])
            .ok_or_else(|| SourceError::no_data(self.name(), handle))?;

        let mut profile = ProfileRecord::new(handle.clone(), SourceKind::Live, "public-api");
        profile.follower_count = followers;
        profile.following_count = count_at(&body, &["/data/user/edge_follow/count"]).unwrap_or(0);
        profile.display_name = string_at(&body, &["/data/user/full_name"]).unwrap_or_default();
        profile.biography = string_at(&body, &["/data/user/biography"]).unwrap_or_default();
        profile.avatar_url = string_at(
            &body,
            &["/data/user/profile_pic_url_hd", "/data/user/profile_pic_url"],
        )
        .unwrap_or_default();
        Ok(profile)
    }

    async fn from_profile_page(&self, handle: &Handle) -> Result<ProfileRecord, SourceError> {
        let url = join_url(&self.base_url, &format!("{handle}/"))?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html")
            .send()
            .await?;
        let html = ensure_success(response)?.text().await?;
        let doc = PageDocument::parse(html);

        let (extractor, found) = extract_first(&self.extractors, &doc)
            .ok_or_else(|| SourceError::no_data(self.name(), handle))?;

        let mut profile = ProfileRecord::new(
            handle.clone(),
            SourceKind::Live,
            format!("public-page:{extractor}"),
        );
        profile.follower_count = found.followers;
        profile.following_count = found.following;
        profile.display_name = found.full_name.unwrap_or_default();
        profile.biography = found.biography.unwrap_or_default();
        profile.avatar_url = found.profile_pic_url.unwrap_or_default();
        Ok(profile)
    }
}

#[async_trait]
impl ProfileSource for PublicPageSource {
    fn name(&self) -> &'static str {
        "public-page"
    }

    async fn attempt(&self, handle: &Handle) -> Result<ProfileRecord, SourceError> {
        match self.from_profile_api(handle).await {
            Ok(profile) => return Ok(profile),
            Err(e) => {
                tracing::debug!(handle = %handle, error = %e, "web_profile_info unavailable, trying profile page");
            }
        }
        self.from_profile_page(handle).await
    }
}
