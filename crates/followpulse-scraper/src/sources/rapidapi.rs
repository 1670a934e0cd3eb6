//! Direct REST provider reached through RapidAPI.
//!
//! The providers behind a RapidAPI host have changed their routes and
//! payloads more than once, so each known response shape is described as
//! data ([`ResponseShape`]) and tried in order. A shape whose request fails
//! or whose payload lacks a positive follower count just moves the lookup on
//! to the next shape.

use async_trait::async_trait;
use followpulse_core::{Handle, ProfileRecord, RapidApiConfig, SourceKind};
use reqwest::Client;
use serde_json::Value;

use crate::counts::{count_at, string_at};
use crate::error::SourceError;
use crate::http::{build_client, ensure_success, join_url, read_json};
use crate::source::ProfileSource;

/// One request route plus where each field lives in its JSON response
/// (JSON Pointer paths, first match wins).
#[derive(Debug, Clone, Copy)]
pub struct ResponseShape {
    pub name: &'static str,
    pub path: &'static str,
    pub query_param: &'static str,
    pub followers: &'static [&'static str],
    pub following: &'static [&'static str],
    pub full_name: &'static [&'static str],
    pub biography: &'static [&'static str],
    pub profile_pic_url: &'static [&'static str],
}

pub const DEFAULT_RESPONSE_SHAPES: &[ResponseShape] = &[
    ResponseShape {
        name: "v1-info",
        path: "v1/info",
        query_param: "username_or_id_or_url",
        followers: &["/data/follower_count", "/data/edge_followed_by/count"],
        following: &["/data/following_count", "/data/edge_follow/count"],
        full_name: &["/data/full_name"],
        biography: &["/data/biography"],
        profile_pic_url: &["/data/profile_pic_url_hd", "/data/profile_pic_url"],
    },
    ResponseShape {
        name: "profile",
        path: "profile",
        query_param: "username",
        followers: &["/followers", "/follower_count", "/edge_followed_by/count"],
        following: &["/following", "/following_count", "/edge_follow/count"],
        full_name: &["/full_name", "/fullName"],
        biography: &["/biography", "/bio"],
        profile_pic_url: &["/profile_pic_url_hd", "/profile_pic_url", "/profilePicUrl"],
    },
    ResponseShape {
        name: "user-info",
        path: "user/info",
        query_param: "username",
        followers: &[
            "/data/user/edge_followed_by/count",
            "/user/follower_count",
            "/user/edge_followed_by/count",
        ],
        following: &[
            "/data/user/edge_follow/count",
            "/user/following_count",
            "/user/edge_follow/count",
        ],
        full_name: &["/data/user/full_name", "/user/full_name"],
        biography: &["/data/user/biography", "/user/biography"],
        profile_pic_url: &[
            "/data/user/profile_pic_url_hd",
            "/user/profile_pic_url_hd",
            "/user/profile_pic_url",
        ],
    },
];

pub struct RapidApiSource {
    client: Client,
    api_key: String,
    host: String,
    base_url: String,
    shapes: Vec<ResponseShape>,
}

impl RapidApiSource {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(
        config: &RapidApiConfig,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            api_key: config.api_key.clone(),
            host: config.host.clone(),
            base_url: config.base_url.clone(),
            shapes: DEFAULT_RESPONSE_SHAPES.to_vec(),
        })
    }

    /// Replaces the shape list, e.g. for a provider with different routes.
    #[must_use]
    pub fn with_shapes(mut self, shapes: Vec<ResponseShape>) -> Self {
        self.shapes = shapes;
        self
    }

    async fn fetch_shape(&self, shape: &ResponseShape, handle: &Handle) -> Result<Value, SourceError> {
        let mut url = join_url(&self.base_url, shape.path)?;
        url.query_pairs_mut()
            .append_pair(shape.query_param, handle.as_str());
        let response = self
            .client
            .get(url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        read_json(
            ensure_success(response)?,
            format!("rapidapi {} response for {handle}", shape.name),
        )
        .await
    }
}

/// Builds a record from `body` if the shape yields a positive follower count.
fn profile_from_shape(
    shape: &ResponseShape,
    body: &Value,
    handle: &Handle,
    source_name: &'static str,
) -> Option<ProfileRecord> {
    let followers = count_at(body, shape.followers)?;
    let mut profile = ProfileRecord::new(handle.clone(), SourceKind::Live, source_name);
    profile.follower_count = followers;
    profile.following_count = count_at(body, shape.following).unwrap_or(0);
    profile.display_name = string_at(body, shape.full_name).unwrap_or_default();
    profile.biography = string_at(body, shape.biography).unwrap_or_default();
    profile.avatar_url = string_at(body, shape.profile_pic_url).unwrap_or_default();
    Some(profile)
}

#[async_trait]
impl ProfileSource for RapidApiSource {
    fn name(&self) -> &'static str {
        "rapidapi"
    }

    async fn attempt(&self, handle: &Handle) -> Result<ProfileRecord, SourceError> {
        let mut last_error = None;

        for shape in &self.shapes {
            match self.fetch_shape(shape, handle).await {
                Ok(body) => {
                    if let Some(profile) = profile_from_shape(shape, &body, handle, self.name()) {
                        tracing::debug!(handle = %handle, shape = shape.name, "rapidapi shape matched");
                        return Ok(profile);
                    }
                    tracing::debug!(handle = %handle, shape = shape.name, "rapidapi shape had no follower count");
                }
                Err(e) => {
                    tracing::debug!(handle = %handle, shape = shape.name, error = %e, "rapidapi shape failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SourceError::no_data(self.name(), handle)))
    }
}
