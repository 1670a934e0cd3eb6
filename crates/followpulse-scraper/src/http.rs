//! Shared HTTP plumbing for the source adapters.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::SourceError;

/// Builds a client with the per-call timeout every outbound request carries.
pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Maps non-2xx responses to typed errors and passes successes through.
pub(crate) fn ensure_success(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    let url = strip_query(response.url());

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(SourceError::RateLimited {
            url,
            retry_after_secs,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound { url });
    }

    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    Ok(response)
}

/// Reads the body as text before parsing so decode failures carry context.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: impl Into<String>,
) -> Result<T, SourceError> {
    let body = response.text().await?;
    serde_json::from_str::<T>(&body).map_err(|e| SourceError::Deserialize {
        context: context.into(),
        source: e,
    })
}

/// Joins `base` and `path` into a URL, rejecting bases that do not parse.
pub(crate) fn join_url(base: &str, path: &str) -> Result<reqwest::Url, SourceError> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    reqwest::Url::parse(&joined).map_err(|e| SourceError::InvalidUrl {
        url: joined.clone(),
        reason: e.to_string(),
    })
}

/// Query strings can carry credentials, so error messages only keep the path.
fn strip_query(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
