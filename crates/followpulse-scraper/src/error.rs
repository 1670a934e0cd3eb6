use followpulse_core::Handle;
use thiserror::Error;

/// A single profile source could not produce data. Always recovered by
/// moving on to the next source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("scrape job {run_id} finished with status {status}")]
    JobFailed { run_id: String, status: String },

    #[error("scrape job {run_id} still unfinished after {attempts} polls")]
    JobTimedOut { run_id: String, attempts: u32 },

    #[error("{source_name} returned no usable follower count for {handle}")]
    NoUsableData {
        source_name: &'static str,
        handle: String,
    },

    #[error("{source_name} lookup failed: {error}")]
    Lookup {
        source_name: &'static str,
        #[source]
        error: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SourceError {
    #[must_use]
    pub fn no_data(source_name: &'static str, handle: &Handle) -> Self {
        Self::NoUsableData {
            source_name,
            handle: handle.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Could not fetch Instagram profile for {handle} ({attempted} sources tried)")]
    ProfileNotFound { handle: Handle, attempted: usize },
}
