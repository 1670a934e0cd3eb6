use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::handle::Handle;

/// Which class of data source produced a [`ProfileRecord`].
///
/// Used for disclosure in the UI, never for correctness decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    #[default]
    Live,
    CachedFallback,
    SyntheticDemo,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Live => write!(f, "live"),
            SourceKind::CachedFallback => write!(f, "cached-fallback"),
            SourceKind::SyntheticDemo => write!(f, "synthetic-demo"),
        }
    }
}

/// A normalized profile as produced by one resolution.
///
/// Counts are never negative. A count of zero is ambiguous: it can mean the
/// account really has no followers, or that the source returned the field
/// empty. Nothing downstream tries to tell the two apart.
///
/// Wire names follow the dashboard's JSON (`username`, `followers`,
/// `fullName`, `profilePicUrl`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(rename = "username")]
    pub handle: Handle,
    #[serde(rename = "followers", default)]
    pub follower_count: u64,
    #[serde(rename = "following", default)]
    pub following_count: u64,
    #[serde(rename = "fullName", default)]
    pub display_name: String,
    #[serde(default)]
    pub biography: String,
    #[serde(rename = "profilePicUrl", default)]
    pub avatar_url: String,
    #[serde(default)]
    pub source_kind: SourceKind,
    /// Short name of the adapter that produced the record, e.g. `"rapidapi"`.
    #[serde(default)]
    pub source: String,
}

impl ProfileRecord {
    /// An empty record for `handle`; callers fill in what their source knows.
    #[must_use]
    pub fn new(handle: Handle, source_kind: SourceKind, source: impl Into<String>) -> Self {
        Self {
            handle,
            follower_count: 0,
            following_count: 0,
            display_name: String::new(),
            biography: String::new(),
            avatar_url: String::new(),
            source_kind,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.source_kind == SourceKind::SyntheticDemo
    }
}

/// One immutable history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub followers: u64,
    pub timestamp: DateTime<Utc>,
}

/// The per-handle "latest" document, overwritten on every record.
///
/// The profile fields are flattened next to `lastUpdate` and
/// `currentFollowers`, which is the shape the dashboard's store already uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSummary {
    #[serde(flatten)]
    pub profile: ProfileRecord,
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub current_followers: u64,
}

impl LatestSummary {
    #[must_use]
    pub fn new(profile: ProfileRecord, last_update: DateTime<Utc>) -> Self {
        let current_followers = profile.follower_count;
        Self {
            profile,
            last_update,
            current_followers,
        }
    }
}
