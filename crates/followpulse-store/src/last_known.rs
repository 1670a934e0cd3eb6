use std::sync::Arc;

use async_trait::async_trait;
use followpulse_core::{Handle, ProfileRecord, SourceKind};
use followpulse_scraper::{ProfileSource, SourceError};

use crate::HistoryStore;

/// Serves the stored latest summary, tagged as a cached fallback, when every
/// live source has failed.
///
/// Summaries that were themselves synthetic are never replayed, so demo data
/// cannot masquerade as a cached live value.
pub struct LastKnownSource {
    store: Arc<dyn HistoryStore>,
}

impl LastKnownSource {
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileSource for LastKnownSource {
    fn name(&self) -> &'static str {
        "last-known"
    }

    async fn attempt(&self, handle: &Handle) -> Result<ProfileRecord, SourceError> {
        let summary = self
            .store
            .latest(handle)
            .await
            .map_err(|e| SourceError::Lookup {
                source_name: self.name(),
                error: Box::new(e),
            })?
            .filter(|s| !s.profile.is_synthetic() && s.current_followers > 0)
            .ok_or_else(|| SourceError::no_data(self.name(), handle))?;

        let mut profile = summary.profile;
        profile.follower_count = summary.current_followers;
        profile.source_kind = SourceKind::CachedFallback;
        profile.source = self.name().to_string();
        Ok(profile)
    }
}
