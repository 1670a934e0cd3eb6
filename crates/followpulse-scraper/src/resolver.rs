//! The profile fallback chain.

use followpulse_core::{Handle, ProfileRecord};

use crate::error::ResolveError;
use crate::source::ProfileSource;

/// Tries an explicit, ordered list of [`ProfileSource`]s and returns the
/// first record any of them produces.
///
/// The order is the policy: slow authoritative sources go first, then
/// faster or staler ones, then synthetic data. Sources are attempted strictly
/// one after another; a failure is logged and the next source is tried.
pub struct Resolver {
    sources: Vec<Box<dyn ProfileSource>>,
}

impl Resolver {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn ProfileSource>>) -> Self {
        Self { sources }
    }

    /// Names of the configured sources, in attempt order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve `handle` through the chain.
    ///
    /// The handle is assumed valid; callers parse it with [`Handle::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ProfileNotFound`] when every source fails or
    /// the chain is empty. Individual source failures are never returned.
    pub async fn resolve(&self, handle: &Handle) -> Result<ProfileRecord, ResolveError> {
        for source in &self.sources {
            match source.attempt(handle).await {
                Ok(profile) => {
                    tracing::info!(
                        handle = %handle,
                        source = source.name(),
                        source_kind = %profile.source_kind,
                        followers = profile.follower_count,
                        "resolved profile"
                    );
                    return Ok(profile);
                }
                Err(e) => {
                    tracing::warn!(
                        handle = %handle,
                        source = source.name(),
                        error = %e,
                        "profile source unavailable, trying next"
                    );
                }
            }
        }

        Err(ResolveError::ProfileNotFound {
            handle: handle.clone(),
            attempted: self.sources.len(),
        })
    }
}
