//! The seam every step of the fallback chain plugs into.

use async_trait::async_trait;
use followpulse_core::{Handle, ProfileRecord};

use crate::error::SourceError;

/// One data-acquisition strategy in the resolver's fallback chain.
///
/// Implementations report their own failure as [`SourceError`] and never
/// retry beyond whatever internal attempts their protocol needs (e.g. job
/// polling). Logging of failures is left to the resolver.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Short stable name used in logs and in [`ProfileRecord::source`].
    fn name(&self) -> &'static str;

    async fn attempt(&self, handle: &Handle) -> Result<ProfileRecord, SourceError>;
}
