use async_trait::async_trait;
use followpulse_core::{DemoProfiles, Handle, ProfileRecord};

use crate::error::SourceError;
use crate::source::ProfileSource;

/// Last step of the chain: the static demo table.
pub struct DemoSource {
    profiles: DemoProfiles,
}

impl DemoSource {
    #[must_use]
    pub fn new(profiles: DemoProfiles) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl ProfileSource for DemoSource {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn attempt(&self, handle: &Handle) -> Result<ProfileRecord, SourceError> {
        self.profiles
            .get(handle)
            .map(followpulse_core::DemoProfile::to_record)
            .ok_or_else(|| SourceError::no_data(self.name(), handle))
    }
}
