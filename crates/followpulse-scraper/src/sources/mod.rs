//! Profile source adapters, one per step of the fallback chain.

mod apify;
mod demo;
mod public_page;
mod rapidapi;

pub use apify::ApifySource;
pub use demo::DemoSource;
pub use public_page::PublicPageSource;
pub use rapidapi::{RapidApiSource, ResponseShape, DEFAULT_RESPONSE_SHAPES};

use followpulse_core::AppConfig;

use crate::error::SourceError;
use crate::source::ProfileSource;

/// The live sources enabled by `config`, in priority order: job provider,
/// REST provider, public page.
///
/// Sources without credentials are left out rather than added in a
/// disabled state, so an unconfigured deployment yields an empty list.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if an HTTP client cannot be constructed.
pub fn live_sources(config: &AppConfig) -> Result<Vec<Box<dyn ProfileSource>>, SourceError> {
    let mut sources: Vec<Box<dyn ProfileSource>> = Vec::new();

    if let Some(apify) = &config.apify {
        sources.push(Box::new(ApifySource::new(
            apify,
            config.request_timeout_secs,
            &config.user_agent,
        )?));
    }

    if let Some(rapidapi) = &config.rapidapi {
        sources.push(Box::new(RapidApiSource::new(
            rapidapi,
            config.request_timeout_secs,
            &config.user_agent,
        )?));
    }

    if config.public_page_enabled {
        sources.push(Box::new(PublicPageSource::new(
            &config.instagram_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?));
    }

    Ok(sources)
}
