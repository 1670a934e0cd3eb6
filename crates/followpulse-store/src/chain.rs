use std::sync::Arc;

use followpulse_core::{AppConfig, DemoProfiles};
use followpulse_scraper::{live_sources, DemoSource, Resolver, SourceError};

use crate::{HistoryStore, LastKnownSource};

/// Assembles the full fallback chain for `config`: the live sources, then
/// the stored last-known value (when enabled), then the demo table.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if a live source's HTTP client cannot be
/// built.
pub fn build_resolver(
    config: &AppConfig,
    store: &Arc<dyn HistoryStore>,
    demo: DemoProfiles,
) -> Result<Resolver, SourceError> {
    let mut sources = live_sources(config)?;
    if config.cached_fallback_enabled {
        sources.push(Box::new(LastKnownSource::new(Arc::clone(store))));
    }
    sources.push(Box::new(DemoSource::new(demo)));

    let resolver = Resolver::new(sources);
    tracing::info!(sources = ?resolver.source_names(), "profile fallback chain ready");
    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use followpulse_core::Environment;

    use super::*;
    use crate::MemoryStore;

    fn config() -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
            log_level: "info".to_string(),
            request_timeout_secs: 5,
            user_agent: "ua".to_string(),
            rate_limit_per_minute: 60,
            public_page_enabled: false,
            cached_fallback_enabled: false,
            demo_profiles_path: None,
            instagram_base_url: "https://www.instagram.com".to_string(),
            apify: None,
            rapidapi: None,
            firebase: None,
        }
    }

    #[test]
    fn demo_is_always_last() {
        let store: Arc<dyn HistoryStore> = Arc::new(MemoryStore::new());
        let resolver = build_resolver(&config(), &store, DemoProfiles::builtin()).unwrap();
        assert_eq!(resolver.source_names(), vec!["demo"]);
    }

    #[test]
    fn cached_fallback_sits_between_live_sources_and_demo() {
        let store: Arc<dyn HistoryStore> = Arc::new(MemoryStore::new());
        let mut config = config();
        config.public_page_enabled = true;
        config.cached_fallback_enabled = true;

        let resolver = build_resolver(&config, &store, DemoProfiles::builtin()).unwrap();
        assert_eq!(
            resolver.source_names(),
            vec!["public-page", "last-known", "demo"]
        );
    }
}
