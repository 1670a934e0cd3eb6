use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Credentials and polling policy for the job-based scraping provider.
#[derive(Clone)]
pub struct ApifyConfig {
    pub api_token: String,
    pub actor_id: String,
    pub base_url: String,
    pub poll_interval_secs: u64,
    pub max_poll_attempts: u32,
}

impl std::fmt::Debug for ApifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApifyConfig")
            .field("api_token", &"[redacted]")
            .field("actor_id", &self.actor_id)
            .field("base_url", &self.base_url)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .finish()
    }
}

#[derive(Clone)]
pub struct RapidApiConfig {
    pub api_key: String,
    pub host: String,
    pub base_url: String,
}

impl std::fmt::Debug for RapidApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapidApiConfig")
            .field("api_key", &"[redacted]")
            .field("host", &self.host)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct FirebaseConfig {
    pub database_url: String,
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("database_url", &self.database_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub rate_limit_per_minute: usize,
    pub public_page_enabled: bool,
    pub cached_fallback_enabled: bool,
    pub demo_profiles_path: Option<PathBuf>,
    pub instagram_base_url: String,
    /// `None` disables the job-provider step.
    pub apify: Option<ApifyConfig>,
    /// `None` disables the REST-provider step.
    pub rapidapi: Option<RapidApiConfig>,
    /// `None` falls back to the in-process store.
    pub firebase: Option<FirebaseConfig>,
}
