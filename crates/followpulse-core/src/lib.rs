pub mod app_config;
pub mod config;
pub mod demo;
pub mod handle;
pub mod profile;

pub use app_config::{AppConfig, ApifyConfig, Environment, FirebaseConfig, RapidApiConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use demo::{load_demo_profiles, DemoProfile, DemoProfiles};
pub use handle::{Handle, HandleError};
pub use profile::{HistorySnapshot, LatestSummary, ProfileRecord, SourceKind};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read demo profiles file {path}: {source}")]
    DemoFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse demo profiles file: {0}")]
    DemoFileParse(#[source] serde_yaml::Error),

    #[error("demo profiles validation failed: {0}")]
    Validation(String),
}
