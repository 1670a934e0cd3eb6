use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::handle::Handle;
use crate::profile::{ProfileRecord, SourceKind};
use crate::ConfigError;

/// A hardcoded stand-in profile served when no live source answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoProfile {
    pub username: Handle,
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub profile_pic_url: String,
}

impl DemoProfile {
    #[must_use]
    pub fn to_record(&self) -> ProfileRecord {
        ProfileRecord {
            handle: self.username.clone(),
            follower_count: self.followers,
            following_count: self.following,
            display_name: self.full_name.clone(),
            biography: self.biography.clone(),
            avatar_url: self.profile_pic_url.clone(),
            source_kind: SourceKind::SyntheticDemo,
            source: "demo".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DemoProfilesFile {
    profiles: Vec<DemoProfile>,
}

/// The static fallback table, keyed by handle.
#[derive(Debug, Clone, Default)]
pub struct DemoProfiles {
    profiles: HashMap<Handle, DemoProfile>,
}

impl DemoProfiles {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The profiles shipped with the dashboard.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::default();
        if let Ok(username) = Handle::parse("therajeshchityal") {
            table.insert(DemoProfile {
                username,
                followers: 325,
                following: 26,
                full_name: "Rajesh Chityal | AI Tools & Business Growth".to_string(),
                biography: "AI Tools & Business Growth • Helping entrepreneurs grow with AI 🤖"
                    .to_string(),
                profile_pic_url: "https://scontent.cdninstagram.com/v/t51.82787-19/626935884_17899596549376440_6100310365906891796_n.jpg".to_string(),
            });
        }
        table
    }

    /// Adds or replaces the entry for the profile's handle.
    pub fn insert(&mut self, profile: DemoProfile) {
        self.profiles.insert(profile.username.clone(), profile);
    }

    #[must_use]
    pub fn get(&self, handle: &Handle) -> Option<&DemoProfile> {
        self.profiles.get(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Load the built-in demo table, overlaid with entries from a YAML file.
///
/// File entries replace built-ins with the same handle.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or lists the
/// same handle twice.
pub fn load_demo_profiles(path: Option<&Path>) -> Result<DemoProfiles, ConfigError> {
    let mut table = DemoProfiles::builtin();
    let Some(path) = path else {
        return Ok(table);
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DemoFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let file = parse_demo_profiles(&content)?;
    for profile in file.profiles {
        table.insert(profile);
    }

    Ok(table)
}

fn parse_demo_profiles(content: &str) -> Result<DemoProfilesFile, ConfigError> {
    let file: DemoProfilesFile =
        serde_yaml::from_str(content).map_err(ConfigError::DemoFileParse)?;

    let mut seen = HashSet::new();
    for profile in &file.profiles {
        if !seen.insert(profile.username.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate demo profile: '{}'",
                profile.username
            )));
        }
    }

    Ok(file)
}
