use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest username the platform accepts.
pub const MAX_HANDLE_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("Username is required")]
    MissingHandle,

    #[error("Invalid username \"{0}\": use up to 30 letters, digits, periods, or underscores")]
    InvalidHandle(String),
}

/// A validated, normalized platform username.
///
/// Input is trimmed, one leading `@` is dropped, and the result is
/// lowercased, so `" @Alice "` and `"alice"` name the same profile and the
/// same history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Parse and normalize a raw username.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::MissingHandle`] for blank input and
    /// [`HandleError::InvalidHandle`] when the name is too long or contains
    /// characters outside `[a-z0-9._]`.
    pub fn parse(raw: &str) -> Result<Self, HandleError> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(HandleError::MissingHandle);
        }

        let normalized = trimmed.to_ascii_lowercase();
        let valid_chars = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '_');
        if normalized.len() > MAX_HANDLE_LEN || !valid_chars {
            return Err(HandleError::InvalidHandle(trimmed.to_string()));
        }

        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Handle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0
    }
}

impl std::str::FromStr for Handle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_lowercases() {
        let handle = Handle::parse("  @The.Rajesh_Chityal ").unwrap();
        assert_eq!(handle.as_str(), "the.rajesh_chityal");
    }

    #[test]
    fn parse_rejects_empty_and_whitespace() {
        assert_eq!(Handle::parse(""), Err(HandleError::MissingHandle));
        assert_eq!(Handle::parse("   "), Err(HandleError::MissingHandle));
        assert_eq!(Handle::parse("@"), Err(HandleError::MissingHandle));
    }

    #[test]
    fn parse_rejects_path_characters() {
        assert!(matches!(
            Handle::parse("alice/../admin"),
            Err(HandleError::InvalidHandle(_))
        ));
        assert!(matches!(
            Handle::parse("bob?x=1"),
            Err(HandleError::InvalidHandle(_))
        ));
    }

    #[test]
    fn parse_rejects_overlong_names() {
        let raw = "a".repeat(MAX_HANDLE_LEN + 1);
        assert!(matches!(
            Handle::parse(&raw),
            Err(HandleError::InvalidHandle(_))
        ));
        assert!(Handle::parse(&"a".repeat(MAX_HANDLE_LEN)).is_ok());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Handle = serde_json::from_str("\"Alice\"").unwrap();
        assert_eq!(ok.as_str(), "alice");
        assert!(serde_json::from_str::<Handle>("\"not valid!\"").is_err());
    }
}
