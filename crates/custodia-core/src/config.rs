//! Service configuration.
//!
//! Deployments describe the service in a small TOML file:
//!
//! ```toml
//! admin_identity = "0x1a2b3c"
//! journal_path = "/var/lib/custodia/journal.db"
//! ```
//!
//! `journal_path` is optional; without it the registry runs in memory
//! only.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a [`CustodyService`](crate::service::CustodyService).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Identity granted Admin at bootstrap.
    pub admin_identity: String,

    /// Path to the `SQLite` journal; `None` keeps the registry in memory
    /// only.
    #[serde(default)]
    pub journal_path: Option<PathBuf>,
}

impl ServiceConfig {
    /// Creates an in-memory configuration for `admin_identity`.
    #[must_use]
    pub fn in_memory(admin_identity: impl Into<String>) -> Self {
        Self {
            admin_identity: admin_identity.into(),
            journal_path: None,
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if
    /// `admin_identity` is empty.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or `admin_identity` is
    /// empty.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        if config.admin_identity.is_empty() {
            return Err(ConfigError::Invalid(
                "admin_identity must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config = ServiceConfig::from_toml(r#"admin_identity = "0xadmin""#).unwrap();
        assert_eq!(config.admin_identity, "0xadmin");
        assert!(config.journal_path.is_none());
    }

    #[test]
    fn parses_journal_path() {
        let config = ServiceConfig::from_toml(
            r#"
            admin_identity = "0xadmin"
            journal_path = "/var/lib/custodia/journal.db"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.journal_path.as_deref(),
            Some(Path::new("/var/lib/custodia/journal.db"))
        );
    }

    #[test]
    fn rejects_empty_admin_and_unknown_keys() {
        assert!(matches!(
            ServiceConfig::from_toml(r#"admin_identity = """#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ServiceConfig::from_toml(r#"admin = "0xadmin""#),
            Err(ConfigError::Parse(_))
        ));
    }
}
