//! # Client Configuration
//!
//! The configuration record the client is constructed from: the auth token
//! plus transport options. It can be built in code, read from a TOML file, or
//! loaded from the user's config directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::consts::{DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS, GRAPHQL_ENDPOINT, MAX_PAGE_SIZE, USER_AGENT};
use crate::error::{Error, Result};

/// Represents GitHub authentication credentials
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubAuth {
  pub token: String,
}

impl GitHubAuth {
  /// Surrounding whitespace, e.g. a trailing newline from a file, is dropped
  pub fn new(token: impl Into<String>) -> Self {
    let token: String = token.into();
    Self {
      token: token.trim().to_string(),
    }
  }

  /// Whether a token is present at all
  pub fn has_token(&self) -> bool {
    !self.token.trim().is_empty()
  }
}

impl fmt::Debug for GitHubAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let token = if self.has_token() { "<redacted>" } else { "<empty>" };
    f.debug_struct("GitHubAuth").field("token", &token).finish()
  }
}

/// Configuration the [`GitHubClient`](crate::GitHubClient) is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  pub auth: GitHubAuth,
  /// GraphQL endpoint, e.g. `https://ghe.example.com/api/graphql` for GitHub
  /// Enterprise Server
  pub endpoint: String,
  pub user_agent: String,
  pub timeout_secs: u64,
  /// Items requested per page by list operations, clamped to `1..=100`
  pub page_size: u32,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      auth: GitHubAuth::default(),
      endpoint: GRAPHQL_ENDPOINT.to_string(),
      user_agent: USER_AGENT.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

impl ClientConfig {
  /// Default configuration authenticated with `token`
  pub fn with_token(token: impl Into<String>) -> Self {
    Self {
      auth: GitHubAuth::new(token),
      ..Self::default()
    }
  }

  /// Parse a configuration from TOML text
  pub fn from_toml_str(content: &str) -> Result<Self> {
    let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  /// Load the configuration from a TOML file
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    Self::from_toml_str(&content)
  }

  /// Load `config.toml` from the user's config directory, or the defaults
  /// when no such file exists
  pub fn load_default() -> Result<Self> {
    match default_config_path() {
      Some(path) if path.exists() => {
        debug!("Loading client configuration from {}", path.display());
        Self::load(&path)
      }
      _ => Ok(Self::default()),
    }
  }

  /// Check the values a TOML file may have set
  pub fn validate(&self) -> Result<()> {
    let url = Url::parse(&self.endpoint).map_err(|e| Error::Config(format!("invalid endpoint '{}': {e}", self.endpoint)))?;
    if !matches!(url.scheme(), "http" | "https") {
      return Err(Error::Config(format!(
        "endpoint '{}' must use http or https",
        self.endpoint
      )));
    }
    if self.timeout_secs == 0 {
      return Err(Error::Config("timeout_secs must be greater than zero".to_string()));
    }
    Ok(())
  }

  /// Page size actually sent to GitHub
  pub fn effective_page_size(&self) -> u32 {
    self.page_size.clamp(1, MAX_PAGE_SIZE)
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// Location of the user's `config.toml`
pub fn default_config_path() -> Option<PathBuf> {
  ProjectDirs::from("", "", "hubql").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use tempfile::NamedTempFile;

  use super::*;

  #[test]
  fn test_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.endpoint, "https://api.github.com/graphql");
    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.timeout(), Duration::from_secs(30));
    assert!(!config.auth.has_token());
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_from_toml_partial() {
    let config = ClientConfig::from_toml_str(
      r#"
page_size = 25

[auth]
token = "ghp_example"
"#,
    )
    .unwrap();

    assert_eq!(config.auth.token, "ghp_example");
    assert_eq!(config.page_size, 25);
    assert_eq!(config.endpoint, GRAPHQL_ENDPOINT);
  }

  #[test]
  fn test_invalid_endpoint_rejected() {
    let err = ClientConfig::from_toml_str(r#"endpoint = "not a url""#).unwrap_err();
    assert!(err.to_string().contains("invalid endpoint"));

    let err = ClientConfig::from_toml_str(r#"endpoint = "ftp://example.com/graphql""#).unwrap_err();
    assert!(err.to_string().contains("http or https"));
  }

  #[test]
  fn test_zero_timeout_rejected() {
    let err = ClientConfig::from_toml_str("timeout_secs = 0").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
  }

  #[test]
  fn test_page_size_is_clamped() {
    let mut config = ClientConfig::default();
    config.page_size = 0;
    assert_eq!(config.effective_page_size(), 1);
    config.page_size = 500;
    assert_eq!(config.effective_page_size(), MAX_PAGE_SIZE);
  }

  #[test]
  fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "endpoint = \"https://ghe.example.com/api/graphql\"").unwrap();
    writeln!(file, "timeout_secs = 5").unwrap();

    let config = ClientConfig::load(file.path()).unwrap();
    assert_eq!(config.endpoint, "https://ghe.example.com/api/graphql");
    assert_eq!(config.timeout_secs, 5);
  }

  #[test]
  fn test_load_missing_file() {
    let err = ClientConfig::load(Path::new("/definitely/not/here/config.toml")).unwrap_err();
    assert!(err.to_string().contains("failed to read"));
  }

  #[test]
  fn test_debug_redacts_token() {
    let auth = GitHubAuth::new("ghp_secret");
    let rendered = format!("{auth:?}");
    assert!(!rendered.contains("ghp_secret"));
    assert!(rendered.contains("<redacted>"));
  }

  #[test]
  fn test_token_is_trimmed() {
    assert_eq!(GitHubAuth::new(" ghp_secret\n").token, "ghp_secret");
    assert!(!GitHubAuth::new("  \t").has_token());
  }
}
