//! Authentication helpers for the GitHub client.
//!
//! Token discovery shared by the CLI and any other consumer: an explicit
//! token wins, then the `GITHUB_TOKEN` and `GH_TOKEN` environment variables,
//! then the password stored in `~/.netrc` for GitHub's hosts. Finding no
//! token is not an error; the server rejects unauthenticated calls.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::{debug, warn};

use crate::client::GitHubClient;
use crate::config::ClientConfig;
use crate::consts::NETRC_MACHINES;
use crate::error::{Error, Result};

/// Environment variables consulted for a token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Returns the path to the `.netrc` file for the provided home directory.
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Reads the password stored for `target_machine` in a `.netrc` file.
///
/// Both single-line (`machine host login user password pass`) and multi-line
/// entries are understood. A machine with no password yields `Ok(None)`.
pub fn read_netrc_token(path: &Path, target_machine: &str) -> Result<Option<String>> {
  let file = File::open(path).map_err(|e| Error::Config(format!("failed to open {}: {e}", path.display())))?;
  let reader = BufReader::new(file);

  let mut current_machine = String::new();
  let mut password = String::new();

  for line in reader.lines() {
    let line = line.map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    let parts: Vec<&str> = line.split_whitespace().collect();

    for i in 0..parts.len() {
      match parts[i] {
        "machine" if i + 1 < parts.len() => {
          if current_machine == target_machine && !password.is_empty() {
            return Ok(Some(password));
          }
          current_machine = parts[i + 1].to_string();
          password.clear();
        }
        "password" if i + 1 < parts.len() => {
          password = parts[i + 1].to_string();
        }
        _ => {}
      }
    }
  }

  if current_machine == target_machine && !password.is_empty() {
    return Ok(Some(password));
  }

  Ok(None)
}

/// Resolve a token using `env` for environment lookups.
pub fn resolve_token_with<F>(explicit: Option<&str>, home: Option<&Path>, env: F) -> Option<String>
where
  F: Fn(&str) -> Option<String>,
{
  if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
    return Some(token.to_string());
  }

  for var in TOKEN_ENV_VARS {
    if let Some(token) = env(var).filter(|t| !t.trim().is_empty()) {
      debug!("Using GitHub token from {}", var);
      return Some(token.trim().to_string());
    }
  }

  let netrc = get_netrc_path(home?);
  if !netrc.exists() {
    return None;
  }

  for machine in NETRC_MACHINES {
    match read_netrc_token(&netrc, machine) {
      Ok(Some(token)) => {
        debug!("Using GitHub token from .netrc machine {}", machine);
        return Some(token);
      }
      Ok(None) => {}
      Err(e) => {
        warn!("Ignoring unreadable .netrc: {}", e);
        return None;
      }
    }
  }

  None
}

/// Resolve a token from the process environment and the user's home directory.
pub fn resolve_token(explicit: Option<&str>) -> Option<String> {
  let base_dirs = BaseDirs::new();
  let home = base_dirs.as_ref().map(BaseDirs::home_dir);
  resolve_token_with(explicit, home, |var| std::env::var(var).ok())
}

/// Fill in the token of `config` if it does not carry one yet.
pub fn with_discovered_token(mut config: ClientConfig) -> ClientConfig {
  if !config.auth.has_token() {
    match resolve_token(None) {
      Some(token) => config.auth.token = token,
      None => warn!("No GitHub token found; requests will be unauthenticated"),
    }
  }
  config
}

/// Creates a GitHub client from the user's config file and discovered token.
pub fn create_github_client_from_env() -> Result<GitHubClient> {
  let config = with_discovered_token(ClientConfig::load_default()?);
  GitHubClient::new(config)
}
