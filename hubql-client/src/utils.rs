//! # GitHub Utility Functions
//!
//! Parsing repository references and issue/pull request numbers out of the
//! forms users type: `owner/name`, HTTPS and SSH remotes, and web URLs.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;
use crate::models::RepoRef;

static GITHUB_REPO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"github\.com[/:]([^/\s]+)/([^/\s]+?)(?:\.git)?(?:[/#?].*)?$").expect("Failed to compile GitHub repo regex")
});

static SHORT_REPO_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").expect("Failed to compile short repo regex"));

static GITHUB_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"github\.com/[^/]+/[^/]+/(?:pull|issues)/(\d+)").expect("Failed to compile GitHub number regex")
});

impl FromStr for RepoRef {
  type Err = Error;

  /// Accepts `owner/name`, `https://github.com/owner/name(.git)`,
  /// `git@github.com:owner/name.git` and deeper web URLs
  fn from_str(input: &str) -> Result<Self, Self::Err> {
    let input = input.trim();
    let captures = if input.contains("github.com") {
      GITHUB_REPO_REGEX.captures(input)
    } else {
      SHORT_REPO_REGEX.captures(input)
    };

    match captures {
      Some(captures) => {
        let name = captures[2].strip_suffix(".git").unwrap_or(&captures[2]);
        Ok(RepoRef::new(&captures[1], name))
      }
      None => Err(Error::InvalidArgument(format!(
        "Could not extract owner and repo from '{input}'"
      ))),
    }
  }
}

/// Extract an issue or pull request number from a GitHub URL, or accept a
/// bare number
pub fn parse_number(input: &str) -> Result<u32, Error> {
  let input = input.trim().trim_start_matches('#');
  let digits = match GITHUB_NUMBER_REGEX.captures(input) {
    Some(captures) => captures.get(1).map_or("", |m| m.as_str()).to_string(),
    None => input.to_string(),
  };

  digits
    .parse::<u32>()
    .map_err(|e| Error::InvalidArgument(format!("Failed to parse '{input}' as an issue or pull request number: {e}")))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_short_form() {
    let repo: RepoRef = "rust-lang/cargo".parse().unwrap();
    assert_eq!(repo, RepoRef::new("rust-lang", "cargo"));
  }

  #[test]
  fn test_parse_https_url() {
    let repo: RepoRef = "https://github.com/octocat/Hello-World".parse().unwrap();
    assert_eq!(repo, RepoRef::new("octocat", "Hello-World"));

    let repo: RepoRef = "https://github.com/octocat/Hello-World.git".parse().unwrap();
    assert_eq!(repo.name, "Hello-World");
  }

  #[test]
  fn test_parse_url_with_path() {
    let repo: RepoRef = "https://github.com/octocat/Hello-World/pull/123".parse().unwrap();
    assert_eq!(repo, RepoRef::new("octocat", "Hello-World"));
  }

  #[test]
  fn test_parse_ssh_remote() {
    let repo: RepoRef = "git@github.com:octocat/hello.world.git".parse().unwrap();
    assert_eq!(repo, RepoRef::new("octocat", "hello.world"));
  }

  #[test]
  fn test_parse_invalid() {
    assert!("https://example.com/not-github".parse::<RepoRef>().is_err());
    assert!("https://github.com/only-owner".parse::<RepoRef>().is_err());
    assert!("no-slash".parse::<RepoRef>().is_err());
    assert!("a/b/c".parse::<RepoRef>().is_err());
  }

  #[test]
  fn test_parse_number() {
    assert_eq!(parse_number("123").unwrap(), 123);
    assert_eq!(parse_number("#42").unwrap(), 42);
    assert_eq!(parse_number("https://github.com/octocat/Hello-World/pull/456#discussion_r1").unwrap(), 456);
    assert_eq!(parse_number("https://github.com/octocat/Hello-World/issues/7").unwrap(), 7);
    assert!(parse_number("https://github.com/octocat/Hello-World/pull/abc").is_err());
    assert!(parse_number("twelve").is_err());
  }
}
